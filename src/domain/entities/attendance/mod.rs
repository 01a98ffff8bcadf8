//! 출석 기록 엔티티 모듈

pub mod attendance_record;

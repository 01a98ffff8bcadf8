//! 출석 기록 데이터 액세스 계층

pub mod attendance_repo;

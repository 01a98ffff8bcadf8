//! 강의 엔티티 모듈

pub mod course;

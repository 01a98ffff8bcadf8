//! 출석 서비스 모듈
//!
//! QR 스캔 출석, 이력 조회, 강의별 요약과 내보내기를 제공합니다.

pub mod attendance_service;

pub use attendance_service::*;

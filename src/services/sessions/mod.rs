//! 출석 세션 서비스 모듈

pub mod session_service;

pub use session_service::*;

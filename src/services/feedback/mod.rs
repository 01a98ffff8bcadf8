//! 시스템 피드백 서비스 모듈

pub mod feedback_service;

pub use feedback_service::*;

//! 관리자 대시보드 서비스 모듈

pub mod admin_service;

pub use admin_service::*;

//! 인증 서비스 모듈
//!
//! JWT 액세스 토큰의 발급과 검증을 담당합니다.
//!
//! # Security
//!
//! - HMAC-SHA256 토큰 서명
//! - 토큰 만료 시간 관리 (`JWT_EXPIRATION_HOURS`)
//! - 역할(`role`) 클레임 기반 권한 확인
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::TokenService;
//!
//! let token_service = TokenService::instance();
//! let token = token_service.issue_for(&user)?;
//! ```

pub mod token_service;

pub use token_service::*;

//! 사용자 관리 서비스 모듈
//!
//! 학생 가입, 로그인, 관리자의 사용자 관리를 담당합니다.
//!
//! # Security
//!
//! - bcrypt 비밀번호 해싱
//! - 이메일/학번 중복 방지
//! - 비활성 계정 로그인 차단
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user_service = UserService::instance();
//! let user = user_service.register(request).await?;
//! ```

pub mod user_service;

pub use user_service::*;

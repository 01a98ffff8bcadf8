//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 HS256 서명 검증
//! - 사용자 ID와 역할을 request extension에 저장
//! - 선택적/강제 인증 모드와 역할 요구사항 지원
//!
//! 인증 실패는 401, 역할 불일치는 403 `{"error": "..."}` 응답으로 끝납니다.
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/v1/sessions")
//!             .wrap(AuthMiddleware::staff()) // 강의자/관리자만
//!             .service(handlers::sessions::create_session)
//!     )
//!     .service(
//!         web::scope("/api/v1/auth")
//!             .service(handlers::auth::login) // 인증 불필요
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;

//! # Domain Models Module
//!
//! 영속되지 않는 도메인 값 객체를 정의합니다.
//!
//! ## Entities vs Models
//!
//! - **Entities** (`../entities/`): MongoDB 문서, 고유 ID와 생명주기를 가짐
//! - **Models** (`./`): 요청 처리 중에만 존재하는 값 객체
//!
//! ## 모듈 구성
//!
//! ```text
//! models/
//! ├── auth/
//! │   ├── authenticated_user.rs      ← 요청 extensions에 저장되는 인증 주체
//! │   ├── authentication_request.rs  ← 라우트별 인증 모드와 요구 역할
//! │   └── token_claims.rs            ← JWT 클레임과 토큰 응답
//! └── qr/
//!     └── qr_payload.rs              ← 스캔된 QR 문자열 파싱
//! ```

pub mod auth;
pub mod qr;

pub use auth::*;
pub use qr::*;

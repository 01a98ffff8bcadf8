//! # Domain Layer Module
//!
//! 출결 시스템의 도메인 계층입니다. 영속 엔티티, API 경계의 DTO,
//! 그리고 인증/QR 같은 값 객체 모델로 구성됩니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - MongoDB에 저장되는 문서 (User, Course, AttendanceSession, ...)
//! ├── DTOs      - 요청/응답 데이터 (validator 검증 포함)
//! └── Models    - 인증 주체, JWT 클레임, QR 페이로드 등 값 객체
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB, Redis)
//! ```
//!
//! ## 모듈 구성
//!
//! | 모듈 | 역할 |
//! |------|------|
//! | [`entities`] | 컬렉션별 문서 구조와 도메인 규칙 (스캔 가능 여부, 지각 판정 등) |
//! | [`dto`] | HTTP 요청 검증과 응답 직렬화 |
//! | [`models`] | 요청 단위로 생성되는 불변 값 객체 |
//!
//! ## 변환 규칙
//!
//! - **Request → Entity**: 서비스 계층에서 검증된 DTO로 엔티티 생성
//! - **Entity → Response**: `impl From<Entity> for Response`
//! - 비밀번호 해시와 QR 토큰은 응답 DTO에 포함되지 않습니다
//!   (QR 토큰은 전용 엔드포인트에서만 노출).
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::dto::users::request::RegisterRequest;
//! use crate::domain::dto::users::response::UserResponse;
//!
//! // 1. DTO 검증
//! request.validate()?;
//!
//! // 2. 서비스 호출 (엔티티 생성 및 저장)
//! let user = UserService::instance().register(request).await?;
//!
//! // 3. 응답 DTO로 변환
//! let response = UserResponse::from(user);
//! ```

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::users::user::User;
pub use models::auth::{AuthenticatedUser, OptionalUser};

//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! Spring Framework의 Controller 레이어와 동일한 역할을 수행하며,
//! ActixWeb 프레임워크를 기반으로 구현되었습니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! HTTP Layer Architecture
//! ┌─────────────────────────────────────────────┐
//!   Client (Web, Mobile App)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                     ← Repository Layer
//! ├─────────────────────────────────────────────┤
//!   Entities/Models - 도메인 모델                  ← Domain Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 작성 규칙
//!
//! 1. 역할 검사 (`AuthenticatedUser::require_any` / `require_admin`) → 403
//! 2. 요청 본문 검증 (`validator::Validate`) → 400
//! 3. 싱글톤 서비스 한 번 호출
//! 4. 결과를 고정된 상태 코드와 JSON으로 변환
//!
//! 1, 2단계는 서비스 인스턴스를 가져오기 전에 끝나므로 데이터베이스 없이 테스트할 수 있습니다.
//!
//! ```rust,ignore
//! #[post("")]
//! pub async fn submit_feedback(
//!     user: AuthenticatedUser,
//!     payload: web::Json<CreateFeedbackRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()?;
//!
//!     let service = FeedbackService::instance();
//!     let feedback = service.submit(&user, payload.into_inner()).await?;
//!
//!     Ok(HttpResponse::Created().json(feedback))
//! }
//! ```
//!
//! ## 모듈 구성
//!
//! ```text
//! handlers/
//! ├── mod.rs          ← 이 파일
//! ├── auth.rs         ← 가입/로그인/현재 사용자
//! ├── users.rs        ← 사용자 관리 (관리자)
//! ├── admin.rs        ← 대시보드 통계
//! ├── courses.rs      ← 강의와 수강 명단
//! ├── sessions.rs     ← 출석 세션과 QR
//! ├── attendance.rs   ← 스캔, 이력, 요약, 내보내기
//! └── feedback.rs     ← 시스템 피드백
//! ```

pub mod users;
pub mod auth;
pub mod admin;
pub mod courses;
pub mod sessions;
pub mod attendance;
pub mod feedback;

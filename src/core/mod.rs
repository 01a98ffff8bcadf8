//! # Core Framework Module
//!
//! 서비스 전반에서 공유하는 프레임워크 기능을 모아둔 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입별 싱글톤 인스턴스 관리
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 서비스 등록
//! - **의존성 해결**: `Arc<T>` 필드 자동 주입
//!
//! 에러 타입은 [`crate::errors`]에 정의되어 있으며 편의를 위해 여기서 재export 합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use singleton_macro::{repository, service};
//!
//! #[repository(name = "course", collection = "courses")]
//! pub struct CourseRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! #[service(name = "course")]
//! pub struct CourseService {
//!     course_repo: Arc<CourseRepository>, // 자동 주입
//! }
//!
//! let course_service = CourseService::instance();
//! ```
//!
//! ### 애플리케이션 초기화
//!
//! ```rust,ignore
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis_client);
//! ServiceLocator::initialize_all().await?;
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 미등록 타입 에러
//! ```text
//! panic: Service not found: ExportService. Make sure it's registered...
//! ```
//! 매크로의 `name` 인자는 타입 이름에서 `Service`/`Repository` 접미사를 뗀
//! 소문자 이름과 같아야 합니다 (`SessionService` → `"session"`).

pub mod registry;

pub use crate::errors::{AppError, AppResult, ErrorContext};
pub use registry::*;

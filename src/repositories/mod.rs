//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로를 사용하여 싱글톤으로 관리되는 리포지토리들을 제공합니다.
//! 컬렉션 하나당 리포지토리 하나이며, ID 단건 조회는 Redis 캐시를 거칩니다.
//!
//! | 리포지토리 | 컬렉션 | 캐시 |
//! |------------|--------|------|
//! | `UserRepository` | `users` | ID, 이메일 |
//! | `CourseRepository` | `courses` | ID |
//! | `SessionRepository` | `sessions` | ID |
//! | `AttendanceRepository` | `attendance` | 없음 |
//! | `FeedbackRepository` | `system_feedback` | 없음 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::user_repo::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! let user = user_repo.find_by_email("user@example.com").await?;
//! ```

pub mod users;
pub mod courses;
pub mod sessions;
pub mod attendance;
pub mod feedback;

//! # Domain Entities
//!
//! MongoDB 컬렉션에 저장되는 핵심 도메인 엔티티입니다.
//!
//! | 엔티티 | 컬렉션 | 설명 |
//! |--------|--------|------|
//! | [`users::user::User`] | `users` | 학생/강의자/관리자 계정 |
//! | [`courses::course::Course`] | `courses` | 강의와 수강생 명단 |
//! | [`sessions::session::AttendanceSession`] | `sessions` | QR 출석 세션 |
//! | [`attendance::attendance_record::AttendanceRecord`] | `attendance` | 학생별 출석 기록 |
//! | [`feedback::system_feedback::SystemFeedback`] | `system_feedback` | 시스템 피드백 |
//!
//! ## 설계 규칙
//!
//! - 엔티티 간 참조는 `ObjectId`로만 합니다 (임베딩 없음).
//! - 열거형 필드는 문자열로 저장되며 Rust 타입으로 값의 범위를 강제합니다.
//! - 모든 엔티티는 `created_at` / `updated_at`을 가집니다.
//!
//! ```rust,ignore
//! #[derive(Serialize, Deserialize)]
//! pub struct Course {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     pub lecturer_id: ObjectId,
//!     #[serde(default)]
//!     pub student_ids: Vec<ObjectId>, // 예전 문서와의 호환
//! }
//! ```

pub mod users;
pub mod courses;
pub mod sessions;
pub mod attendance;
pub mod feedback;

//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//! 각 서비스는 필요한 리포지토리를 자동으로 주입받습니다.
//!
//! # Features
//!
//! - 사용자 가입/로그인과 관리자 계정 관리
//! - JWT 액세스 토큰 발급과 검증
//! - 강의와 수강생 명단 관리
//! - QR 출석 세션, 출석 기록, 요약과 내보내기
//! - 시스템 피드백과 관리자 대시보드 통계
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{attendance::AttendanceService, auth::TokenService};
//!
//! let attendance_service = AttendanceService::instance();
//! let token_service = TokenService::instance();
//! ```

pub mod users;
pub mod auth;
pub mod courses;
pub mod sessions;
pub mod attendance;
pub mod feedback;
pub mod admin;

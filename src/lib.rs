//! 출결 서비스 백엔드
//!
//! 강의실 QR 출석 체크를 위한 REST API 서비스입니다.
//! 강의자가 시간 제한이 있는 출석 세션을 열고, 학생은 화면의 QR 코드를 스캔해 출석합니다.
//!
//! # Features
//!
//! - **사용자 관리**: 학생 자가 가입, 관리자의 계정/역할 관리 (`student`, `lecturer`, `admin`)
//! - **JWT 인증**: HS256 액세스 토큰 기반 상태 없는 인증
//! - **강의/수강 관리**: 강의 생성, 담당 강의자 지정, 수강생 등록
//! - **출석 세션**: QR 토큰 발급, 유효 시간, 지각 판정, 종료 시 결석 처리
//! - **리포팅**: 세션별/학생별 기록, 강의 출석률 요약, CSV/JSON 내보내기
//! - **시스템 피드백**: 사용자 피드백 제출과 관리자 처리 상태 관리
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//! - **MongoDB + Redis**: 영구 저장과 ID 조회 캐싱
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 (/api/v1)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 역할 검사, 입력 검증, 응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use attendance_service_backend::services::attendance::AttendanceService;
//! use attendance_service_backend::services::sessions::SessionService;
//!
//! // 강의자가 세션을 열고
//! let created = SessionService::instance().create_session(request, &lecturer).await?;
//!
//! // 학생이 QR을 스캔
//! let record = AttendanceService::instance()
//!     .mark_attendance(&student, &created.qr.qr_data)
//!     .await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;

//! # Configuration Module
//!
//! 환경 변수 기반 설정값을 중앙에서 관리하는 모듈입니다.
//! 모든 설정은 타입이 지정된 접근자 함수로 읽으며, 값이 없으면 개발에 안전한
//! 기본값을 사용합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 캐시, CORS, Rate Limit, 비밀번호 해싱
//! - [`auth_config`] - JWT 설정과 사용자 역할
//! - [`attendance_config`] - 출석 세션 유효 시간과 지각 기준
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 저장소
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="attendance_dev"
//! export REDIS_URL="redis://localhost:6379"
//!
//! # 보안
//! export JWT_SECRET="your-super-secret-key"
//! export BCRYPT_COST="12"
//!
//! # 환경 (development, test, staging, production)
//! export ENVIRONMENT="production"
//! ```
//!
//! `.env.dev` / `.env.prod` 파일은 `PROFILE` 값에 따라 `main`에서 로드됩니다.

pub mod data_config;
pub mod auth_config;
pub mod attendance_config;

pub use data_config::*;
pub use auth_config::*;
pub use attendance_config::*;

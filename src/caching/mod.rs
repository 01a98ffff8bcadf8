//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 읽기 캐시를 제공합니다. 출석 스캔이 몰리는 시점에
//! 세션/강의 조회가 MongoDB까지 내려가지 않도록 ID 기반 조회를 캐싱합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("session:66f1...", &session, 600).await?;
//! let cached: Option<AttendanceSession> = cache.get("session:66f1...").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;

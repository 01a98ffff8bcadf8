//! # Redis 캐시 클라이언트 구현
//!
//! 리포지토리 계층의 읽기 캐시로 사용하는 Redis 클라이언트입니다.
//! 값은 JSON으로 직렬화되어 저장되며, 캐시 실패는 호출 측에서 무시하고
//! MongoDB 조회로 넘어갑니다.
//!
//! ## 키 규칙
//!
//! | 키 | 값 |
//! |----|----|
//! | `session:{id}` | 출석 세션 |
//! | `course:{id}` | 강의 |
//! | `user:{id}` | 사용자 |

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::env;
use log::info;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// `REDIS_URL` (기본값 `redis://localhost:6379`)로 연결하고 `PING`으로 검증합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::open(Self::redis_url())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    fn redis_url() -> String {
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let deserialized = serde_json::from_str(&json)
                    .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Deserialization failed", e.to_string())))?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: usize) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex(key, Self::to_json(value)?, seconds as u64).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// 여러 키를 한 번에 삭제합니다. 빈 목록이면 연결 없이 성공합니다.
    ///
    /// `#[repository]`의 `invalidate_collection_cache`가 `keys`와 함께 사용합니다.
    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// 패턴(`course:*`, `session:*` 등)과 일치하는 키 목록
    ///
    /// KEYS는 블로킹 명령이므로 컬렉션 단위 무효화에만 씁니다.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
        serde_json::to_string(value)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconnected_client() -> RedisClient {
        RedisClient { client: Client::open("redis://127.0.0.1:1").unwrap() }
    }

    #[actix_web::test]
    async fn test_del_multiple_with_no_keys_skips_connection() {
        assert!(unconnected_client().del_multiple(&[]).await.is_ok());
    }

    #[actix_web::test]
    async fn test_keys_reports_connection_errors() {
        assert!(unconnected_client().keys("course:*").await.is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(RedisClient::to_json(&vec!["CS101"]).unwrap(), r#"["CS101"]"#);
    }
}

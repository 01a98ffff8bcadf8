//! # Authentication Configuration Module
//!
//! JWT 토큰 설정과 사용자 역할(Role) 정의를 관리합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_HOURS="24"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{JwtConfig, UserRole};
//!
//! let secret = JwtConfig::secret();
//! let role = UserRole::parse("lecturer")?;
//! assert!(role.can_manage_sessions());
//! ```

use std::env;
use std::fmt;
use serde::{Deserialize, Serialize};
use super::data_config::env_or;

/// JWT 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    /// 액세스 토큰 만료 시간 (기본값 24시간)
    pub fn expiration_hours() -> i64 {
        env_or("JWT_EXPIRATION_HOURS", 24)
    }
}

/// 사용자 역할
///
/// MongoDB와 JSON에는 소문자 문자열(`student`, `lecturer`, `admin`)로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Lecturer,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Student, UserRole::Lecturer, UserRole::Admin];

    /// 문자열에서 역할을 파싱합니다 (대소문자 무관).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "lecturer" => Ok(UserRole::Lecturer),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Unsupported role: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Lecturer => "lecturer",
            UserRole::Admin => "admin",
        }
    }

    /// 출석 세션을 생성/종료할 수 있는 역할인지
    pub fn can_manage_sessions(&self) -> bool {
        matches!(self, UserRole::Lecturer | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_string() {
        assert_eq!(UserRole::parse("student").unwrap(), UserRole::Student);
        assert_eq!(UserRole::parse("Lecturer").unwrap(), UserRole::Lecturer);
        assert_eq!(UserRole::parse(" ADMIN ").unwrap(), UserRole::Admin);

        assert!(UserRole::parse("teacher").is_err());
        assert!(UserRole::parse("").is_err());
    }

    #[test]
    fn test_user_role_as_str_matches_serde() {
        for role in UserRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_session_management_roles() {
        assert!(!UserRole::Student.can_manage_sessions());
        assert!(UserRole::Lecturer.can_manage_sessions());
        assert!(UserRole::Admin.can_manage_sessions());
    }
}

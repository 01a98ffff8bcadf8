use serde::{Deserialize, Serialize};
use crate::config::UserRole;
use crate::domain::dto::format_datetime;
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::TokenResponse;

/// 사용자 응답 DTO (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            email,
            role,
            student_number,
            is_active,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            name,
            email,
            role,
            student_number,
            is_active,
            last_login_at: last_login_at.map(format_datetime),
            created_at: format_datetime(created_at),
            updated_at: format_datetime(updated_at),
        }
    }
}

/// 로그인 응답 DTO (JWT 토큰 포함)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl LoginResponse {
    pub fn new(user: User, token: TokenResponse) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_user_response_hides_password_hash() {
        let mut user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "$2b$12$secret".to_string(),
            UserRole::Student,
            Some("S1".to_string()),
        );
        user.id = Some(ObjectId::new());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "student");
        assert_eq!(json["student_number"], "S1");
        assert_eq!(json["id"].as_str().unwrap().len(), 24);
    }
}

//! JWT 토큰 관리 서비스 구현
//!
//! HS256으로 서명한 액세스 토큰을 발급하고 검증합니다.
//! 토큰에는 사용자 ID(`sub`)와 역할(`role`)이 담기며, 리프레시 토큰은 없습니다.
//! 만료되면 다시 로그인해야 합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::{JwtConfig, UserRole},
    domain::entities::users::user::User,
    domain::models::auth::{TokenClaims, TokenResponse},
};
use crate::errors::errors::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// JWT 토큰 생성 및 검증 서비스
///
/// 서명 키와 만료 시간은 [`JwtConfig`]에서 읽습니다.
///
/// ```rust,ignore
/// let token_service = TokenService::instance();
/// let token = token_service.issue_for(&user)?;
/// let claims = token_service.verify_token(&token.access_token)?;
/// ```
#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 로그인한 사용자에게 액세스 토큰을 발급합니다.
    ///
    /// * `Err(AppError::InternalError)` - 저장되지 않은(ID 없는) 사용자
    pub fn issue_for(&self, user: &User) -> Result<TokenResponse, AppError> {
        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?;

        let hours = JwtConfig::expiration_hours();
        let access_token = encode_token(&user_id, user.role, &JwtConfig::secret(), hours)?;

        Ok(TokenResponse::bearer(access_token, hours * 3600))
    }

    /// 토큰 서명과 만료 시간을 검증하고 클레임을 반환합니다.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_token(token, &JwtConfig::secret())
    }
}

/// 클레임을 만들어 서명합니다.
pub fn encode_token(user_id: &str, role: UserRole, secret: &str, expiration_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(expiration_hours);

    let claims = TokenClaims {
        sub: user_id.to_string(),
        role,
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    decode::<TokenClaims>(token, &decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            },
            jsonwebtoken::errors::ErrorKind::InvalidToken
            | jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::Base64(_)
            | jsonwebtoken::errors::ErrorKind::Json(_)
            | jsonwebtoken::errors::ErrorKind::Utf8(_) => {
                AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string())
            },
            _ => AppError::InternalError(format!("토큰 검증 실패: {}", e))
        })
}

/// `Authorization` 헤더 값에서 Bearer 토큰을 꺼냅니다.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    match auth_header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject_and_role() {
        let token = encode_token("665f1c2e9b1d4a0012345678", UserRole::Lecturer, SECRET, 1).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "665f1c2e9b1d4a0012345678");
        assert_eq!(claims.role, UserRole::Lecturer);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = encode_token("user", UserRole::Student, "other-secret", 1).unwrap();

        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = encode_token("user", UserRole::Admin, SECRET, -2).unwrap();

        match decode_token(&token, SECRET) {
            Err(AppError::AuthenticationError(msg)) => assert!(msg.contains("만료")),
            other => panic!("expected expiry error, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_garbage_token_is_authentication_error() {
        assert!(matches!(
            decode_token("not-a-jwt", SECRET),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic dXNlcg==").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("").is_err());
    }
}

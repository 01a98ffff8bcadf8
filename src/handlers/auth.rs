//! Authentication HTTP Handlers
//!
//! 가입, 로그인, 현재 사용자 조회 엔드포인트입니다.
//! 로그인에 성공하면 HS256 액세스 토큰을 발급하며 리프레시 토큰은 없습니다.
//!
//! # Endpoints
//!
//! - `POST /auth/register` - 학생 자가 가입 (역할은 항상 `student`)
//! - `POST /auth/login` - 이메일/패스워드 로그인
//! - `GET /auth/me` - 토큰 주체의 최신 사용자 정보
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::users::user_service::UserService;

/// 학생 자가 가입 핸들러
///
/// # Endpoint
/// `POST /auth/register`
///
/// 성공 시 `201 Created`와 사용자 정보를 반환합니다. 이메일 중복은 `409`.
#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_service = UserService::instance();
    let response = user_service.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// 로컬 로그인 핸들러
///
/// 이메일과 패스워드를 검증하고 액세스 토큰을 발급합니다.
///
/// # Endpoint
/// `POST /auth/login`
///
/// ```json
/// {
///   "user": { "id": "...", "email": "...", "role": "student", ... },
///   "access_token": "eyJ...",
///   "token_type": "Bearer",
///   "expires_in": 86400
/// }
/// ```
#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_service = UserService::instance();
    let response = user_service.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 현재 인증된 사용자 정보 조회
///
/// # Endpoint
/// `GET /auth/me`
#[get("/me")]
pub async fn me(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_service = UserService::instance();
    let response = user_service.get_user_by_id(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_register_rejects_invalid_payload_before_touching_storage() {
        let app = test::init_service(App::new().service(register)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"name": "Ada", "email": "not-an-email", "password": "attend2024"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"name": "Ada", "email": "ada@example.com", "password": "short"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_requires_email_and_password() {
        let app = test::init_service(App::new().service(login)).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "ada@example.com", "password": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_me_without_authentication_is_unauthorized() {
        let app = test::init_service(App::new().service(me)).await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

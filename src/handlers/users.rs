//! # User Management HTTP Handlers
//!
//! 관리자 전용 사용자 관리 엔드포인트입니다. 스코프에 `admin` 역할 요구
//! 미들웨어가 걸려 있으므로 핸들러는 입력 검증과 서비스 호출만 담당합니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/users?role=` | 사용자 목록 | 200 OK |
//! | `POST` | `/users` | 사용자 생성 (모든 역할) | 201 Created |
//! | `GET` | `/users/{id}` | 사용자 조회 | 200 OK |
//! | `PUT` | `/users/{id}` | 이름/역할/활성/학번 수정 | 200 OK |
//! | `DELETE` | `/users/{id}` | 사용자 삭제 | 204 No Content |
//!
//! 비밀번호 해시는 어떤 응답에도 포함되지 않습니다.

use actix_web::{web, HttpResponse, get, post, put, delete};
use validator::Validate;
use crate::domain::dto::users::request::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::users::user_service::UserService;

/// 사용자 목록 조회
///
/// `role` 쿼리로 역할별 필터링이 가능합니다.
#[get("")]
pub async fn list_users(
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
    let role = query.parsed_role().map_err(AppError::ValidationError)?;

    let service = UserService::instance();
    let users = service.list_users(role).await?;

    Ok(HttpResponse::Ok().json(users))
}

/// 사용자 생성 핸들러
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/users \
///   -H "Authorization: Bearer <admin token>" \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Grace","email":"grace@example.com","password":"compiler1","role":"lecturer"}'
/// ```
#[post("")]
pub async fn create_user(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let service = UserService::instance();
    let response = service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/{user_id}")]
pub async fn get_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_user_by_id(&user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 사용자 정보 수정
///
/// 학생이 아닌 역할로 바꾸면 학번은 제거됩니다.
/// 담당 강의가 있는 강의자의 역할 변경은 `409`.
#[put("/{user_id}")]
pub async fn update_user(
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let service = UserService::instance();
    let user = service.update_user(&user_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 사용자 삭제 핸들러
///
/// 학생을 삭제하면 수강 명단과 출석 기록에서도 제거됩니다.
/// 자기 자신은 삭제할 수 없습니다.
#[delete("/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<String>,
    admin: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.delete_user(&user_id, &admin.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

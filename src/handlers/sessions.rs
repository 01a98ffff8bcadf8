//! # Attendance Session HTTP Handlers
//!
//! 출석 세션 생성/조회/종료와 QR 페이로드 엔드포인트입니다.
//! 스코프에 강의자/관리자 역할 미들웨어가 걸려 있으며, 담당 강의 여부는 서비스에서 확인합니다.

use actix_web::{web, HttpResponse, get, post};
use validator::Validate;
use crate::domain::dto::sessions::{CreateSessionRequest, SessionListQuery};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::sessions::SessionService;

/// 출석 세션 생성
///
/// # Endpoint
/// `POST /sessions`
///
/// `duration_minutes`를 생략하면 `ATTENDANCE_SESSION_MINUTES`가 사용됩니다.
/// 응답에는 세션 정보와 함께 QR 페이로드가 포함됩니다.
///
/// ```json
/// {
///   "session": { "id": "...", "course_id": "...", "title": "Week 3", "is_active": true, ... },
///   "qr": { "session_id": "...", "token": "...", "qr_data": "{\"sessionId\":\"...\",\"token\":\"...\"}", ... }
/// }
/// ```
#[post("")]
pub async fn create_session(
    user: AuthenticatedUser,
    payload: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let service = SessionService::instance();
    let created = service.create_session(payload.into_inner(), &user).await?;

    Ok(HttpResponse::Created().json(created))
}

/// 세션 목록
///
/// `course_id`가 없으면 강의자는 담당 강의 전체, 관리자는 모든 세션을 봅니다.
#[get("")]
pub async fn list_sessions(
    user: AuthenticatedUser,
    query: web::Query<SessionListQuery>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::instance();
    let sessions = service.list_sessions(query.course_id.as_deref(), &user).await?;

    Ok(HttpResponse::Ok().json(sessions))
}

#[get("/{session_id}")]
pub async fn get_session(
    session_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::instance();
    let session = service.get_session(&session_id, &user).await?;

    Ok(HttpResponse::Ok().json(session))
}

/// QR 페이로드 조회
///
/// 종료된 세션도 조회는 가능하며 `accepts_scans`가 `false`로 표시됩니다.
#[get("/{session_id}/qr")]
pub async fn get_qr_code(
    session_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::instance();
    let qr = service.get_qr_code(&session_id, &user).await?;

    Ok(HttpResponse::Ok().json(qr))
}

/// 세션 종료
///
/// 기록이 없는 수강생은 `Absent`로 기록됩니다. 이미 종료된 세션은 `409`.
#[post("/{session_id}/close")]
pub async fn close_session(
    session_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::instance();
    let closed = service.close_session(&session_id, &user).await?;

    Ok(HttpResponse::Ok().json(closed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{dev::Service, http::StatusCode, test, App, HttpMessage};
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;
    use crate::config::UserRole;

    #[actix_web::test]
    async fn test_create_session_validates_payload() {
        let lecturer = AuthenticatedUser::new(ObjectId::new().to_hex(), UserRole::Lecturer);
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(lecturer.clone());
                    srv.call(req)
                })
                .service(web::scope("/sessions").service(create_session))
        ).await;

        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(json!({"course_id": "bad", "title": "Week 1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(json!({"course_id": ObjectId::new().to_hex(), "title": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

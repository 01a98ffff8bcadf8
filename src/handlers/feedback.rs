//! # System Feedback HTTP Handlers
//!
//! 사용자가 시스템 문제나 개선 요청을 제출하고 관리자가 처리 상태를 관리하는 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 접근 | 성공 |
//! |--------|------|------|------|
//! | `POST` | `/system-feedback` | 인증 사용자 | 201 |
//! | `GET` | `/system-feedback/my` | 인증 사용자 | 200 |
//! | `GET` | `/system-feedback/all?status=&category=` | 관리자 | 200 |
//! | `PUT` | `/system-feedback/{id}/status` | 관리자 | 200 |
//!
//! 작성자 ID와 역할은 요청 본문이 아니라 토큰에서 가져옵니다.

use actix_web::{web, HttpResponse, get, post, put};
use validator::Validate;
use crate::domain::dto::feedback::{CreateFeedbackRequest, FeedbackFilterQuery, UpdateFeedbackStatusRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::feedback::FeedbackService;

/// 피드백 제출
///
/// ```json
/// {
///   "title": "대시보드가 느립니다",
///   "category": "Performance Issue",
///   "description": "출석 요약 화면이 10초 이상 걸립니다",
///   "severity": 4
/// }
/// ```
///
/// `title`, `category`, `description`이 없거나 `category`가 허용 값이 아니면 `400`.
#[post("")]
pub async fn submit_feedback(
    user: AuthenticatedUser,
    payload: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let service = FeedbackService::instance();
    let feedback = service.submit(&user, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(feedback))
}

#[get("/my")]
pub async fn my_feedback(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = FeedbackService::instance();
    let feedback = service.my_feedback(&user).await?;

    Ok(HttpResponse::Ok().json(feedback))
}

/// 전체 피드백 목록 (관리자)
///
/// 관리자가 아니면 `403`.
#[get("/all")]
pub async fn all_feedback(
    user: AuthenticatedUser,
    query: web::Query<FeedbackFilterQuery>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    let (status, category) = query.parse().map_err(AppError::ValidationError)?;

    let service = FeedbackService::instance();
    let feedback = service.all_feedback(status, category).await?;

    Ok(HttpResponse::Ok().json(feedback))
}

/// 피드백 처리 상태 변경 (관리자)
///
/// 상태 전이 순서에는 제약이 없습니다. 허용 값이 아닌 상태는 `400`.
#[put("/{feedback_id}/status")]
pub async fn update_feedback_status(
    feedback_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateFeedbackStatusRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    payload.validate()?;

    let status = payload.parsed_status().map_err(AppError::ValidationError)?;

    let service = FeedbackService::instance();
    let feedback = service.update_status(&feedback_id, status).await?;

    Ok(HttpResponse::Ok().json(feedback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{dev::Service, http::StatusCode, test, App, HttpMessage};
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};
    use crate::config::UserRole;

    macro_rules! app_as {
        ($role:expr) => {{
            let user = AuthenticatedUser::new(ObjectId::new().to_hex(), $role);
            test::init_service(
                App::new()
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(user.clone());
                        srv.call(req)
                    })
                    .service(
                        web::scope("/system-feedback")
                            .service(submit_feedback)
                            .service(my_feedback)
                            .service(all_feedback)
                            .service(update_feedback_status)
                    )
            ).await
        }};
    }

    #[actix_web::test]
    async fn test_submit_without_category_is_bad_request() {
        let app = app_as!(UserRole::Student);

        let req = test::TestRequest::post()
            .uri("/system-feedback")
            .set_json(json!({
                "title": "Slow dashboard",
                "description": "Summary page takes more than 10 seconds"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("category"));
    }

    #[actix_web::test]
    async fn test_non_admin_listing_all_feedback_is_forbidden() {
        for role in [UserRole::Student, UserRole::Lecturer] {
            let app = app_as!(role);

            let req = test::TestRequest::get().uri("/system-feedback/all").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }
    }

    #[actix_web::test]
    async fn test_status_outside_enum_is_bad_request() {
        let app = app_as!(UserRole::Admin);

        let req = test::TestRequest::put()
            .uri(&format!("/system-feedback/{}/status", ObjectId::new().to_hex()))
            .set_json(json!({"status": "Done"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_all_feedback_rejects_unknown_filter() {
        let app = app_as!(UserRole::Admin);

        let req = test::TestRequest::get()
            .uri("/system-feedback/all?status=Archived")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_non_admin_cannot_update_status() {
        let app = app_as!(UserRole::Lecturer);

        let req = test::TestRequest::put()
            .uri(&format!("/system-feedback/{}/status", ObjectId::new().to_hex()))
            .set_json(json!({"status": "Resolved"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

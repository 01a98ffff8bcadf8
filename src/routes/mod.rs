//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 `/api/v1` 아래에 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! 스코프마다 인증 레벨이 다릅니다:
//!
//! | 스코프 | 미들웨어 |
//! |--------|----------|
//! | `/auth` | `AuthMiddleware::optional()` (`/me`만 추출자로 401) |
//! | `/users`, `/admin` | `AuthMiddleware::required_with_role(Admin)` |
//! | `/sessions` | `AuthMiddleware::staff()` |
//! | `/courses`, `/attendance`, `/system-feedback` | `AuthMiddleware::required()` + 핸들러 역할 검사 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::config::UserRole;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use chrono;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// 헬스체크는 `/health`와 `/api/v1/health` 두 경로로 노출됩니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .service(health_check)
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_admin_routes)
            .configure(configure_course_routes)
            .configure(configure_session_routes)
            .configure(configure_attendance_routes)
            .configure(configure_feedback_routes)
    );
}

/// 인증 관련 라우트
///
/// - `POST /api/v1/auth/register` - 학생 가입
/// - `POST /api/v1/auth/login` - 로그인
/// - `GET /api/v1/auth/me` - 현재 사용자 정보
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"student@example.com","password":"attend2024"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .wrap(AuthMiddleware::optional())
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::me)
    );
}

/// 사용자 관리 라우트 (관리자 전용)
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
            .service(handlers::users::list_users)
            .service(handlers::users::create_user)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::delete_user)
    );
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
            .service(handlers::admin::stats)
    );
}

fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/courses")
            .wrap(AuthMiddleware::required())
            .service(handlers::courses::list_courses)
            .service(handlers::courses::create_course)
            .service(handlers::courses::get_course)
            .service(handlers::courses::update_course)
            .service(handlers::courses::delete_course)
            .service(handlers::courses::enroll_students)
            .service(handlers::courses::unenroll_student)
    );
}

/// 출석 세션 라우트 (강의자/관리자)
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/sessions \
///   -H "Authorization: Bearer <lecturer token>" \
///   -H "Content-Type: application/json" \
///   -d '{"course_id":"665f1c2b9d3e4a0012345678","title":"Week 3","duration_minutes":20}'
/// ```
fn configure_session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .wrap(AuthMiddleware::staff())
            .service(handlers::sessions::create_session)
            .service(handlers::sessions::list_sessions)
            .service(handlers::sessions::get_session)
            .service(handlers::sessions::get_qr_code)
            .service(handlers::sessions::close_session)
    );
}

fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .wrap(AuthMiddleware::required())
            .service(handlers::attendance::scan)
            .service(handlers::attendance::my_attendance)
            .service(handlers::attendance::session_attendance)
            .service(handlers::attendance::update_status)
            .service(handlers::attendance::course_summary)
            .service(handlers::attendance::export_course)
    );
}

fn configure_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/system-feedback")
            .wrap(AuthMiddleware::required())
            .service(handlers::feedback::submit_feedback)
            .service(handlers::feedback::my_feedback)
            .service(handlers::feedback::all_feedback)
            .service(handlers::feedback::update_feedback_status)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "attendance_service",
///   "version": "0.1.0",
///   "timestamp": "2026-03-02T09:00:00+00:00",
///   "features": {
///     "database": "MongoDB",
///     "cache": "Redis",
///     "dependency_injection": "Singleton Macro"
///   }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "attendance_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use mongodb::bson::oid::ObjectId;
    use crate::config::JwtConfig;
    use crate::services::auth::encode_token;

    fn bearer(role: UserRole) -> String {
        let token = encode_token(&ObjectId::new().to_hex(), role, &JwtConfig::secret(), 1).unwrap();
        format!("Bearer {}", token)
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/health", "/api/v1/health"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_protected_scopes_require_token() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/api/v1/users", "/api/v1/courses", "/api/v1/system-feedback/all", "/api/v1/auth/me"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_role_gated_scopes() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/sessions")
            .insert_header(("Authorization", bearer(UserRole::Student)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/stats")
            .insert_header(("Authorization", bearer(UserRole::Lecturer)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/v1/system-feedback/all")
            .insert_header(("Authorization", bearer(UserRole::Student)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

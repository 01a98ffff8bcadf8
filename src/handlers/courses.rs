//! # Course HTTP Handlers
//!
//! 강의와 수강 명단 엔드포인트입니다. 스코프 전체에 인증이 필요하며,
//! 조회는 역할별로 범위가 정해지고 변경은 관리자만 가능합니다.
//!
//! | 메서드 | 경로 | 접근 |
//! |--------|------|------|
//! | `GET` | `/courses` | 관리자: 전체, 강의자: 담당, 학생: 수강 |
//! | `POST` | `/courses` | 관리자 |
//! | `GET` | `/courses/{id}` | 담당 강의자, 수강생, 관리자 |
//! | `PUT`/`DELETE` | `/courses/{id}` | 관리자 |
//! | `POST` | `/courses/{id}/students` | 관리자 |
//! | `DELETE` | `/courses/{id}/students/{student_id}` | 관리자 |

use actix_web::{web, HttpResponse, get, post, put, delete};
use validator::Validate;
use crate::domain::dto::courses::{CreateCourseRequest, EnrollStudentsRequest, UpdateCourseRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::courses::CourseService;

#[get("")]
pub async fn list_courses(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = CourseService::instance();
    let courses = service.list_courses(&user).await?;

    Ok(HttpResponse::Ok().json(courses))
}

/// 강의 생성
///
/// `lecturer_id`는 활성화된 강의자여야 하며, 강의 코드는 고유합니다 (중복 시 `409`).
#[post("")]
pub async fn create_course(
    user: AuthenticatedUser,
    payload: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    payload.validate()?;

    let service = CourseService::instance();
    let course = service.create_course(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(course))
}

#[get("/{course_id}")]
pub async fn get_course(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = CourseService::instance();
    let course = service.get_course(&course_id, &user).await?;

    Ok(HttpResponse::Ok().json(course))
}

#[put("/{course_id}")]
pub async fn update_course(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    payload.validate()?;

    let service = CourseService::instance();
    let course = service.update_course(&course_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(course))
}

/// 강의 삭제
///
/// 강의의 세션과 출석 기록도 함께 삭제됩니다.
#[delete("/{course_id}")]
pub async fn delete_course(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let service = CourseService::instance();
    service.delete_course(&course_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 수강생 등록
///
/// 이미 등록된 학생은 무시됩니다. 학생이 아닌 사용자가 섞여 있으면 `400`.
#[post("/{course_id}/students")]
pub async fn enroll_students(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<EnrollStudentsRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    payload.validate()?;

    let service = CourseService::instance();
    let course = service.enroll_students(&course_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(course))
}

#[delete("/{course_id}/students/{student_id}")]
pub async fn unenroll_student(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    let (course_id, student_id) = path.into_inner();

    let service = CourseService::instance();
    let course = service.unenroll_student(&course_id, &student_id).await?;

    Ok(HttpResponse::Ok().json(course))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{dev::Service, http::StatusCode, test, App, HttpMessage};
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;
    use crate::config::UserRole;

    #[actix_web::test]
    async fn test_only_admin_can_create_courses() {
        let lecturer = AuthenticatedUser::new(ObjectId::new().to_hex(), UserRole::Lecturer);
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(lecturer.clone());
                    srv.call(req)
                })
                .service(web::scope("/courses").service(create_course))
        ).await;

        let req = test::TestRequest::post()
            .uri("/courses")
            .set_json(json!({
                "code": "CS101",
                "title": "Intro",
                "lecturer_id": ObjectId::new().to_hex()
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_enroll_requires_student_ids() {
        let admin = AuthenticatedUser::new(ObjectId::new().to_hex(), UserRole::Admin);
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(admin.clone());
                    srv.call(req)
                })
                .service(web::scope("/courses").service(enroll_students))
        ).await;

        let req = test::TestRequest::post()
            .uri(&format!("/courses/{}/students", ObjectId::new().to_hex()))
            .set_json(json!({"student_ids": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

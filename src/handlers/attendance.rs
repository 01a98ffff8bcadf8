//! # Attendance HTTP Handlers
//!
//! QR 스캔 출석, 출석 이력, 상태 변경, 강의 요약과 내보내기 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 접근 |
//! |--------|------|------|
//! | `POST` | `/attendance/scan` | 학생 |
//! | `GET` | `/attendance/me` | 학생 |
//! | `GET` | `/attendance/session/{id}` | 강의자, 관리자 |
//! | `PUT` | `/attendance/{id}/status` | 강의자, 관리자 |
//! | `GET` | `/attendance/course/{id}/summary` | 강의자, 관리자 |
//! | `GET` | `/attendance/course/{id}/export?format=csv\|json` | 강의자, 관리자 |
//!
//! 스코프에는 인증만 요구되고, 역할 검사는 각 핸들러에서 서비스 호출 전에 수행합니다.

use actix_web::{web, HttpResponse, get, post, put};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use validator::Validate;
use crate::config::UserRole;
use crate::domain::dto::attendance::{ExportQuery, ScanRequest, UpdateAttendanceStatusRequest};
use crate::domain::entities::attendance::attendance_record::AttendanceStatus;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::attendance::{AttendanceService, CourseExport};

const STAFF: [UserRole; 2] = [UserRole::Lecturer, UserRole::Admin];

/// QR 스캔 출석
///
/// # Endpoint
/// `POST /attendance/scan`
///
/// ```json
/// { "qr_data": "{\"sessionId\":\"665f...\",\"token\":\"7c0e...\"}" }
/// ```
///
/// 성공 시 `201 Created`. 이미 출석한 세션은 `409`.
#[post("/scan")]
pub async fn scan(
    user: AuthenticatedUser,
    payload: web::Json<ScanRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&[UserRole::Student])?;
    payload.validate()?;

    let qr_data = payload.qr_data.as_deref().unwrap_or_default();

    let service = AttendanceService::instance();
    let record = service.mark_attendance(&user, qr_data).await?;

    Ok(HttpResponse::Created().json(record))
}

#[get("/me")]
pub async fn my_attendance(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_any(&[UserRole::Student])?;

    let service = AttendanceService::instance();
    let records = service.my_attendance(&user).await?;

    Ok(HttpResponse::Ok().json(records))
}

#[get("/session/{session_id}")]
pub async fn session_attendance(
    session_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_any(&STAFF)?;

    let service = AttendanceService::instance();
    let records = service.session_attendance(&session_id, &user).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// 출석 상태 수동 변경
///
/// `status`는 `Present`, `Late`, `Absent`, `Excused` 중 하나여야 합니다.
#[put("/{record_id}/status")]
pub async fn update_status(
    record_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateAttendanceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&STAFF)?;
    payload.validate()?;

    let status = AttendanceStatus::parse(payload.status.as_deref().unwrap_or_default())
        .map_err(AppError::ValidationError)?;

    let service = AttendanceService::instance();
    let record = service.update_status(&record_id, status, &user).await?;

    Ok(HttpResponse::Ok().json(record))
}

#[get("/course/{course_id}/summary")]
pub async fn course_summary(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_any(&STAFF)?;

    let service = AttendanceService::instance();
    let summary = service.course_summary(&course_id, &user).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// 강의 출석 기록 내보내기
///
/// CSV는 첨부 파일(`<code>_attendance.csv`)로, JSON은 정규화된 레코드 배열로 응답합니다.
#[get("/course/{course_id}/export")]
pub async fn export_course(
    course_id: web::Path<String>,
    user: AuthenticatedUser,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&STAFF)?;
    let format = query.export_format().map_err(AppError::ValidationError)?;

    let service = AttendanceService::instance();

    match service.export_course(&course_id, format, &user).await? {
        CourseExport::Csv { filename, body } => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(body)),
        CourseExport::Json(records) => Ok(HttpResponse::Ok().json(records)),
    }
}

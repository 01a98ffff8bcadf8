//! 관리자 대시보드 핸들러

use actix_web::{get, HttpResponse};
use crate::errors::errors::AppError;
use crate::services::admin::AdminService;

/// 대시보드 통계
///
/// # Endpoint
/// `GET /admin/stats`
///
/// ```json
/// {
///   "users": { "student": 120, "lecturer": 8, "admin": 2, "total": 130 },
///   "courses": 14,
///   "sessions": { "total": 310, "active": 2 },
///   "attendance_records": 9120,
///   "feedback": { "Closed": 4, "In Progress": 1, "New": 3, "Resolved": 12, "Under Review": 0 }
/// }
/// ```
#[get("/stats")]
pub async fn stats() -> Result<HttpResponse, AppError> {
    let service = AdminService::instance();
    let stats = service.stats().await?;

    Ok(HttpResponse::Ok().json(stats))
}

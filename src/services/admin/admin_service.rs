//! # 관리자 대시보드 서비스 구현

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;
use crate::{
    config::UserRole,
    domain::dto::admin::{AdminStatsResponse, SessionCounts, UserCounts},
    repositories::{
        attendance::attendance_repo::AttendanceRepository,
        courses::course_repo::CourseRepository,
        feedback::feedback_repo::FeedbackRepository,
        sessions::session_repo::SessionRepository,
        users::user_repo::UserRepository,
    },
};
use crate::errors::errors::AppError;

/// 관리자 대시보드 통계 서비스
///
/// 모든 수치는 요청 시점에 `count_documents`로 계산하며 캐싱하지 않습니다.
#[service(name = "admin")]
pub struct AdminService {
    user_repo: Arc<UserRepository>,
    course_repo: Arc<CourseRepository>,
    session_repo: Arc<SessionRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    feedback_repo: Arc<FeedbackRepository>,
}

impl AdminService {
    pub async fn stats(&self) -> Result<AdminStatsResponse, AppError> {
        let student = self.user_repo.count_by_role(UserRole::Student).await?;
        let lecturer = self.user_repo.count_by_role(UserRole::Lecturer).await?;
        let admin = self.user_repo.count_by_role(UserRole::Admin).await?;

        Ok(AdminStatsResponse {
            users: UserCounts {
                student,
                lecturer,
                admin,
                total: student + lecturer + admin,
            },
            courses: self.course_repo.count().await?,
            sessions: SessionCounts {
                total: self.session_repo.count().await?,
                active: self.session_repo.count_accepting(DateTime::now()).await?,
            },
            attendance_records: self.attendance_repo.count().await?,
            feedback: self.feedback_repo.count_by_status().await?,
        })
    }
}

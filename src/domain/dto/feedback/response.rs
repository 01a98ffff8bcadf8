use serde::{Deserialize, Serialize};
use crate::config::UserRole;
use crate::domain::dto::format_datetime;
use crate::domain::entities::feedback::system_feedback::{FeedbackCategory, FeedbackStatus, SystemFeedback};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub user_id: String,
    pub user_role: UserRole,
    pub title: String,
    pub category: FeedbackCategory,
    pub description: String,
    pub severity: u8,
    pub status: FeedbackStatus,
    pub screenshot: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SystemFeedback> for FeedbackResponse {
    fn from(feedback: SystemFeedback) -> Self {
        Self {
            id: feedback.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: feedback.user_id.to_hex(),
            user_role: feedback.user_role,
            title: feedback.title,
            category: feedback.category,
            description: feedback.description,
            severity: feedback.severity,
            status: feedback.status,
            screenshot: feedback.screenshot,
            created_at: format_datetime(feedback.created_at),
            updated_at: format_datetime(feedback.updated_at),
        }
    }
}

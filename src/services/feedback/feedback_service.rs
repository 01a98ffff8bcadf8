//! # 시스템 피드백 서비스 구현
//!
//! 제출자 정보(`user_id`, `user_role`)는 요청 본문이 아닌 인증 토큰에서 가져옵니다.

use std::sync::Arc;
use singleton_macro::service;
use crate::{
    domain::{
        dto::feedback::{CreateFeedbackRequest, FeedbackResponse},
        entities::feedback::system_feedback::{FeedbackCategory, FeedbackStatus, SystemFeedback},
        models::auth::AuthenticatedUser,
    },
    repositories::feedback::feedback_repo::FeedbackRepository,
    utils::string_utils::validate_required_string,
};
use crate::errors::errors::AppError;

#[service(name = "feedback")]
pub struct FeedbackService {
    feedback_repo: Arc<FeedbackRepository>,
}

impl FeedbackService {
    /// 피드백 제출 (상태 `New`, 심각도 기본 3)
    pub async fn submit(
        &self,
        user: &AuthenticatedUser,
        request: CreateFeedbackRequest,
    ) -> Result<FeedbackResponse, AppError> {
        let category = request.parsed_category().map_err(AppError::ValidationError)?;
        let severity = request.severity_or_default();
        let title = validate_required_string(request.title.as_deref().unwrap_or_default(), "title")?;
        let description = validate_required_string(request.description.as_deref().unwrap_or_default(), "description")?;

        let feedback = SystemFeedback::submit(
            user.object_id()?,
            user.role,
            title,
            category,
            description,
            severity,
            request.screenshot,
        );

        let created = self.feedback_repo.create(feedback).await?;
        log::info!("피드백 제출: [{}] {} (by {})", created.category, created.title, user.user_id);

        Ok(FeedbackResponse::from(created))
    }

    /// 본인이 제출한 피드백
    pub async fn my_feedback(&self, user: &AuthenticatedUser) -> Result<Vec<FeedbackResponse>, AppError> {
        let feedback = self.feedback_repo.find_by_user(&user.object_id()?).await?;
        Ok(feedback.into_iter().map(FeedbackResponse::from).collect())
    }

    /// 전체 피드백 (관리자)
    pub async fn all_feedback(
        &self,
        status: Option<FeedbackStatus>,
        category: Option<FeedbackCategory>,
    ) -> Result<Vec<FeedbackResponse>, AppError> {
        let feedback = self.feedback_repo.find_all(status, category).await?;
        Ok(feedback.into_iter().map(FeedbackResponse::from).collect())
    }

    /// 상태 변경 (관리자)
    ///
    /// 상태 간 전이 순서는 제한하지 않습니다.
    pub async fn update_status(&self, id: &str, status: FeedbackStatus) -> Result<FeedbackResponse, AppError> {
        let updated = self.feedback_repo
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("피드백을 찾을 수 없습니다".to_string()))?;

        log::info!("피드백 상태 변경: {} → {}", id, updated.status);

        Ok(FeedbackResponse::from(updated))
    }
}

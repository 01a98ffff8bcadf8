//! # 시스템 피드백 리포지토리 구현
//!
//! 피드백은 삭제하지 않으며 상태 필드만 갱신합니다.

use std::collections::BTreeMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::feedback::system_feedback::{FeedbackCategory, FeedbackStatus, SystemFeedback},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 시스템 피드백 데이터 액세스 리포지토리
///
/// - **컬렉션명**: `system_feedback`
/// - **인덱스**: (user_id, created_at desc), (status, category)
#[repository(name = "feedback", collection = "system_feedback")]
pub struct FeedbackRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl FeedbackRepository {
    async fn find_many(&self, filter: Document) -> Result<Vec<SystemFeedback>, AppError> {
        self.collection::<SystemFeedback>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut feedback: SystemFeedback) -> Result<SystemFeedback, AppError> {
        let result = self.collection::<SystemFeedback>()
            .insert_one(&feedback)
            .await?;

        feedback.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 피드백 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(feedback)
    }

    /// 사용자가 제출한 피드백 (최신순)
    pub async fn find_by_user(&self, user_id: &ObjectId) -> Result<Vec<SystemFeedback>, AppError> {
        self.find_many(doc! { "user_id": *user_id }).await
    }

    /// 전체 피드백 (최신순, 상태/분류 필터 선택)
    pub async fn find_all(
        &self,
        status: Option<FeedbackStatus>,
        category: Option<FeedbackCategory>,
    ) -> Result<Vec<SystemFeedback>, AppError> {
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }
        if let Some(category) = category {
            filter.insert("category", category.as_str());
        }

        self.find_many(filter).await
    }

    /// 상태 변경
    ///
    /// * `Ok(None)` - 해당 ID의 피드백이 없음
    pub async fn update_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<Option<SystemFeedback>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<SystemFeedback>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 상태별 피드백 수 (모든 상태 키 포함, 없으면 0)
    pub async fn count_by_status(&self) -> Result<BTreeMap<String, u64>, AppError> {
        let collection = self.collection::<SystemFeedback>();
        let mut counts = BTreeMap::new();

        for status in FeedbackStatus::ALL {
            let count = collection
                .count_documents(doc! { "status": status.as_str() })
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
            counts.insert(status.as_str().to_string(), count);
        }

        Ok(counts)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("user_id_created_at".to_string())
                .build())
            .build();

        let triage_index = IndexModel::builder()
            .keys(doc! { "status": 1, "category": 1 })
            .options(IndexOptions::builder()
                .name("status_category".to_string())
                .build())
            .build();

        self.collection::<SystemFeedback>()
            .create_indexes([user_index, triage_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

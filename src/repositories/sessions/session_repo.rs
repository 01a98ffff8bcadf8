//! # 출석 세션 리포지토리 구현
//!
//! 세션 종료는 `is_active: true` 조건부 업데이트로 처리되어
//! 동시에 두 번 종료 요청이 와도 한 번만 성공합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    config::CacheConfig,
    core::registry::Repository,
    db::Database,
    domain::entities::sessions::session::AttendanceSession,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 출석 세션 데이터 액세스 리포지토리
///
/// - **컬렉션명**: `sessions`
/// - **캐시 키**: `session:{session_id}`
/// - **인덱스**: (course_id, starts_at desc), lecturer_id, qr_token(unique)
#[repository(name = "session", collection = "sessions")]
pub struct SessionRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl SessionRepository {
    fn parse_id(id: &str) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceSession>, AppError> {
        let object_id = Self::parse_id(id)?;
        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<AttendanceSession>(&cache_key).await {
            return Ok(Some(cached));
        }

        let session = self.collection::<AttendanceSession>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref session) = session {
            let _ = self.redis
                .set_with_expiry(&cache_key, session, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(session)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<AttendanceSession>, AppError> {
        self.collection::<AttendanceSession>()
            .find(filter)
            .sort(doc! { "starts_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 강의의 세션 목록 (최신순)
    pub async fn find_by_course(&self, course_id: &ObjectId) -> Result<Vec<AttendanceSession>, AppError> {
        self.find_many(doc! { "course_id": *course_id }).await
    }

    /// 여러 강의의 세션 목록 (강의자 본인 강의 전체 조회용)
    pub async fn find_by_courses(&self, course_ids: &[ObjectId]) -> Result<Vec<AttendanceSession>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "course_id": { "$in": course_ids.to_vec() } }).await
    }

    /// 여러 세션을 한 번에 조회 (출석 이력 표시용)
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<AttendanceSession>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    pub async fn find_all(&self) -> Result<Vec<AttendanceSession>, AppError> {
        self.find_many(doc! {}).await
    }

    /// 종료되었거나 유효 시간이 지난 세션 (출석률 계산의 분모)
    pub async fn find_ended_by_course(
        &self,
        course_id: &ObjectId,
        now: DateTime,
    ) -> Result<Vec<AttendanceSession>, AppError> {
        self.find_many(doc! {
            "course_id": *course_id,
            "$or": [
                { "is_active": false },
                { "expires_at": { "$lte": now } },
            ],
        }).await
    }

    pub async fn create(&self, mut session: AttendanceSession) -> Result<AttendanceSession, AppError> {
        let result = self.collection::<AttendanceSession>()
            .insert_one(&session)
            .await?;

        session.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 세션 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(session)
    }

    /// 활성 세션을 종료합니다.
    ///
    /// * `Ok(None)` - 세션이 없거나 이미 종료됨
    pub async fn close(&self, id: &str) -> Result<Option<AttendanceSession>, AppError> {
        let object_id = Self::parse_id(id)?;
        let now = DateTime::now();

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let closed = self.collection::<AttendanceSession>()
            .find_one_and_update(
                doc! { "_id": object_id, "is_active": true },
                doc! { "$set": { "is_active": false, "closed_at": now, "updated_at": now } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if closed.is_some() {
            let _ = self.invalidate_cache(id).await;
        }

        Ok(closed)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<AttendanceSession>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 현재 스캔을 받을 수 있는 세션 수
    pub async fn count_accepting(&self, now: DateTime) -> Result<u64, AppError> {
        self.collection::<AttendanceSession>()
            .count_documents(doc! { "is_active": true, "expires_at": { "$gt": now } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 강의 삭제 시 해당 강의의 세션 일괄 삭제
    pub async fn delete_by_course(&self, course_id: &ObjectId) -> Result<u64, AppError> {
        let sessions = self.find_by_course(course_id).await?;

        let result = self.collection::<AttendanceSession>()
            .delete_many(doc! { "course_id": *course_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        for session_id in sessions.iter().filter_map(|s| s.id_string()) {
            let _ = self.invalidate_cache(&session_id).await;
        }

        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1, "starts_at": -1 })
            .options(IndexOptions::builder()
                .name("course_id_starts_at".to_string())
                .build())
            .build();

        let lecturer_index = IndexModel::builder()
            .keys(doc! { "lecturer_id": 1 })
            .options(IndexOptions::builder()
                .name("lecturer_id".to_string())
                .build())
            .build();

        let token_index = IndexModel::builder()
            .keys(doc! { "qr_token": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("qr_token_unique".to_string())
                .build())
            .build();

        self.collection::<AttendanceSession>()
            .create_indexes([course_index, lecturer_index, token_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

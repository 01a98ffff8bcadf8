//! # 강의 리포지토리 구현
//!
//! 강의 문서와 수강생 명단(`student_ids`)을 관리합니다.
//! 명단 변경은 `$addToSet` / `$pull`로 처리하므로 중복 등록은 멱등입니다.

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
    domain::entities::courses::course::Course,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 강의 데이터 액세스 리포지토리
///
/// - **컬렉션명**: `courses`
/// - **캐시 키**: `course:{course_id}`
/// - **인덱스**: code(unique), lecturer_id, student_ids
#[repository(name = "course", collection = "courses")]
pub struct CourseRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl CourseRepository {
    fn parse_id(id: &str) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Course>, AppError> {
        let object_id = Self::parse_id(id)?;
        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Course>(&cache_key).await {
            return Ok(Some(cached));
        }

        let course = self.collection::<Course>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref course) = course {
            let _ = self.redis
                .set_with_expiry(&cache_key, course, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(course)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Course>, AppError> {
        self.collection::<Course>()
            .find_one(doc! { "code": code })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Course>, AppError> {
        self.collection::<Course>()
            .find(filter)
            .sort(doc! { "code": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 전체 강의 (코드순)
    pub async fn find_all(&self) -> Result<Vec<Course>, AppError> {
        self.find_many(doc! {}).await
    }

    /// 여러 강의를 한 번에 조회
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Course>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    /// 강의자가 담당하는 강의
    pub async fn find_by_lecturer(&self, lecturer_id: &ObjectId) -> Result<Vec<Course>, AppError> {
        self.find_many(doc! { "lecturer_id": *lecturer_id }).await
    }

    /// 학생이 수강 중인 강의
    pub async fn find_by_student(&self, student_id: &ObjectId) -> Result<Vec<Course>, AppError> {
        self.find_many(doc! { "student_ids": *student_id }).await
    }

    /// 새 강의 생성
    ///
    /// * `Err(AppError::ConflictError)` - 강의 코드 중복
    pub async fn create(&self, mut course: Course) -> Result<Course, AppError> {
        if self.find_by_code(&course.code).await?.is_some() {
            return Err(AppError::ConflictError(format!("이미 존재하는 강의 코드입니다: {}", course.code)));
        }

        let result = self.collection::<Course>()
            .insert_one(&course)
            .await?;

        course.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 강의 ID를 확인할 수 없습니다".to_string())
        })?);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(course)
    }

    async fn find_one_and_update(&self, id: &str, update: Document) -> Result<Option<Course>, AppError> {
        let object_id = Self::parse_id(id)?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self.collection::<Course>()
            .find_one_and_update(doc! { "_id": object_id }, update)
            .with_options(options)
            .await?;

        if updated.is_some() {
            let _ = self.invalidate_cache(id).await;
        }

        Ok(updated)
    }

    /// 강의 정보 부분 업데이트 (`$set`)
    pub async fn update(&self, id: &str, mut update_doc: Document) -> Result<Option<Course>, AppError> {
        update_doc.insert("updated_at", DateTime::now());
        self.find_one_and_update(id, doc! { "$set": update_doc }).await
    }

    /// 수강생 추가 (이미 등록된 학생은 무시)
    pub async fn add_students(&self, id: &str, student_ids: &[ObjectId]) -> Result<Option<Course>, AppError> {
        self.find_one_and_update(id, doc! {
            "$addToSet": { "student_ids": { "$each": student_ids.to_vec() } },
            "$set": { "updated_at": DateTime::now() },
        }).await
    }

    /// 수강생 제외
    pub async fn remove_student(&self, id: &str, student_id: &ObjectId) -> Result<Option<Course>, AppError> {
        self.find_one_and_update(id, doc! {
            "$pull": { "student_ids": *student_id },
            "$set": { "updated_at": DateTime::now() },
        }).await
    }

    /// 삭제된 사용자를 모든 수강생 명단에서 제거
    pub async fn remove_student_from_all(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let affected = self.find_by_student(student_id).await?;
        if affected.is_empty() {
            return Ok(0);
        }

        let result = self.collection::<Course>()
            .update_many(
                doc! { "student_ids": *student_id },
                doc! { "$pull": { "student_ids": *student_id }, "$set": { "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        for course_id in affected.iter().filter_map(|c| c.id_string()) {
            let _ = self.invalidate_cache(&course_id).await;
        }
        let _ = self.invalidate_collection_cache(None).await;

        Ok(result.modified_count)
    }

    /// 강의자가 담당 중인 강의 수
    pub async fn count_by_lecturer(&self, lecturer_id: &ObjectId) -> Result<u64, AppError> {
        self.collection::<Course>()
            .count_documents(doc! { "lecturer_id": *lecturer_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<Course>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = Self::parse_id(id)?;

        let result = self.collection::<Course>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("code_unique".to_string())
                .build())
            .build();

        let lecturer_index = IndexModel::builder()
            .keys(doc! { "lecturer_id": 1 })
            .options(IndexOptions::builder()
                .name("lecturer_id".to_string())
                .build())
            .build();

        let students_index = IndexModel::builder()
            .keys(doc! { "student_ids": 1 })
            .options(IndexOptions::builder()
                .name("student_ids".to_string())
                .build())
            .build();

        self.collection::<Course>()
            .create_indexes([code_index, lecturer_index, students_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

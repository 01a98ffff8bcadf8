//! # 출석 기록 리포지토리 구현
//!
//! `(session_id, student_id)` 유니크 인덱스가 중복 스캔을 막습니다.
//! 동시에 들어온 두 번째 스캔은 삽입 단계에서 409로 변환됩니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, InsertManyOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::attendance::attendance_record::{AttendanceRecord, AttendanceStatus, MarkedBy},
};
use singleton_macro::repository;
use crate::errors::{errors::duplicate_only_insert_failures, AppError, ErrorContext};

/// 출석 기록 데이터 액세스 리포지토리
///
/// 기록은 목록 단위로 조회되므로 캐싱하지 않습니다.
///
/// - **컬렉션명**: `attendance`
/// - **인덱스**: (session_id, student_id) unique, (student_id, marked_at desc), course_id
#[repository(name = "attendance", collection = "attendance")]
pub struct AttendanceRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl AttendanceRepository {
    async fn find_many(&self, filter: Document, sort: Document) -> Result<Vec<AttendanceRecord>, AppError> {
        self.collection::<AttendanceRecord>()
            .find(filter)
            .sort(sort)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        self.collection::<AttendanceRecord>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_session_and_student(
        &self,
        session_id: &ObjectId,
        student_id: &ObjectId,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        self.collection::<AttendanceRecord>()
            .find_one(doc! { "session_id": *session_id, "student_id": *student_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 세션의 출석 기록 (기록 시각순)
    pub async fn find_by_session(&self, session_id: &ObjectId) -> Result<Vec<AttendanceRecord>, AppError> {
        self.find_many(doc! { "session_id": *session_id }, doc! { "marked_at": 1 }).await
    }

    /// 학생 본인의 출석 이력 (최신순)
    pub async fn find_by_student(&self, student_id: &ObjectId) -> Result<Vec<AttendanceRecord>, AppError> {
        self.find_many(doc! { "student_id": *student_id }, doc! { "marked_at": -1 }).await
    }

    /// 강의 전체 출석 기록 (기록 시각순)
    pub async fn find_by_course(&self, course_id: &ObjectId) -> Result<Vec<AttendanceRecord>, AppError> {
        self.find_many(doc! { "course_id": *course_id }, doc! { "marked_at": 1 }).await
    }

    /// 출석 기록 생성
    ///
    /// * `Err(AppError::ConflictError)` - 같은 세션에 이미 기록이 있음
    pub async fn create(&self, mut record: AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let result = self.collection::<AttendanceRecord>()
            .insert_one(&record)
            .await?;

        record.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 출석 기록 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(record)
    }

    /// 결석 기록 일괄 생성
    ///
    /// 순서 없는 삽입이므로 도중에 중복이 있어도 나머지는 기록됩니다.
    /// 세션 종료와 동시에 들어온 스캔이 먼저 기록된 학생은 건너뛰고, 실제로 삽입된 수를 반환합니다.
    pub async fn insert_many(&self, records: &[AttendanceRecord]) -> Result<usize, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let options = InsertManyOptions::builder().ordered(false).build();

        let result = self.collection::<AttendanceRecord>()
            .insert_many(records)
            .with_options(options)
            .await;

        match result {
            Ok(inserted) => Ok(inserted.inserted_ids.len()),
            Err(e) => match duplicate_only_insert_failures(&e) {
                Some(skipped) => {
                    log::debug!("이미 기록된 출석 {}건 건너뜀", skipped);
                    Ok(records.len().saturating_sub(skipped))
                }
                None => Err(e.into()),
            },
        }
    }

    /// 강의자/관리자 수동 상태 변경
    pub async fn update_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let marked_by = mongodb::bson::to_bson(&MarkedBy::Lecturer)
            .context("marked_by 직렬화 실패")?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<AttendanceRecord>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "status": status.as_str(),
                    "marked_by": marked_by,
                    "updated_at": DateTime::now(),
                } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<AttendanceRecord>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 사용자 삭제 시 해당 학생의 기록 삭제
    pub async fn delete_by_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self.collection::<AttendanceRecord>()
            .delete_many(doc! { "student_id": *student_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    /// 강의 삭제 시 해당 강의의 기록 삭제
    pub async fn delete_by_course(&self, course_id: &ObjectId) -> Result<u64, AppError> {
        let result = self.collection::<AttendanceRecord>()
            .delete_many(doc! { "course_id": *course_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let session_student_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "student_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("session_student_unique".to_string())
                .build())
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "marked_at": -1 })
            .options(IndexOptions::builder()
                .name("student_id_marked_at".to_string())
                .build())
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(IndexOptions::builder()
                .name("course_id".to_string())
                .build())
            .build();

        self.collection::<AttendanceRecord>()
            .create_indexes([session_student_index, student_index, course_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 캐싱을 지원합니다.
//!
//! ## 특징
//!
//! - **하이브리드 스토리지**: MongoDB + Redis 캐싱
//! - **자동 의존성 주입**: 싱글톤 매크로를 통한 DI
//! - **데이터 무결성**: 이메일/학번 유니크 인덱스

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    config::{CacheConfig, UserRole},
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::{normalize_email, User},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 사용자 데이터 액세스 리포지토리
///
/// ## 캐싱 전략
///
/// - **TTL**: `CACHE_TTL_SECONDS` (기본 600초)
/// - **키 패턴**:
///   - 개별 사용자: `user:{user_id}`
///   - 이메일 조회: `user:email:{email}`
///
/// ## 저장소
///
/// - **컬렉션명**: `users`
/// - **인덱스**: email(unique), student_number(unique, sparse), role, created_at(desc)
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let repo = UserRepository::instance();
///
/// let created = repo.create(User::new(name, email, hash, UserRole::Student, None)).await?;
/// let found = repo.find_by_email("ada@example.com").await?;
/// let lecturers = repo.find_all(Some(UserRole::Lecturer)).await?;
/// ```
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn email_cache_key(email: &str) -> String {
        format!("user:email:{}", email)
    }

    /// 이메일 주소로 사용자 조회 (대소문자 무관)
    ///
    /// - **캐시 키**: `user:email:{email}`
    /// - **캐시 미스**: MongoDB에서 조회 후 캐시에 저장
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        let cache_key = Self::email_cache_key(&email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "email": email.as_str() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(user)
    }

    /// 학번으로 사용자 조회 (캐싱 없음)
    pub async fn find_by_student_number(&self, student_number: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "student_number": student_number })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// ID로 사용자 조회
    ///
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(user)
    }

    /// 여러 사용자를 한 번에 조회 (출석 요약/내보내기용, 캐싱 없음)
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.collection::<User>()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 사용자 목록 (역할 필터 선택, 최신순)
    pub async fn find_all(&self, role: Option<UserRole>) -> Result<Vec<User>, AppError> {
        let filter = match role {
            Some(role) => doc! { "role": role.as_str() },
            None => doc! {},
        };

        self.collection::<User>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 새 사용자 생성
    ///
    /// * `Err(AppError::ConflictError)` - 이메일 또는 학번 중복
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if let Some(student_number) = user.student_number.as_deref() {
            if self.find_by_student_number(student_number).await?.is_some() {
                return Err(AppError::ConflictError("이미 등록된 학번입니다".to_string()));
            }
        }

        // 동시 가입 경합은 유니크 인덱스가 잡아 409로 변환됨
        let result = self.collection::<User>()
            .insert_one(&user)
            .await?;

        user.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 사용자 ID를 확인할 수 없습니다".to_string())
        })?);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(user)
    }

    /// 사용자 정보 부분 업데이트 (`$set`)
    ///
    /// `updated_at`은 자동으로 갱신되며, 변경 후 문서를 반환합니다.
    pub async fn update(&self, id: &str, update_doc: Document) -> Result<Option<User>, AppError> {
        self.update_fields(id, update_doc, &[]).await
    }

    /// `$set`과 `$unset`을 함께 적용합니다.
    ///
    /// 학생이 아닌 역할로 바뀔 때 `student_number`를 제거하는 데 사용됩니다.
    /// sparse 유니크 인덱스는 `null` 값도 색인하므로 필드 자체를 지워야 합니다.
    pub async fn update_fields(
        &self,
        id: &str,
        mut set_doc: Document,
        unset_fields: &[&str],
    ) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        set_doc.insert("updated_at", DateTime::now());

        let mut update = doc! { "$set": set_doc };
        if !unset_fields.is_empty() {
            let unset_doc: Document = unset_fields
                .iter()
                .map(|field| (field.to_string(), Bson::String(String::new())))
                .collect();
            update.insert("$unset", unset_doc);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated_user = self.collection::<User>()
            .find_one_and_update(doc! { "_id": object_id }, update)
            .with_options(options)
            .await?;

        if let Some(ref user) = updated_user {
            let _ = self.invalidate_cache(id).await;
            let _ = self.redis.del(&Self::email_cache_key(&user.email)).await;
        }

        Ok(updated_user)
    }

    /// 로그인 시각 기록
    pub async fn touch_last_login(&self, id: &str) -> Result<(), AppError> {
        self.update(id, doc! { "last_login_at": DateTime::now() }).await?;
        Ok(())
    }

    /// 사용자 삭제
    ///
    /// * `Ok(true)` - 삭제됨
    /// * `Ok(false)` - 해당 ID의 사용자가 없음
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let deleted = self.collection::<User>()
            .find_one_and_delete(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        match deleted {
            Some(user) => {
                let _ = self.invalidate_cache(id).await;
                let _ = self.redis.del(&Self::email_cache_key(&user.email)).await;
                let _ = self.invalidate_collection_cache(None).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 역할별 사용자 수
    pub async fn count_by_role(&self, role: UserRole) -> Result<u64, AppError> {
        self.collection::<User>()
            .count_documents(doc! { "role": role.as_str() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 1. `email` 유니크 인덱스
    /// 2. `student_number` 유니크 sparse 인덱스 (학생이 아닌 사용자는 필드가 없음)
    /// 3. `role` 인덱스 (역할별 목록/통계)
    /// 4. `created_at` 내림차순 인덱스
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let student_number_index = IndexModel::builder()
            .keys(doc! { "student_number": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("student_number_unique".to_string())
                .build())
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(IndexOptions::builder()
                .name("role".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, student_number_index, role_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

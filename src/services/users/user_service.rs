//! # 사용자 관리 서비스 구현
//!
//! 계정의 생명주기(가입, 로그인, 조회, 수정, 삭제)를 담당합니다.
//!
//! ## 서비스 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 UserService                  │
//! │  Registration │ Authentication │ Management  │
//! └──────────────────────────────────────────────┘
//!          │                 │               │
//!          ▼                 ▼               ▼
//!   UserRepository     TokenService    CourseRepository
//!                                      AttendanceRepository
//! ```
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 환경별 cost (`BCRYPT_COST`)
//! - **동일한 실패 메시지**: 이메일 없음/비밀번호 불일치를 구분하지 않음
//! - **민감 정보 제거**: 응답 DTO에서 비밀번호 해시 제외

use std::sync::Arc;
use bcrypt::hash;
use mongodb::bson::Document;
use singleton_macro::service;
use crate::{
    config::{PasswordConfig, UserRole},
    domain::{
        entities::users::user::User,
        dto::users::{
            request::{CreateUserRequest, LoginRequest, RegisterRequest, UpdateUserRequest},
            response::{LoginResponse, UserResponse},
        },
    },
    repositories::{
        attendance::attendance_repo::AttendanceRepository,
        courses::course_repo::CourseRepository,
        users::user_repo::UserRepository,
    },
    services::auth::TokenService,
    utils::string_utils::{clean_optional_string, validate_required_string},
};
use crate::errors::errors::AppError;

const INVALID_CREDENTIALS: &str = "잘못된 이메일 또는 비밀번호입니다";

/// 사용자 관리 비즈니스 로직 서비스
///
/// ## 주요 책임
///
/// 1. **가입**: 학생 자가 가입, 관리자의 임의 역할 계정 생성
/// 2. **인증**: 비밀번호 검증 후 JWT 발급, 마지막 로그인 시각 기록
/// 3. **관리**: 목록/단건 조회, 부분 수정, 삭제와 연관 데이터 정리
///
/// ```rust,ignore
/// let user_service = UserService::instance();
///
/// let login = user_service.login(request).await?;
/// println!("{} 로그인", login.user.email);
/// ```
#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    course_repo: Arc<CourseRepository>,
    attendance_repo: Arc<AttendanceRepository>,
}

impl UserService {
    /// 학생 자가 가입
    ///
    /// 역할은 항상 `student`입니다.
    ///
    /// * `Err(AppError::ConflictError)` - 이메일 또는 학번 중복
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        let name = validate_required_string(&request.name, "name")?;
        let password_hash = hash_password(&request.password)?;

        let user = User::new(
            name,
            request.email,
            password_hash,
            UserRole::Student,
            clean_optional_string(request.student_number),
        );

        let created = self.user_repo.create(user).await?;
        log::info!("학생 가입 완료: {}", created.email);

        Ok(UserResponse::from(created))
    }

    /// 관리자의 사용자 생성
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        let role = request.parsed_role().map_err(AppError::ValidationError)?;
        let name = validate_required_string(&request.name, "name")?;
        let password_hash = hash_password(&request.password)?;

        let user = User::new(
            name,
            request.email,
            password_hash,
            role,
            clean_optional_string(request.student_number),
        );

        let created = self.user_repo.create(user).await?;
        log::info!("사용자 생성 완료: {} ({})", created.email, created.role);

        Ok(UserResponse::from(created))
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 검증 성공 시 마지막 로그인 시각을 기록하고 액세스 토큰을 발급합니다.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self.verify_password(&request.email, &request.password).await?;
        let user_id = user.id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let token = TokenService::instance().issue_for(&user)?;

        if let Err(e) = self.user_repo.touch_last_login(&user_id).await {
            log::warn!("마지막 로그인 시각 기록 실패 ({}): {}", user_id, e);
        }

        log::info!("로그인 성공: {} ({})", user.email, user.role);

        Ok(LoginResponse::new(user, token))
    }

    /// 비밀번호 검증
    ///
    /// * `Err(AppError::AuthenticationError)` - 이메일 없음, 비밀번호 불일치, 비활성 계정
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                log::warn!("로그인 실패 (존재하지 않는 이메일): {}", email);
                AppError::AuthenticationError(INVALID_CREDENTIALS.to_string())
            })?;

        let verify_start = std::time::Instant::now();
        let is_valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !is_valid {
            log::warn!("로그인 실패 (비밀번호 불일치): {}", user.email);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            log::warn!("로그인 실패 (비활성 계정): {}", user.email);
            return Err(AppError::AuthenticationError("비활성화된 계정입니다".to_string()));
        }

        log::debug!("Total password verification took: {:?}", start_time.elapsed());

        Ok(user)
    }

    /// ID로 사용자 조회
    ///
    /// * `Err(AppError::NotFound)` - 해당 ID의 사용자가 없음
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        self.get_user(id).await.map(UserResponse::from)
    }

    /// 사용자 목록 (역할 필터 선택)
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<UserResponse>, AppError> {
        let users = self.user_repo.find_all(role).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// 사용자 정보 부분 수정 (관리자)
    ///
    /// * `Err(AppError::ValidationError)` - 변경할 필드가 없거나 학생이 아닌데 학번 지정
    /// * `Err(AppError::ConflictError)` - 학번 중복, 담당 강의가 있는 강의자의 역할 변경
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        if request.is_empty() {
            return Err(AppError::ValidationError("변경할 필드가 없습니다".to_string()));
        }

        let existing = self.get_user(id).await?;
        let plan = plan_user_update(&existing, &request)?;

        if let Some(ref student_number) = plan.student_number_to_check {
            if let Some(other) = self.user_repo.find_by_student_number(student_number).await? {
                if other.id != existing.id {
                    return Err(AppError::ConflictError("이미 등록된 학번입니다".to_string()));
                }
            }
        }

        if existing.role == UserRole::Lecturer && plan.new_role.is_some_and(|r| r != UserRole::Lecturer) {
            let object_id = existing.id
                .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
            if self.course_repo.count_by_lecturer(&object_id).await? > 0 {
                return Err(AppError::ConflictError(
                    "담당 강의가 있는 강의자의 역할은 변경할 수 없습니다".to_string()
                ));
            }
        }

        let unset: &[&str] = if plan.clear_student_number { &["student_number"] } else { &[] };

        let updated = self.user_repo
            .update_fields(id, plan.set, unset)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("사용자 정보 수정: {}", updated.email);

        Ok(UserResponse::from(updated))
    }

    /// 사용자 삭제 (관리자)
    ///
    /// 학생이면 수강 명단과 출석 기록도 함께 정리합니다.
    ///
    /// * `Err(AppError::ValidationError)` - 자기 자신 삭제 시도
    /// * `Err(AppError::ConflictError)` - 담당 강의가 있는 강의자
    pub async fn delete_user(&self, id: &str, acting_admin_id: &str) -> Result<(), AppError> {
        if id == acting_admin_id {
            return Err(AppError::ValidationError("자기 자신은 삭제할 수 없습니다".to_string()));
        }

        let user = self.get_user(id).await?;
        let object_id = user.id
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        if user.is_lecturer() && self.course_repo.count_by_lecturer(&object_id).await? > 0 {
            return Err(AppError::ConflictError(
                "담당 강의가 있는 강의자는 삭제할 수 없습니다".to_string()
            ));
        }

        if !self.user_repo.delete(id).await? {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        if user.is_student() {
            let courses = self.course_repo.remove_student_from_all(&object_id).await?;
            let records = self.attendance_repo.delete_by_student(&object_id).await?;
            log::info!("학생 데이터 정리: 강의 {}개, 출석 기록 {}건", courses, records);
        }

        log::warn!("사용자 삭제: {} (관리자: {})", user.email, acting_admin_id);

        Ok(())
    }
}

/// 사용자 수정 요청을 적용할 변경 내용
#[derive(Debug, Default)]
struct UserUpdatePlan {
    set: Document,
    clear_student_number: bool,
    student_number_to_check: Option<String>,
    new_role: Option<UserRole>,
}

/// 기존 사용자와 수정 요청으로 `$set`/`$unset` 내용을 결정합니다.
///
/// 학번은 최종 역할이 학생일 때만 유지됩니다.
fn plan_user_update(existing: &User, request: &UpdateUserRequest) -> Result<UserUpdatePlan, AppError> {
    let mut plan = UserUpdatePlan::default();

    if let Some(ref name) = request.name {
        plan.set.insert("name", validate_required_string(name, "name")?);
    }

    let new_role = request.parsed_role().map_err(AppError::ValidationError)?;
    if let Some(role) = new_role {
        plan.set.insert("role", role.as_str());
        plan.new_role = Some(role);
    }

    if let Some(is_active) = request.is_active {
        plan.set.insert("is_active", is_active);
    }

    let final_role = new_role.unwrap_or(existing.role);
    let student_number = clean_optional_string(request.student_number.clone());

    if final_role == UserRole::Student {
        if let Some(number) = student_number {
            plan.set.insert("student_number", number.as_str());
            plan.student_number_to_check = Some(number);
        }
    } else {
        if student_number.is_some() {
            return Err(AppError::ValidationError("학번은 학생 계정에만 지정할 수 있습니다".to_string()));
        }
        plan.clear_student_number = existing.student_number.is_some();
    }

    Ok(plan)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let hash_start = std::time::Instant::now();
    let password_hash = hash(password, PasswordConfig::bcrypt_cost())
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
    log::info!("Password hashing took: {:?}", hash_start.elapsed());

    Ok(password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            UserRole::Student,
            Some("S1001".to_string()),
        )
    }

    #[test]
    fn test_plan_sets_only_provided_fields() {
        let request = UpdateUserRequest {
            name: Some("Ada L.".to_string()),
            is_active: Some(false),
            ..Default::default()
        };

        let plan = plan_user_update(&student(), &request).unwrap();

        assert_eq!(plan.set.get_str("name").unwrap(), "Ada L.");
        assert!(!plan.set.get_bool("is_active").unwrap());
        assert!(!plan.set.contains_key("role"));
        assert!(!plan.clear_student_number);
        assert!(plan.new_role.is_none());
    }

    #[test]
    fn test_promoting_student_clears_student_number() {
        let request = UpdateUserRequest {
            role: Some("lecturer".to_string()),
            ..Default::default()
        };

        let plan = plan_user_update(&student(), &request).unwrap();

        assert_eq!(plan.set.get_str("role").unwrap(), "lecturer");
        assert!(plan.clear_student_number);
        assert_eq!(plan.new_role, Some(UserRole::Lecturer));
    }

    #[test]
    fn test_student_number_rejected_for_non_students() {
        let request = UpdateUserRequest {
            role: Some("admin".to_string()),
            student_number: Some("S9".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            plan_user_update(&student(), &request),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_new_student_number_is_checked_for_duplicates() {
        let request = UpdateUserRequest {
            student_number: Some(" S2002 ".to_string()),
            ..Default::default()
        };

        let plan = plan_user_update(&student(), &request).unwrap();

        assert_eq!(plan.set.get_str("student_number").unwrap(), "S2002");
        assert_eq!(plan.student_number_to_check.as_deref(), Some("S2002"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let request = UpdateUserRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(plan_user_update(&student(), &request).is_err());
    }
}

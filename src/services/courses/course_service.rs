//! # 강의 관리 서비스 구현
//!
//! 강의 생성/수정/삭제, 수강생 등록과 역할별 강의 조회를 담당합니다.
//!
//! ## 접근 규칙
//!
//! | 역할 | 목록 | 단건 조회 | 세션/출석 관리 |
//! |------|------|-----------|----------------|
//! | admin | 전체 | 전체 | 전체 |
//! | lecturer | 담당 강의 | 담당 강의 | 담당 강의 |
//! | student | 수강 강의 | 수강 강의 | 불가 |

use std::collections::HashSet;
use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId};
use singleton_macro::service;
use crate::{
    config::UserRole,
    domain::{
        dto::courses::{CourseResponse, CreateCourseRequest, EnrollStudentsRequest, UpdateCourseRequest},
        entities::courses::course::Course,
        models::auth::AuthenticatedUser,
    },
    repositories::{
        attendance::attendance_repo::AttendanceRepository,
        courses::course_repo::CourseRepository,
        sessions::session_repo::SessionRepository,
        users::user_repo::UserRepository,
    },
    utils::string_utils::{clean_optional_string, parse_object_id, validate_required_string},
};
use crate::errors::errors::AppError;

/// 강의 관리 비즈니스 로직 서비스
///
/// ```rust,ignore
/// let course_service = CourseService::instance();
/// let courses = course_service.list_courses(&user).await?;
/// ```
#[service(name = "course")]
pub struct CourseService {
    course_repo: Arc<CourseRepository>,
    user_repo: Arc<UserRepository>,
    session_repo: Arc<SessionRepository>,
    attendance_repo: Arc<AttendanceRepository>,
}

impl CourseService {
    /// 역할별 강의 목록
    pub async fn list_courses(&self, user: &AuthenticatedUser) -> Result<Vec<CourseResponse>, AppError> {
        let courses = match user.role {
            UserRole::Admin => self.course_repo.find_all().await?,
            UserRole::Lecturer => self.course_repo.find_by_lecturer(&user.object_id()?).await?,
            UserRole::Student => self.course_repo.find_by_student(&user.object_id()?).await?,
        };

        Ok(courses.into_iter().map(CourseResponse::from).collect())
    }

    /// 강의 단건 조회 (담당 강의자, 수강생, 관리자)
    pub async fn get_course(&self, id: &str, user: &AuthenticatedUser) -> Result<CourseResponse, AppError> {
        let course = self.find_course(id).await?;

        if !can_view_course(&course, user) {
            return Err(AppError::AuthorizationError("이 강의에 접근할 권한이 없습니다".to_string()));
        }

        Ok(CourseResponse::from(course))
    }

    /// 존재하는 강의를 가져옵니다.
    ///
    /// * `Err(AppError::NotFound)` - 해당 ID의 강의가 없음
    pub async fn find_course(&self, id: &str) -> Result<Course, AppError> {
        parse_object_id(id, "course_id")?;

        self.course_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("강의를 찾을 수 없습니다".to_string()))
    }

    /// 세션/출석을 관리할 수 있는 강의를 가져옵니다 (담당 강의자 또는 관리자).
    ///
    /// * `Err(AppError::AuthorizationError)` - 담당 강의가 아님
    pub async fn find_managed_course(&self, id: &str, user: &AuthenticatedUser) -> Result<Course, AppError> {
        let course = self.find_course(id).await?;

        if !can_manage_course(&course, user) {
            return Err(AppError::AuthorizationError("담당 강의가 아닙니다".to_string()));
        }

        Ok(course)
    }

    /// 강의 생성 (관리자)
    ///
    /// * `Err(AppError::ConflictError)` - 강의 코드 중복
    pub async fn create_course(&self, request: CreateCourseRequest) -> Result<CourseResponse, AppError> {
        let code = validate_required_string(&request.code, "code")?;
        let title = validate_required_string(&request.title, "title")?;
        let lecturer_id = self.require_active_lecturer(&request.lecturer_id).await?;

        let course = Course::new(&code, title, clean_optional_string(request.description), lecturer_id);
        let created = self.course_repo.create(course).await?;

        log::info!("강의 생성: {} ({})", created.code, created.title);

        Ok(CourseResponse::from(created))
    }

    /// 강의 정보 부분 수정 (관리자)
    pub async fn update_course(&self, id: &str, request: UpdateCourseRequest) -> Result<CourseResponse, AppError> {
        if request.is_empty() {
            return Err(AppError::ValidationError("변경할 필드가 없습니다".to_string()));
        }

        self.find_course(id).await?;

        let mut update = doc! {};
        if let Some(ref title) = request.title {
            update.insert("title", validate_required_string(title, "title")?);
        }
        if let Some(description) = clean_optional_string(request.description.clone()) {
            update.insert("description", description);
        }
        if let Some(ref lecturer_id) = request.lecturer_id {
            update.insert("lecturer_id", self.require_active_lecturer(lecturer_id).await?);
        }

        let updated = self.course_repo
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("강의를 찾을 수 없습니다".to_string()))?;

        log::info!("강의 수정: {}", updated.code);

        Ok(CourseResponse::from(updated))
    }

    /// 강의 삭제 (관리자)
    ///
    /// 강의의 세션과 출석 기록도 함께 삭제됩니다.
    pub async fn delete_course(&self, id: &str) -> Result<(), AppError> {
        let course = self.find_course(id).await?;
        let object_id = course.id
            .ok_or_else(|| AppError::InternalError("강의 ID가 없습니다".to_string()))?;

        if !self.course_repo.delete(id).await? {
            return Err(AppError::NotFound("강의를 찾을 수 없습니다".to_string()));
        }

        let sessions = self.session_repo.delete_by_course(&object_id).await?;
        let records = self.attendance_repo.delete_by_course(&object_id).await?;

        log::warn!("강의 삭제: {} (세션 {}개, 출석 기록 {}건)", course.code, sessions, records);

        Ok(())
    }

    /// 수강생 등록 (관리자)
    ///
    /// 이미 등록된 학생은 무시됩니다.
    ///
    /// * `Err(AppError::NotFound)` - 존재하지 않는 사용자 포함
    /// * `Err(AppError::ValidationError)` - 학생이 아닌 사용자 포함
    pub async fn enroll_students(&self, id: &str, request: EnrollStudentsRequest) -> Result<CourseResponse, AppError> {
        self.find_course(id).await?;

        let student_ids = dedup_object_ids(&request.student_ids)?;
        let users = self.user_repo.find_by_ids(&student_ids).await?;

        let found: HashSet<ObjectId> = users.iter().filter_map(|u| u.id).collect();
        let missing: Vec<String> = student_ids.iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_hex())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!("사용자를 찾을 수 없습니다: {}", missing.join(", "))));
        }

        let not_students: Vec<&str> = users.iter()
            .filter(|u| !u.is_student())
            .map(|u| u.email.as_str())
            .collect();
        if !not_students.is_empty() {
            return Err(AppError::ValidationError(format!(
                "학생만 수강 등록할 수 있습니다: {}",
                not_students.join(", ")
            )));
        }

        let updated = self.course_repo
            .add_students(id, &student_ids)
            .await?
            .ok_or_else(|| AppError::NotFound("강의를 찾을 수 없습니다".to_string()))?;

        log::info!("수강생 등록: {} (+{}명 요청)", updated.code, student_ids.len());

        Ok(CourseResponse::from(updated))
    }

    /// 수강생 제외 (관리자)
    ///
    /// 명단에 없는 학생이면 변경 없이 강의를 반환합니다.
    pub async fn unenroll_student(&self, id: &str, student_id: &str) -> Result<CourseResponse, AppError> {
        let student_object_id = parse_object_id(student_id, "student_id")?;
        self.find_course(id).await?;

        let updated = self.course_repo
            .remove_student(id, &student_object_id)
            .await?
            .ok_or_else(|| AppError::NotFound("강의를 찾을 수 없습니다".to_string()))?;

        log::info!("수강생 제외: {} - {}", updated.code, student_id);

        Ok(CourseResponse::from(updated))
    }

    /// 활성 강의자 계정인지 확인하고 ObjectId를 반환합니다.
    async fn require_active_lecturer(&self, lecturer_id: &str) -> Result<ObjectId, AppError> {
        let object_id = parse_object_id(lecturer_id, "lecturer_id")?;

        let lecturer = self.user_repo
            .find_by_id(&object_id.to_hex())
            .await?
            .ok_or_else(|| AppError::NotFound("강의자를 찾을 수 없습니다".to_string()))?;

        if !lecturer.is_lecturer() || !lecturer.is_active {
            return Err(AppError::ValidationError(
                "lecturer_id는 활성 상태의 강의자 계정이어야 합니다".to_string()
            ));
        }

        Ok(object_id)
    }
}

/// 관리자, 담당 강의자, 수강생만 강의를 볼 수 있습니다.
pub fn can_view_course(course: &Course, user: &AuthenticatedUser) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Lecturer => user.object_id().is_ok_and(|id| course.is_taught_by(&id)),
        UserRole::Student => user.object_id().is_ok_and(|id| course.is_enrolled(&id)),
    }
}

/// 관리자와 담당 강의자만 세션/출석을 관리할 수 있습니다.
pub fn can_manage_course(course: &Course, user: &AuthenticatedUser) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Lecturer => user.object_id().is_ok_and(|id| course.is_taught_by(&id)),
        UserRole::Student => false,
    }
}

/// 순서를 유지하며 중복을 제거합니다.
fn dedup_object_ids(ids: &[String]) -> Result<Vec<ObjectId>, AppError> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(ids.len());

    for id in ids {
        let object_id = parse_object_id(id, "student_ids")?;
        if seen.insert(object_id) {
            result.push(object_id);
        }
    }

    Ok(result)
}

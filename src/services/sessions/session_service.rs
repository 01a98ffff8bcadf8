//! # 출석 세션 서비스 구현
//!
//! 강의자가 여는 QR 출석 세션의 생성, 조회, 종료를 담당합니다.
//!
//! ## 세션 생명주기
//!
//! ```text
//! create ──▶ active (now < expires_at) ──▶ expired (스캔 불가)
//!               │                              │
//!               └──────── close ◀──────────────┘
//!                           │
//!                           ▼
//!               미기록 수강생 → Absent (marked_by: system)
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use crate::{
    config::{AttendanceConfig, UserRole},
    domain::{
        dto::sessions::{
            CloseSessionResponse, CreateSessionRequest, CreatedSessionResponse, QrCodeResponse, SessionResponse,
        },
        entities::{
            attendance::attendance_record::{AttendanceRecord, AttendanceStatus, MarkedBy},
            courses::course::Course,
            sessions::session::AttendanceSession,
        },
        models::auth::AuthenticatedUser,
    },
    repositories::{
        attendance::attendance_repo::AttendanceRepository,
        courses::course_repo::CourseRepository,
        sessions::session_repo::SessionRepository,
    },
    services::courses::CourseService,
    utils::string_utils::{clean_optional_string, parse_object_id, validate_required_string},
};
use crate::errors::errors::AppError;

/// 출석 세션 비즈니스 로직 서비스
///
/// 모든 작업은 강의의 담당 강의자 또는 관리자만 수행할 수 있습니다.
#[service(name = "session")]
pub struct SessionService {
    session_repo: Arc<SessionRepository>,
    course_repo: Arc<CourseRepository>,
    attendance_repo: Arc<AttendanceRepository>,
}

impl SessionService {
    /// 새 출석 세션을 엽니다.
    ///
    /// * `Err(AppError::ValidationError)` - 유효 시간이 `1..=ATTENDANCE_MAX_SESSION_MINUTES` 밖
    /// * `Err(AppError::AuthorizationError)` - 담당 강의가 아님
    pub async fn create_session(
        &self,
        request: CreateSessionRequest,
        user: &AuthenticatedUser,
    ) -> Result<CreatedSessionResponse, AppError> {
        let duration = resolve_duration(
            request.duration_minutes,
            AttendanceConfig::default_session_minutes(),
            AttendanceConfig::max_session_minutes(),
        )?;
        let title = validate_required_string(&request.title, "title")?;

        let course = CourseService::instance()
            .find_managed_course(&request.course_id, user)
            .await?;
        let course_id = course.id
            .ok_or_else(|| AppError::InternalError("강의 ID가 없습니다".to_string()))?;

        let session = AttendanceSession::open(
            course_id,
            user.object_id()?,
            title,
            clean_optional_string(request.location),
            duration,
        );

        let created = self.session_repo.create(session).await?;
        let qr = QrCodeResponse::for_session(&created)
            .ok_or_else(|| AppError::InternalError("세션 ID가 없습니다".to_string()))?;

        log::info!(
            "출석 세션 생성: {} / {} ({}분)",
            course.code,
            created.title,
            duration
        );

        Ok(CreatedSessionResponse {
            session: SessionResponse::from(created),
            qr,
        })
    }

    /// 세션 목록
    ///
    /// `course_id`가 있으면 해당 강의의 세션만, 없으면 관리자는 전체,
    /// 강의자는 담당 강의 전체의 세션을 반환합니다.
    pub async fn list_sessions(
        &self,
        course_id: Option<&str>,
        user: &AuthenticatedUser,
    ) -> Result<Vec<SessionResponse>, AppError> {
        let sessions = match course_id {
            Some(course_id) => {
                let course = CourseService::instance().find_managed_course(course_id, user).await?;
                let course_id = course.id
                    .ok_or_else(|| AppError::InternalError("강의 ID가 없습니다".to_string()))?;
                self.session_repo.find_by_course(&course_id).await?
            }
            None => match user.role {
                UserRole::Admin => self.session_repo.find_all().await?,
                UserRole::Lecturer => {
                    let courses = self.course_repo.find_by_lecturer(&user.object_id()?).await?;
                    let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();
                    self.session_repo.find_by_courses(&course_ids).await?
                }
                UserRole::Student => {
                    return Err(AppError::AuthorizationError("세션 목록을 조회할 권한이 없습니다".to_string()));
                }
            },
        };

        Ok(sessions.into_iter().map(SessionResponse::from).collect())
    }

    /// 존재하는 세션을 가져옵니다 (권한 확인 없음).
    pub async fn find_session(&self, id: &str) -> Result<AttendanceSession, AppError> {
        parse_object_id(id, "session_id")?;

        self.session_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("세션을 찾을 수 없습니다".to_string()))
    }

    /// 관리 권한이 있는 세션과 그 강의를 가져옵니다.
    pub async fn find_managed_session(
        &self,
        id: &str,
        user: &AuthenticatedUser,
    ) -> Result<(AttendanceSession, Course), AppError> {
        let session = self.find_session(id).await?;
        let course = CourseService::instance()
            .find_managed_course(&session.course_id.to_hex(), user)
            .await?;

        Ok((session, course))
    }

    pub async fn get_session(&self, id: &str, user: &AuthenticatedUser) -> Result<SessionResponse, AppError> {
        let (session, _) = self.find_managed_session(id, user).await?;
        Ok(SessionResponse::from(session))
    }

    /// 세션 QR 코드 데이터
    ///
    /// 종료된 세션이어도 반환하며, `accepts_scans`로 스캔 가능 여부를 알려줍니다.
    pub async fn get_qr_code(&self, id: &str, user: &AuthenticatedUser) -> Result<QrCodeResponse, AppError> {
        let (session, _) = self.find_managed_session(id, user).await?;

        QrCodeResponse::for_session(&session)
            .ok_or_else(|| AppError::InternalError("세션 ID가 없습니다".to_string()))
    }

    /// 세션을 종료하고 미기록 수강생을 결석 처리합니다.
    ///
    /// * `Err(AppError::ConflictError)` - 이미 종료된 세션
    pub async fn close_session(&self, id: &str, user: &AuthenticatedUser) -> Result<CloseSessionResponse, AppError> {
        let (session, course) = self.find_managed_session(id, user).await?;

        if !session.is_active {
            return Err(AppError::ConflictError("이미 종료된 세션입니다".to_string()));
        }

        let closed = self.session_repo
            .close(id)
            .await?
            .ok_or_else(|| AppError::ConflictError("이미 종료된 세션입니다".to_string()))?;
        let session_id = closed.id
            .ok_or_else(|| AppError::InternalError("세션 ID가 없습니다".to_string()))?;

        let recorded: Vec<ObjectId> = self.attendance_repo
            .find_by_session(&session_id)
            .await?
            .into_iter()
            .map(|record| record.student_id)
            .collect();

        let absentees: Vec<AttendanceRecord> = absent_student_ids(&course.student_ids, &recorded)
            .into_iter()
            .map(|student_id| AttendanceRecord::new(
                session_id,
                closed.course_id,
                student_id,
                AttendanceStatus::Absent,
                MarkedBy::System,
            ))
            .collect();

        let absentees_marked = self.attendance_repo.insert_many(&absentees).await?;

        log::info!(
            "출석 세션 종료: {} / {} (결석 처리 {}명)",
            course.code,
            closed.title,
            absentees_marked
        );

        Ok(CloseSessionResponse {
            session: SessionResponse::from(closed),
            absentees_marked,
        })
    }
}

/// 요청된 유효 시간을 확인합니다. 없으면 기본값을 사용합니다.
fn resolve_duration(requested: Option<i64>, default_minutes: i64, max_minutes: i64) -> Result<i64, AppError> {
    let duration = requested.unwrap_or(default_minutes);

    if !(1..=max_minutes).contains(&duration) {
        return Err(AppError::ValidationError(format!(
            "duration_minutes는 1-{} 사이여야 합니다",
            max_minutes
        )));
    }

    Ok(duration)
}

/// 수강 명단 중 아직 기록이 없는 학생
fn absent_student_ids(enrolled: &[ObjectId], recorded: &[ObjectId]) -> Vec<ObjectId> {
    let recorded: HashSet<&ObjectId> = recorded.iter().collect();

    enrolled.iter()
        .filter(|id| !recorded.contains(id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_defaults_and_bounds() {
        assert_eq!(resolve_duration(None, 15, 240).unwrap(), 15);
        assert_eq!(resolve_duration(Some(1), 15, 240).unwrap(), 1);
        assert_eq!(resolve_duration(Some(240), 15, 240).unwrap(), 240);

        assert!(matches!(resolve_duration(Some(0), 15, 240), Err(AppError::ValidationError(_))));
        assert!(matches!(resolve_duration(Some(-5), 15, 240), Err(AppError::ValidationError(_))));
        assert!(matches!(resolve_duration(Some(241), 15, 240), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_absentees_are_enrolled_students_without_records() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let c = ObjectId::new();
        let dropped = ObjectId::new();

        let absent = absent_student_ids(&[a, b, c], &[b, dropped]);

        assert_eq!(absent, vec![a, c]);
        assert!(absent_student_ids(&[], &[a]).is_empty());
    }
}

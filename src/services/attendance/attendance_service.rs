//! # 출석 서비스 구현
//!
//! QR 스캔 출석, 출석 이력 조회, 상태 수동 변경, 강의별 요약과 내보내기를 담당합니다.
//!
//! ## QR 스캔 처리 순서
//!
//! 1. QR 원문 파싱 (`{"sessionId","token"}` 또는 `"<sessionId>:<token>"`) → 400
//! 2. 세션 존재 → 404
//! 3. 스캔 가능 (`is_active && now < expires_at`) → 400
//! 4. 토큰 일치 → 400
//! 5. 수강 여부 → 403
//! 6. 같은 세션 중복 기록 → 409
//! 7. 세션 시작 후 `ATTENDANCE_LATE_AFTER_MINUTES` 이내면 `Present`, 이후면 `Late`

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde_json::{json, Value};
use singleton_macro::service;
use crate::{
    config::AttendanceConfig,
    domain::{
        dto::{
            attendance::{AttendanceRecordResponse, CourseAttendanceSummary, ExportFormat, StudentAttendanceSummary},
            format_datetime,
        },
        entities::{
            attendance::attendance_record::{AttendanceRecord, AttendanceStatus, MarkedBy},
            courses::course::Course,
            sessions::session::AttendanceSession,
            users::user::User,
        },
        models::{auth::AuthenticatedUser, qr::QrPayload},
    },
    repositories::{
        attendance::attendance_repo::AttendanceRepository,
        courses::course_repo::CourseRepository,
        sessions::session_repo::SessionRepository,
        users::user_repo::UserRepository,
    },
    services::{courses::CourseService, sessions::SessionService},
    utils::export_utils::{sanitize_export_data, to_csv, ExportRecord},
};
use crate::errors::errors::AppError;

/// 강의 출석 내보내기 결과
#[derive(Debug, Clone)]
pub enum CourseExport {
    Csv { filename: String, body: String },
    Json(Vec<ExportRecord>),
}

/// 출석 비즈니스 로직 서비스
///
/// ```rust,ignore
/// let attendance_service = AttendanceService::instance();
/// let record = attendance_service.mark_attendance(&student, &qr_data).await?;
/// ```
#[service(name = "attendance")]
pub struct AttendanceService {
    attendance_repo: Arc<AttendanceRepository>,
    session_repo: Arc<SessionRepository>,
    course_repo: Arc<CourseRepository>,
    user_repo: Arc<UserRepository>,
}

impl AttendanceService {
    /// 학생의 QR 스캔으로 출석을 기록합니다.
    pub async fn mark_attendance(
        &self,
        student: &AuthenticatedUser,
        qr_data: &str,
    ) -> Result<AttendanceRecordResponse, AppError> {
        let payload = QrPayload::parse(qr_data).map_err(AppError::ValidationError)?;
        let student_id = student.object_id()?;

        let session = self.session_repo
            .find_by_id(&payload.session_id.to_hex())
            .await?
            .ok_or_else(|| AppError::NotFound("세션을 찾을 수 없습니다".to_string()))?;

        let now = DateTime::now();
        check_scan(&session, &payload, now)?;

        let course = self.course_repo
            .find_by_id(&session.course_id.to_hex())
            .await?
            .ok_or_else(|| AppError::NotFound("강의를 찾을 수 없습니다".to_string()))?;

        if !course.is_enrolled(&student_id) {
            log::warn!("미수강생 스캔 시도: {} → {}", student.user_id, course.code);
            return Err(AppError::AuthorizationError("이 강의의 수강생이 아닙니다".to_string()));
        }

        if self.attendance_repo
            .find_by_session_and_student(&payload.session_id, &student_id)
            .await?
            .is_some()
        {
            return Err(AppError::ConflictError("이미 출석이 기록되었습니다".to_string()));
        }

        let status = session.status_for_scan_at(now, AttendanceConfig::late_after_minutes());
        let mut record = AttendanceRecord::new(payload.session_id, session.course_id, student_id, status, MarkedBy::Qr);
        record.marked_at = now;

        let created = self.attendance_repo.create(record).await.map_err(|e| match e {
            AppError::ConflictError(_) => AppError::ConflictError("이미 출석이 기록되었습니다".to_string()),
            other => other,
        })?;

        log::info!("출석 기록: {} / {} → {}", course.code, session.title, created.status);

        Ok(AttendanceRecordResponse::from(created)
            .with_session(&session)
            .with_course(&course))
    }

    /// 학생 본인의 출석 이력 (최신순)
    pub async fn my_attendance(&self, student: &AuthenticatedUser) -> Result<Vec<AttendanceRecordResponse>, AppError> {
        let records = self.attendance_repo.find_by_student(&student.object_id()?).await?;

        let session_ids = unique_ids(records.iter().map(|r| r.session_id));
        let course_ids = unique_ids(records.iter().map(|r| r.course_id));

        let sessions = index_by_id(self.session_repo.find_by_ids(&session_ids).await?, |s| s.id);
        let courses = index_by_id(self.course_repo.find_by_ids(&course_ids).await?, |c| c.id);

        Ok(records.into_iter()
            .map(|record| {
                let session = sessions.get(&record.session_id);
                let course = courses.get(&record.course_id);
                let mut response = AttendanceRecordResponse::from(record);
                if let Some(session) = session {
                    response = response.with_session(session);
                }
                if let Some(course) = course {
                    response = response.with_course(course);
                }
                response
            })
            .collect())
    }

    /// 세션의 출석 기록 (담당 강의자/관리자)
    pub async fn session_attendance(
        &self,
        session_id: &str,
        user: &AuthenticatedUser,
    ) -> Result<Vec<AttendanceRecordResponse>, AppError> {
        let (session, course) = SessionService::instance().find_managed_session(session_id, user).await?;
        let session_object_id = session.id
            .ok_or_else(|| AppError::InternalError("세션 ID가 없습니다".to_string()))?;

        let records = self.attendance_repo.find_by_session(&session_object_id).await?;
        let student_ids = unique_ids(records.iter().map(|r| r.student_id));
        let students = index_by_id(self.user_repo.find_by_ids(&student_ids).await?, |u| u.id);

        Ok(records.into_iter()
            .map(|record| {
                let student = students.get(&record.student_id);
                let mut response = AttendanceRecordResponse::from(record)
                    .with_session(&session)
                    .with_course(&course);
                if let Some(student) = student {
                    response = response.with_student(student);
                }
                response
            })
            .collect())
    }

    /// 출석 상태 수동 변경 (담당 강의자/관리자)
    ///
    /// 변경된 기록의 `marked_by`는 `lecturer`가 됩니다.
    pub async fn update_status(
        &self,
        record_id: &str,
        status: AttendanceStatus,
        user: &AuthenticatedUser,
    ) -> Result<AttendanceRecordResponse, AppError> {
        let record = self.attendance_repo
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound("출석 기록을 찾을 수 없습니다".to_string()))?;

        let course = CourseService::instance()
            .find_managed_course(&record.course_id.to_hex(), user)
            .await?;

        let updated = self.attendance_repo
            .update_status(record_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("출석 기록을 찾을 수 없습니다".to_string()))?;

        log::info!(
            "출석 상태 변경: {} / {} {} → {} (by {})",
            course.code,
            record.student_id.to_hex(),
            record.status,
            updated.status,
            user.user_id
        );

        Ok(AttendanceRecordResponse::from(updated).with_course(&course))
    }

    /// 강의 출석 요약
    ///
    /// 분모는 종료되었거나 유효 시간이 지난 세션 수이며,
    /// 진행 중인 세션의 기록은 집계하지 않습니다.
    pub async fn course_summary(
        &self,
        course_id: &str,
        user: &AuthenticatedUser,
    ) -> Result<CourseAttendanceSummary, AppError> {
        let course = CourseService::instance().find_managed_course(course_id, user).await?;
        let course_object_id = course.id
            .ok_or_else(|| AppError::InternalError("강의 ID가 없습니다".to_string()))?;

        let ended: HashSet<ObjectId> = self.session_repo
            .find_ended_by_course(&course_object_id, DateTime::now())
            .await?
            .into_iter()
            .filter_map(|s| s.id)
            .collect();

        let records = self.attendance_repo.find_by_course(&course_object_id).await?;
        let students = self.user_repo.find_by_ids(&course.student_ids).await?;

        Ok(CourseAttendanceSummary {
            course_id: course_object_id.to_hex(),
            course_code: course.code.clone(),
            course_title: course.title.clone(),
            total_sessions: ended.len() as u32,
            students: summarize_students(&students, &records, &ended),
        })
    }

    /// 강의 출석 기록 내보내기
    ///
    /// 기록마다 학생/세션/강의를 중첩 객체로 묶은 뒤 [`sanitize_export_data`]로 정규화합니다.
    pub async fn export_course(
        &self,
        course_id: &str,
        format: ExportFormat,
        user: &AuthenticatedUser,
    ) -> Result<CourseExport, AppError> {
        let course = CourseService::instance().find_managed_course(course_id, user).await?;
        let course_object_id = course.id
            .ok_or_else(|| AppError::InternalError("강의 ID가 없습니다".to_string()))?;

        let records = self.attendance_repo.find_by_course(&course_object_id).await?;

        let student_ids = unique_ids(records.iter().map(|r| r.student_id));
        let students = index_by_id(self.user_repo.find_by_ids(&student_ids).await?, |u| u.id);
        let sessions = index_by_id(self.session_repo.find_by_course(&course_object_id).await?, |s| s.id);

        let items: Vec<Value> = records.iter()
            .map(|record| export_item(
                record,
                students.get(&record.student_id),
                sessions.get(&record.session_id),
                &course,
            ))
            .collect();

        let rows = sanitize_export_data(&items);
        log::info!("출석 내보내기: {} ({}건, {:?})", course.code, rows.len(), format);

        Ok(match format {
            ExportFormat::Csv => CourseExport::Csv {
                filename: format!("{}_attendance.csv", course.code),
                body: to_csv(&rows),
            },
            ExportFormat::Json => CourseExport::Json(rows),
        })
    }
}

/// 세션 상태와 토큰을 확인합니다.
fn check_scan(session: &AttendanceSession, payload: &QrPayload, now: DateTime) -> Result<(), AppError> {
    if !session.accepts_scans_at(now) {
        return Err(AppError::ValidationError("세션이 종료되었거나 만료되었습니다".to_string()));
    }

    if !session.token_matches(&payload.token) {
        log::warn!("QR 토큰 불일치: session {}", payload.session_id.to_hex());
        return Err(AppError::ValidationError("QR 코드가 유효하지 않습니다".to_string()));
    }

    Ok(())
}

/// 수강생별 상태 집계와 출석률 (종료된 세션의 기록만 집계)
fn summarize_students(
    students: &[User],
    records: &[AttendanceRecord],
    ended_sessions: &HashSet<ObjectId>,
) -> Vec<StudentAttendanceSummary> {
    let total_sessions = ended_sessions.len() as u32;

    let mut by_student: HashMap<ObjectId, Vec<AttendanceStatus>> = HashMap::new();
    for record in records.iter().filter(|r| ended_sessions.contains(&r.session_id)) {
        by_student.entry(record.student_id).or_default().push(record.status);
    }

    students.iter()
        .filter_map(|student| {
            let id = student.id?;
            let mut summary = StudentAttendanceSummary {
                student_id: id.to_hex(),
                student_name: student.name.clone(),
                email: student.email.clone(),
                student_number: student.student_number.clone(),
                ..Default::default()
            };

            for status in by_student.get(&id).map(Vec::as_slice).unwrap_or_default() {
                match status {
                    AttendanceStatus::Present => summary.present += 1,
                    AttendanceStatus::Late => summary.late += 1,
                    AttendanceStatus::Absent => summary.absent += 1,
                    AttendanceStatus::Excused => summary.excused += 1,
                }
            }

            summary.attendance_rate = attendance_rate(summary.present + summary.late, total_sessions);
            Some(summary)
        })
        .collect()
}

/// 백분율, 소수점 둘째 자리 반올림. 세션이 없으면 0.
fn attendance_rate(attended: u32, total_sessions: u32) -> f64 {
    if total_sessions == 0 {
        return 0.0;
    }

    let rate = f64::from(attended) / f64::from(total_sessions) * 100.0;
    (rate * 100.0).round() / 100.0
}

fn export_item(
    record: &AttendanceRecord,
    student: Option<&User>,
    session: Option<&AttendanceSession>,
    course: &Course,
) -> Value {
    let mut item = json!({
        "course": { "code": course.code },
        "marked_at": format_datetime(record.marked_at),
        "status": record.status.as_str(),
    });

    item["student"] = match student {
        Some(student) => json!({
            "name": student.name,
            "id": student.student_number.clone().unwrap_or_else(|| record.student_id.to_hex()),
            "email": student.email,
        }),
        None => json!({ "id": record.student_id.to_hex() }),
    };

    if let Some(session) = session {
        item["session"] = json!({ "title": session.title });
    }

    item
}

fn unique_ids(ids: impl Iterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn index_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> Option<ObjectId>) -> HashMap<ObjectId, T> {
    items.into_iter()
        .filter_map(|item| id(&item).map(|key| (key, item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserRole;

    fn student(name: &str) -> User {
        let mut user = User::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "hash".to_string(),
            UserRole::Student,
            None,
        );
        user.id = Some(ObjectId::new());
        user
    }

    fn record(session_id: ObjectId, student: &User, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(session_id, ObjectId::new(), student.id.unwrap(), status, MarkedBy::Qr)
    }

    fn open_session() -> AttendanceSession {
        let mut session = AttendanceSession::open(ObjectId::new(), ObjectId::new(), "Week 1".to_string(), None, 15);
        session.id = Some(ObjectId::new());
        session
    }

    #[test]
    fn test_attendance_rate_rounding() {
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert_eq!(attendance_rate(3, 3), 100.0);
        assert_eq!(attendance_rate(2, 3), 66.67);
        assert_eq!(attendance_rate(1, 8), 12.5);
    }

    #[test]
    fn test_summary_counts_only_ended_sessions() {
        let ada = student("Ada");
        let alan = student("Alan");
        let week1 = ObjectId::new();
        let week2 = ObjectId::new();
        let running = ObjectId::new();
        let ended: HashSet<ObjectId> = [week1, week2].into_iter().collect();

        let records = vec![
            record(week1, &ada, AttendanceStatus::Present),
            record(week2, &ada, AttendanceStatus::Late),
            record(running, &ada, AttendanceStatus::Present),
            record(week1, &alan, AttendanceStatus::Absent),
            record(week2, &alan, AttendanceStatus::Excused),
        ];

        let summary = summarize_students(&[ada.clone(), alan.clone()], &records, &ended);

        assert_eq!(summary.len(), 2);
        assert_eq!((summary[0].present, summary[0].late), (1, 1));
        assert_eq!(summary[0].attendance_rate, 100.0);
        assert_eq!((summary[1].absent, summary[1].excused), (1, 1));
        assert_eq!(summary[1].attendance_rate, 0.0);
    }

    #[test]
    fn test_enrolled_student_without_records_has_zero_counts() {
        let ada = student("Ada");
        let ended: HashSet<ObjectId> = [ObjectId::new()].into_iter().collect();

        let summary = summarize_students(&[ada], &[], &ended);

        assert_eq!(summary[0].present + summary[0].late + summary[0].absent + summary[0].excused, 0);
        assert_eq!(summary[0].attendance_rate, 0.0);
    }

    #[test]
    fn test_scan_checks_window_then_token() {
        let session = open_session();
        let good = QrPayload::new(session.id.unwrap(), session.qr_token.clone());
        let bad = QrPayload::new(session.id.unwrap(), "forged");

        assert!(check_scan(&session, &good, session.starts_at).is_ok());
        assert!(matches!(check_scan(&session, &bad, session.starts_at), Err(AppError::ValidationError(_))));

        let after_expiry = DateTime::from_millis(session.expires_at.timestamp_millis() + 1);
        assert!(matches!(check_scan(&session, &good, after_expiry), Err(AppError::ValidationError(_))));

        let mut closed = session.clone();
        closed.is_active = false;
        assert!(check_scan(&closed, &good, closed.starts_at).is_err());
    }

    #[test]
    fn test_export_item_is_recovered_by_sanitizer() {
        let mut ada = student("Ada");
        ada.student_number = Some("S1001".to_string());
        let session = open_session();
        let course = Course::new("cs101", "Intro".to_string(), None, ObjectId::new());
        let mut rec = record(session.id.unwrap(), &ada, AttendanceStatus::Late);
        rec.marked_at = DateTime::parse_rfc3339_str("2024-03-04T09:05:30Z").unwrap();

        let item = export_item(&rec, Some(&ada), Some(&session), &course);
        let rows = sanitize_export_data(&[item]);

        assert_eq!(rows[0].student_name, "Ada");
        assert_eq!(rows[0].student_id, "S1001");
        assert_eq!(rows[0].email, "ada@example.com");
        assert_eq!(rows[0].course, "CS101");
        assert_eq!(rows[0].session, "Week 1");
        assert_eq!(rows[0].date, "2024-03-04");
        assert_eq!(rows[0].time, "09:05:30");
        assert_eq!(rows[0].status, "Late");
    }

    #[test]
    fn test_export_item_without_student_still_exports() {
        let course = Course::new("cs101", "Intro".to_string(), None, ObjectId::new());
        let ada = student("Ada");
        let rec = record(ObjectId::new(), &ada, AttendanceStatus::Absent);

        let rows = sanitize_export_data(&[export_item(&rec, None, None, &course)]);

        assert!(!rows[0].is_placeholder());
        assert_eq!(rows[0].student_name, "N/A");
        assert_eq!(rows[0].student_id, ada.id.unwrap().to_hex());
        assert_eq!(rows[0].session, "N/A");
        assert_eq!(rows[0].status, "Absent");
    }

    #[test]
    fn test_unique_ids_keeps_first_occurrence() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_eq!(unique_ids([a, b, a, b].into_iter()), vec![a, b]);
    }
}

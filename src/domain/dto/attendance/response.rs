use serde::{Deserialize, Serialize};
use crate::domain::dto::format_datetime;
use crate::domain::entities::attendance::attendance_record::{AttendanceRecord, AttendanceStatus, MarkedBy};
use crate::domain::entities::courses::course::Course;
use crate::domain::entities::sessions::session::AttendanceSession;
use crate::domain::entities::users::user::User;

/// 출석 기록 응답
///
/// 조회 경로에 따라 학생 이름, 세션 제목, 강의 코드가 함께 채워집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecordResponse {
    pub id: String,
    pub session_id: String,
    pub course_id: String,
    pub student_id: String,
    pub status: AttendanceStatus,
    pub marked_at: String,
    pub marked_by: MarkedBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
}

impl AttendanceRecordResponse {
    pub fn with_student(mut self, student: &User) -> Self {
        self.student_name = Some(student.name.clone());
        self.student_email = Some(student.email.clone());
        self
    }

    pub fn with_session(mut self, session: &AttendanceSession) -> Self {
        self.session_title = Some(session.title.clone());
        self
    }

    pub fn with_course(mut self, course: &Course) -> Self {
        self.course_code = Some(course.code.clone());
        self
    }
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            session_id: record.session_id.to_hex(),
            course_id: record.course_id.to_hex(),
            student_id: record.student_id.to_hex(),
            status: record.status,
            marked_at: format_datetime(record.marked_at),
            marked_by: record.marked_by,
            student_name: None,
            student_email: None,
            session_title: None,
            course_code: None,
        }
    }
}

/// 학생 한 명의 강의 출석 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendanceSummary {
    pub student_id: String,
    pub student_name: String,
    pub email: String,
    pub student_number: Option<String>,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub excused: u32,
    /// `(present + late) / total_sessions`, 소수점 둘째 자리 반올림한 백분율
    pub attendance_rate: f64,
}

/// 강의 출석 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAttendanceSummary {
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    /// 종료되었거나 유효 시간이 지난 세션 수
    pub total_sessions: u32,
    pub students: Vec<StudentAttendanceSummary>,
}

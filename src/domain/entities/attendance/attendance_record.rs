//! Attendance Record Entity
//!
//! 세션별 학생 한 명의 출석 결과입니다. `(session_id, student_id)`는 유니크합니다.

use std::fmt;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 출석 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Absent,
        AttendanceStatus::Excused,
    ];

    /// 대소문자 무관 파싱
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            "excused" => Ok(AttendanceStatus::Excused),
            _ => Err(format!(
                "status must be one of: {}",
                Self::ALL.map(|s| s.as_str()).join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Excused => "Excused",
        }
    }

    /// 출석률 계산 시 출석으로 인정되는 상태인지
    pub fn counts_as_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 기록 생성 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkedBy {
    /// 학생 QR 스캔
    Qr,
    /// 강의자 수동 처리
    Lecturer,
    /// 세션 종료 시 자동 결석 처리
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub session_id: ObjectId,
    pub course_id: ObjectId,
    pub student_id: ObjectId,
    pub status: AttendanceStatus,
    pub marked_at: DateTime,
    pub marked_by: MarkedBy,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl AttendanceRecord {
    pub fn new(
        session_id: ObjectId,
        course_id: ObjectId,
        student_id: ObjectId,
        status: AttendanceStatus,
        marked_by: MarkedBy,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            session_id,
            course_id,
            student_id,
            status,
            marked_at: now,
            marked_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(AttendanceStatus::parse("present").unwrap(), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::parse(" LATE ").unwrap(), AttendanceStatus::Late);
        assert_eq!(AttendanceStatus::parse("Excused").unwrap(), AttendanceStatus::Excused);
    }

    #[test]
    fn test_status_parse_rejects_unknown_value() {
        let err = AttendanceStatus::parse("Sick").unwrap_err();
        assert!(err.contains("Present, Late, Absent, Excused"));
    }

    #[test]
    fn test_attended_statuses() {
        assert!(AttendanceStatus::Present.counts_as_attended());
        assert!(AttendanceStatus::Late.counts_as_attended());
        assert!(!AttendanceStatus::Absent.counts_as_attended());
        assert!(!AttendanceStatus::Excused.counts_as_attended());
    }

    #[test]
    fn test_serialized_forms() {
        assert_eq!(serde_json::to_string(&AttendanceStatus::Late).unwrap(), "\"Late\"");
        assert_eq!(serde_json::to_string(&MarkedBy::System).unwrap(), "\"system\"");
    }
}

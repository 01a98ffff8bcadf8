//! Attendance Session Entity
//!
//! 강의자가 수업 시간에 여는 QR 출석 세션입니다. 세션마다 추측 불가능한
//! `qr_token`이 발급되며, 학생은 이 토큰이 담긴 QR 코드를 스캔해 출석합니다.
//!
//! ## 스캔 가능 조건
//!
//! ```text
//! is_active && now < expires_at
//! ```
//!
//! 강의자가 세션을 종료하면(`close`) `is_active = false`가 되고 `closed_at`이 기록됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::entities::attendance::attendance_record::AttendanceStatus;

const MILLIS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course_id: ObjectId,
    /// 세션을 연 강의자 (관리자가 연 경우 관리자 ID)
    pub lecturer_id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// QR 코드에 담기는 일회성 토큰
    pub qr_token: String,
    pub starts_at: DateTime,
    pub expires_at: DateTime,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl AttendanceSession {
    /// 지금부터 `duration_minutes` 동안 유효한 새 세션을 생성합니다.
    pub fn open(
        course_id: ObjectId,
        lecturer_id: ObjectId,
        title: String,
        location: Option<String>,
        duration_minutes: i64,
    ) -> Self {
        let now = DateTime::now();
        let expires_at = DateTime::from_millis(now.timestamp_millis() + duration_minutes * MILLIS_PER_MINUTE);

        Self {
            id: None,
            course_id,
            lecturer_id,
            title,
            location,
            qr_token: generate_qr_token(),
            starts_at: now,
            expires_at,
            is_active: true,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 주어진 시각에 QR 스캔을 받을 수 있는지
    pub fn accepts_scans_at(&self, at: DateTime) -> bool {
        self.is_active && at < self.expires_at
    }

    /// 스캔 시각으로 출석 상태를 결정합니다.
    ///
    /// 세션 시작 후 `late_after_minutes` 이내(경계 포함)면 `Present`, 이후면 `Late`.
    pub fn status_for_scan_at(&self, at: DateTime, late_after_minutes: i64) -> AttendanceStatus {
        let elapsed = at.timestamp_millis() - self.starts_at.timestamp_millis();

        if elapsed <= late_after_minutes * MILLIS_PER_MINUTE {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Late
        }
    }

    /// 제출된 토큰이 세션 토큰과 일치하는지
    pub fn token_matches(&self, token: &str) -> bool {
        !token.is_empty() && self.qr_token == token.trim()
    }
}

/// 하이픈 없는 UUID v4 (32자 16진수)
pub fn generate_qr_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(duration_minutes: i64) -> AttendanceSession {
        AttendanceSession::open(
            ObjectId::new(),
            ObjectId::new(),
            "Week 1".to_string(),
            None,
            duration_minutes,
        )
    }

    fn minutes_after(base: DateTime, minutes: i64) -> DateTime {
        DateTime::from_millis(base.timestamp_millis() + minutes * MILLIS_PER_MINUTE)
    }

    #[test]
    fn test_open_session_window() {
        let session = session(15);

        assert!(session.is_active);
        assert_eq!(
            session.expires_at.timestamp_millis() - session.starts_at.timestamp_millis(),
            15 * MILLIS_PER_MINUTE
        );
        assert!(session.accepts_scans_at(minutes_after(session.starts_at, 14)));
        assert!(!session.accepts_scans_at(minutes_after(session.starts_at, 15)));
        assert!(!session.accepts_scans_at(minutes_after(session.starts_at, 16)));
    }

    #[test]
    fn test_closed_session_rejects_scans() {
        let mut session = session(60);
        session.is_active = false;

        assert!(!session.accepts_scans_at(session.starts_at));
    }

    #[test]
    fn test_present_and_late_classification() {
        let session = session(60);

        assert_eq!(session.status_for_scan_at(session.starts_at, 10), AttendanceStatus::Present);
        assert_eq!(
            session.status_for_scan_at(minutes_after(session.starts_at, 10), 10),
            AttendanceStatus::Present
        );
        assert_eq!(
            session.status_for_scan_at(minutes_after(session.starts_at, 11), 10),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_qr_tokens_are_unique_and_compared_exactly() {
        let a = session(15);
        let b = session(15);

        assert_ne!(a.qr_token, b.qr_token);
        assert_eq!(a.qr_token.len(), 32);
        assert!(a.token_matches(&a.qr_token));
        assert!(a.token_matches(&format!(" {} ", a.qr_token)));
        assert!(!a.token_matches(&b.qr_token));
        assert!(!a.token_matches(""));
    }
}

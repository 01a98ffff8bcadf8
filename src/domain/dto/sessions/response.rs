use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::domain::dto::format_datetime;
use crate::domain::entities::sessions::session::AttendanceSession;
use crate::domain::models::qr::QrPayload;

/// 세션 응답 DTO
///
/// QR 토큰은 포함하지 않습니다. 토큰은 `GET /sessions/{id}/qr`로만 조회됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub course_id: String,
    pub lecturer_id: String,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: String,
    pub expires_at: String,
    pub is_active: bool,
    /// 응답 시점에 스캔을 받을 수 있는지
    pub accepts_scans: bool,
    pub closed_at: Option<String>,
    pub created_at: String,
}

impl From<AttendanceSession> for SessionResponse {
    fn from(session: AttendanceSession) -> Self {
        let accepts_scans = session.accepts_scans_at(DateTime::now());

        Self {
            id: session.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_id: session.course_id.to_hex(),
            lecturer_id: session.lecturer_id.to_hex(),
            title: session.title,
            location: session.location,
            starts_at: format_datetime(session.starts_at),
            expires_at: format_datetime(session.expires_at),
            is_active: session.is_active,
            accepts_scans,
            closed_at: session.closed_at.map(format_datetime),
            created_at: format_datetime(session.created_at),
        }
    }
}

/// QR 코드 응답
///
/// 프론트엔드는 `qr_data`를 그대로 QR 이미지로 렌더링합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCodeResponse {
    pub session_id: String,
    pub qr_data: String,
    pub expires_at: String,
    pub accepts_scans: bool,
}

impl QrCodeResponse {
    pub fn for_session(session: &AttendanceSession) -> Option<Self> {
        let session_id = session.id?;
        let payload = QrPayload::new(session_id, session.qr_token.clone());

        Some(Self {
            session_id: session_id.to_hex(),
            qr_data: payload.encode(),
            expires_at: format_datetime(session.expires_at),
            accepts_scans: session.accepts_scans_at(DateTime::now()),
        })
    }
}

/// 세션 종료 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseSessionResponse {
    pub session: SessionResponse,
    /// 자동으로 결석 처리된 학생 수
    pub absentees_marked: usize,
}

/// 세션 생성 응답 (강의자가 바로 QR 코드를 띄울 수 있도록 함께 반환)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSessionResponse {
    pub session: SessionResponse,
    pub qr: QrCodeResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_session_response_does_not_expose_token() {
        let mut session = AttendanceSession::open(ObjectId::new(), ObjectId::new(), "Week 3".to_string(), None, 15);
        session.id = Some(ObjectId::new());
        let token = session.qr_token.clone();

        let json = serde_json::to_string(&SessionResponse::from(session)).unwrap();
        assert!(!json.contains(&token));
        assert!(json.contains("\"accepts_scans\":true"));
    }

    #[test]
    fn test_qr_response_encodes_payload() {
        let mut session = AttendanceSession::open(ObjectId::new(), ObjectId::new(), "Week 3".to_string(), None, 15);
        assert!(QrCodeResponse::for_session(&session).is_none());

        let id = ObjectId::new();
        session.id = Some(id);
        let qr = QrCodeResponse::for_session(&session).unwrap();

        let payload = QrPayload::parse(&qr.qr_data).unwrap();
        assert_eq!(payload.session_id, id);
        assert_eq!(payload.token, session.qr_token);
    }
}

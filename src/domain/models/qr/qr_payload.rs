//! QR 코드 페이로드
//!
//! 세션 QR 코드에는 다음 두 형식 중 하나가 담깁니다.
//!
//! ```text
//! {"sessionId":"665f1c...","token":"9b2e..."}   ← 기본 형식 (QR 생성 시 사용)
//! 665f1c...:9b2e...                             ← 수동 입력용 축약 형식
//! ```

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub session_id: ObjectId,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
struct QrJson {
    #[serde(rename = "sessionId", alias = "session_id")]
    session_id: String,
    token: String,
}

impl QrPayload {
    pub fn new(session_id: ObjectId, token: impl Into<String>) -> Self {
        Self { session_id, token: token.into() }
    }

    /// 스캔된 문자열을 해석합니다. 실패 시 사용자에게 보여줄 메시지를 반환합니다.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("QR 데이터가 비어 있습니다".to_string());
        }

        let (session_id, token) = if raw.starts_with('{') {
            let json: QrJson = serde_json::from_str(raw)
                .map_err(|_| "QR 데이터 형식이 올바르지 않습니다".to_string())?;
            (json.session_id, json.token)
        } else {
            let (id, token) = raw
                .split_once(':')
                .ok_or_else(|| "QR 데이터 형식이 올바르지 않습니다".to_string())?;
            (id.to_string(), token.to_string())
        };

        let token = token.trim();
        if token.is_empty() {
            return Err("QR 토큰이 비어 있습니다".to_string());
        }

        let session_id = ObjectId::parse_str(session_id.trim())
            .map_err(|_| "QR 코드의 세션 ID가 올바르지 않습니다".to_string())?;

        Ok(Self::new(session_id, token))
    }

    /// QR 이미지로 인코딩할 JSON 문자열
    pub fn encode(&self) -> String {
        serde_json::json!({
            "sessionId": self.session_id.to_hex(),
            "token": self.token,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_form() {
        let id = ObjectId::new();
        let raw = format!(r#"{{"sessionId":"{}","token":"abc123"}}"#, id.to_hex());

        let payload = QrPayload::parse(&raw).unwrap();
        assert_eq!(payload.session_id, id);
        assert_eq!(payload.token, "abc123");
    }

    #[test]
    fn test_parse_colon_form() {
        let id = ObjectId::new();
        let payload = QrPayload::parse(&format!(" {}:tok ", id.to_hex())).unwrap();

        assert_eq!(payload, QrPayload::new(id, "tok"));
    }

    #[test]
    fn test_encode_is_parseable() {
        let payload = QrPayload::new(ObjectId::new(), "f00d");
        assert_eq!(QrPayload::parse(&payload.encode()).unwrap(), payload);
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        assert!(QrPayload::parse("").is_err());
        assert!(QrPayload::parse("just-some-text").is_err());
        assert!(QrPayload::parse("not-an-id:token").is_err());
        assert!(QrPayload::parse(&format!("{}:", ObjectId::new().to_hex())).is_err());
        assert!(QrPayload::parse(r#"{"token":"abc"}"#).is_err());
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

/// QR 스캔 요청 (학생)
///
/// `qr_data`는 QR 코드에서 읽은 원문 그대로입니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScanRequest {
    #[serde(default)]
    #[validate(required(message = "qr_data는 필수입니다"))]
    #[validate(length(min = 1, max = 512, message = "qr_data가 올바르지 않습니다"))]
    pub qr_data: Option<String>,
}

/// 출석 상태 수동 변경 요청 (강의자/관리자)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAttendanceStatusRequest {
    #[serde(default)]
    #[validate(required(message = "status는 필수입니다"))]
    pub status: Option<String>,
}

/// 내보내기 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// `GET /attendance/course/{id}/export?format=csv|json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

impl ExportQuery {
    /// 형식이 없으면 CSV
    pub fn export_format(&self) -> Result<ExportFormat, String> {
        match self.format.as_deref().map(|f| f.trim().to_lowercase()) {
            None => Ok(ExportFormat::Csv),
            Some(f) if f.is_empty() || f == "csv" => Ok(ExportFormat::Csv),
            Some(f) if f == "json" => Ok(ExportFormat::Json),
            Some(_) => Err("format must be one of: csv, json".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_requires_qr_data() {
        let req: ScanRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());

        let req: ScanRequest = serde_json::from_str(r#"{"qr_data": "abc:def"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_export_format() {
        assert_eq!(ExportQuery::default().export_format().unwrap(), ExportFormat::Csv);
        assert_eq!(
            ExportQuery { format: Some("JSON".to_string()) }.export_format().unwrap(),
            ExportFormat::Json
        );
        assert!(ExportQuery { format: Some("xlsx".to_string()) }.export_format().is_err());
    }
}

//! # 피드백 요청 DTO
//!
//! ## 검증 규칙
//!
//! | 필드 | 규칙 |
//! |------|------|
//! | `title` | 필수, 1-200자 |
//! | `category` | 필수, `Bug` / `Feature Request` / `UI Improvement` / `Performance Issue` / `Other` |
//! | `description` | 필수, 1-5000자 |
//! | `severity` | 선택, 1-5 (기본 3) |
//! | `screenshot` | 선택, URL |
//!
//! 필수 필드는 `Option`으로 받아 누락 시에도 JSON 파싱 에러가 아닌
//! 검증 에러(`{"error": ...}`, 400)로 응답합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::entities::feedback::system_feedback::{
    FeedbackCategory, FeedbackStatus, DEFAULT_SEVERITY, MAX_SEVERITY, MIN_SEVERITY,
};
use crate::utils::string_utils::deserialize_optional_string;

/// 피드백 제출 요청
///
/// ```json
/// {
///   "title": "QR scanner freezes",
///   "category": "Bug",
///   "description": "Camera preview stays black",
///   "severity": 4
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(required(message = "title은 필수입니다"))]
    #[validate(length(max = 200, message = "title은 200자 이하여야 합니다"))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(required(message = "category는 필수입니다"))]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(required(message = "description은 필수입니다"))]
    #[validate(length(max = 5000, message = "description은 5000자 이하여야 합니다"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "severity는 1-5 사이여야 합니다"))]
    pub severity: Option<u8>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "screenshot은 URL이어야 합니다"))]
    pub screenshot: Option<String>,
}

impl CreateFeedbackRequest {
    pub fn parsed_category(&self) -> Result<FeedbackCategory, String> {
        FeedbackCategory::parse(self.category.as_deref().unwrap_or_default())
    }

    pub fn severity_or_default(&self) -> u8 {
        self.severity
            .filter(|s| (MIN_SEVERITY..=MAX_SEVERITY).contains(s))
            .unwrap_or(DEFAULT_SEVERITY)
    }
}

/// 피드백 상태 변경 요청 (관리자)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFeedbackStatusRequest {
    #[serde(default)]
    #[validate(required(message = "status는 필수입니다"))]
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

impl UpdateFeedbackStatusRequest {
    pub fn parsed_status(&self) -> Result<FeedbackStatus, String> {
        FeedbackStatus::parse(self.status.as_deref().unwrap_or_default())
    }
}

/// `GET /system-feedback/all?status=...&category=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFilterQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

impl FeedbackFilterQuery {
    /// 빈 값은 필터 없음으로 취급합니다.
    pub fn parse(&self) -> Result<(Option<FeedbackStatus>, Option<FeedbackCategory>), String> {
        let status = self.status.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(FeedbackStatus::parse)
            .transpose()?;
        let category = self.category.as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(FeedbackCategory::parse)
            .transpose()?;

        Ok((status, category))
    }
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    FeedbackCategory::parse(category).map(|_| ()).map_err(|message| {
        ValidationError::new("invalid_category").with_message(message.into())
    })
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    FeedbackStatus::parse(status).map(|_| ()).map_err(|message| {
        ValidationError::new("invalid_status").with_message(message.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_fails_validation() {
        let req: CreateFeedbackRequest = serde_json::from_str(
            r#"{"title": "Slow", "description": "Dashboard takes 10s"}"#
        ).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));
    }

    #[test]
    fn test_unknown_category_fails_validation() {
        let req: CreateFeedbackRequest = serde_json::from_str(
            r#"{"title": "Slow", "category": "Complaint", "description": "..."}"#
        ).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_severity_range_and_default() {
        let req: CreateFeedbackRequest = serde_json::from_str(
            r#"{"title": "Slow", "category": "Performance Issue", "description": "...", "severity": 6}"#
        ).unwrap();
        assert!(req.validate().is_err());

        let req: CreateFeedbackRequest = serde_json::from_str(
            r#"{"title": "Slow", "category": "Performance Issue", "description": "..."}"#
        ).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.severity_or_default(), 3);
        assert_eq!(req.parsed_category().unwrap(), FeedbackCategory::PerformanceIssue);
    }

    #[test]
    fn test_status_outside_enum_fails_validation() {
        let req = UpdateFeedbackStatusRequest { status: Some("Done".to_string()) };
        assert!(req.validate().is_err());

        let req = UpdateFeedbackStatusRequest { status: Some("In Progress".to_string()) };
        assert!(req.validate().is_ok());
        assert_eq!(req.parsed_status().unwrap(), FeedbackStatus::InProgress);
    }

    #[test]
    fn test_filter_query_parsing() {
        let query = FeedbackFilterQuery { status: Some("Resolved".to_string()), category: Some("".to_string()) };
        assert_eq!(query.parse().unwrap(), (Some(FeedbackStatus::Resolved), None));

        let query = FeedbackFilterQuery { status: Some("Archived".to_string()), category: None };
        assert!(query.parse().is_err());
    }
}

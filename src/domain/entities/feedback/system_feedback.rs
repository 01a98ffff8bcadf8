//! System Feedback Entity
//!
//! 사용자가 제출하는 버그 리포트/기능 요청 등의 피드백입니다.
//! 제출 시 `New` 상태로 생성되고, 이후에는 관리자의 상태 변경으로만 수정되며
//! 삭제되지 않습니다.

use std::fmt;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::UserRole;

/// 기본 심각도 (1-5)
pub const DEFAULT_SEVERITY: u8 = 3;
pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

/// 피드백 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCategory {
    Bug,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    #[serde(rename = "UI Improvement")]
    UiImprovement,
    #[serde(rename = "Performance Issue")]
    PerformanceIssue,
    Other,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 5] = [
        FeedbackCategory::Bug,
        FeedbackCategory::FeatureRequest,
        FeedbackCategory::UiImprovement,
        FeedbackCategory::PerformanceIssue,
        FeedbackCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "Bug",
            FeedbackCategory::FeatureRequest => "Feature Request",
            FeedbackCategory::UiImprovement => "UI Improvement",
            FeedbackCategory::PerformanceIssue => "Performance Issue",
            FeedbackCategory::Other => "Other",
        }
    }

    /// 저장 형태와 정확히 일치하는 값만 허용합니다.
    pub fn parse(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| format!(
                "category must be one of: {}",
                Self::ALL.map(|c| c.as_str()).join(", ")
            ))
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 피드백 처리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackStatus {
    New,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 5] = [
        FeedbackStatus::New,
        FeedbackStatus::UnderReview,
        FeedbackStatus::InProgress,
        FeedbackStatus::Resolved,
        FeedbackStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::New => "New",
            FeedbackStatus::UnderReview => "Under Review",
            FeedbackStatus::InProgress => "In Progress",
            FeedbackStatus::Resolved => "Resolved",
            FeedbackStatus::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!(
                "status must be one of: {}",
                Self::ALL.map(|s| s.as_str()).join(", ")
            ))
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemFeedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 제출한 사용자
    pub user_id: ObjectId,
    /// 제출 당시 사용자 역할
    pub user_role: UserRole,
    pub title: String,
    pub category: FeedbackCategory,
    pub description: String,
    /// 1(낮음) - 5(치명적)
    pub severity: u8,
    pub status: FeedbackStatus,
    /// 스크린샷 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SystemFeedback {
    pub fn submit(
        user_id: ObjectId,
        user_role: UserRole,
        title: String,
        category: FeedbackCategory,
        description: String,
        severity: u8,
        screenshot: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            user_id,
            user_role,
            title,
            category,
            description,
            severity,
            status: FeedbackStatus::New,
            screenshot,
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
    fn test_category_parse_accepts_stored_names() {
        for category in FeedbackCategory::ALL {
            assert_eq!(FeedbackCategory::parse(category.as_str()).unwrap(), category);
        }
        assert!(FeedbackCategory::parse("bug report").is_err());
        assert!(FeedbackCategory::parse("").is_err());
    }

    #[test]
    fn test_status_parse_rejects_values_outside_enum() {
        assert_eq!(FeedbackStatus::parse("Under Review").unwrap(), FeedbackStatus::UnderReview);

        let err = FeedbackStatus::parse("Done").unwrap_err();
        assert!(err.contains("New, Under Review, In Progress, Resolved, Closed"));
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for status in FeedbackStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for category in FeedbackCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_submitted_feedback_starts_as_new() {
        let feedback = SystemFeedback::submit(
            ObjectId::new(),
            UserRole::Student,
            "QR scanner freezes".to_string(),
            FeedbackCategory::Bug,
            "Camera preview stays black on Android".to_string(),
            DEFAULT_SEVERITY,
            None,
        );

        assert_eq!(feedback.status, FeedbackStatus::New);
        assert_eq!(feedback.severity, 3);
    }
}

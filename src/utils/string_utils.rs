//! # 문자열 유틸리티
//!
//! 요청 입력 정리와 경로 파라미터 파싱에 쓰는 공통 함수들입니다.
//! 강의 제목, 세션 위치, 피드백 본문처럼 사용자가 직접 입력한 값은
//! 저장 전에 모두 여기를 거칩니다.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use crate::errors::errors::AppError;

/// 필수 텍스트 필드의 앞뒤 공백을 제거합니다
///
/// 정리 후 비어 있으면 `ValidationError`(400).
///
/// ```rust,ignore
/// let title = validate_required_string("  Week 3 Lab  ", "title")?;
/// assert_eq!(title, "Week 3 Lab");
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    match value.trim() {
        "" => Err(AppError::ValidationError(format!("{}은(는) 필수입니다", field_name))),
        trimmed => Ok(trimmed.to_owned()),
    }
}

/// 선택 텍스트 필드 정리. 공백뿐인 값은 `None`으로 취급합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// ObjectId 문자열 파싱
///
/// 경로/본문으로 받은 ID가 24자리 16진수가 아니면 400 에러를 반환합니다.
///
/// ```rust,ignore
/// let id = parse_object_id("665f1c2b9d3e4a0012345678", "course_id")?;
/// assert!(parse_object_id("42", "course_id").is_err());
/// ```
pub fn parse_object_id(value: &str, field_name: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| AppError::ValidationError(format!("{}가 올바른 ID 형식이 아닙니다", field_name)))
}

/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`용 deserializer
///
/// `null`, `""`, 공백 문자열은 모두 `None`이 됩니다. 부분 수정 요청에서
/// "빈 값으로 덮어쓰기"가 일어나지 않게 하는 용도입니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

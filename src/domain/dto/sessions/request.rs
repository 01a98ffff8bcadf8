use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

/// 출석 세션 생성 요청
///
/// `duration_minutes`가 없으면 `ATTENDANCE_SESSION_MINUTES` 설정값을 사용합니다.
/// 상한(`ATTENDANCE_MAX_SESSION_MINUTES`)은 설정값이라 서비스 계층에서 검사합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(equal = 24, message = "course_id가 올바르지 않습니다"))]
    pub course_id: String,

    #[validate(length(min = 1, max = 200, message = "세션 제목은 1-200자 사이여야 합니다"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

/// `GET /sessions?course_id=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionListQuery {
    pub course_id: Option<String>,
}

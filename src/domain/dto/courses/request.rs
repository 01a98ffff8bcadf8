use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

/// 강의 생성 요청 (관리자)
///
/// ```json
/// { "code": "CS101", "title": "Intro to CS", "lecturer_id": "665f..." }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 2, max = 20, message = "강의 코드는 2-20자 사이여야 합니다"))]
    pub code: String,

    #[validate(length(min = 1, max = 200, message = "강의명은 1-200자 사이여야 합니다"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// 담당 강의자 ID
    #[validate(length(equal = 24, message = "lecturer_id가 올바르지 않습니다"))]
    pub lecturer_id: String,
}

/// 강의 수정 요청 (관리자)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 200, message = "강의명은 1-200자 사이여야 합니다"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(equal = 24, message = "lecturer_id가 올바르지 않습니다"))]
    pub lecturer_id: Option<String>,
}

impl UpdateCourseRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.lecturer_id.is_none()
    }
}

/// 수강생 등록 요청 (관리자)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnrollStudentsRequest {
    #[validate(length(min = 1, message = "등록할 학생을 1명 이상 지정해주세요"))]
    pub student_ids: Vec<String>,
}

//! # 사용자 생성/수정 요청 DTO
//!
//! 학생 자가 가입(`RegisterRequest`), 관리자의 사용자 생성(`CreateUserRequest`),
//! 관리자의 사용자 수정(`UpdateUserRequest`) 요청을 정의합니다.
//!
//! ## 검증 규칙
//!
//! ### 이메일 (`email`)
//! - 이메일 형식 준수
//! - 중복 여부는 서비스 계층에서 검증 (409)
//!
//! ### 이름 (`name`)
//! - 길이: 1-100자
//!
//! ### 비밀번호 (`password`)
//! - 최소 길이: 8자
//! - 영문자와 숫자를 각각 1개 이상 포함
//!
//! ### 역할 (`role`)
//! - `student`, `lecturer`, `admin` 중 하나 (대소문자 무관)
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use validator::Validate;
//! use crate::domain::dto::users::request::RegisterRequest;
//!
//! async fn register(req: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
//!     req.validate()?;
//!     let user = UserService::instance().register(req.into_inner()).await?;
//!     Ok(HttpResponse::Created().json(UserResponse::from(user)))
//! }
//! ```

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::config::UserRole;
use crate::utils::string_utils::deserialize_optional_string;

/// 학생 자가 가입 요청
///
/// 역할은 항상 `student`로 고정됩니다.
///
/// # JSON 예제
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "Analytical1",
///   "student_number": "S2024001"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    /// 학번
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 32, message = "학번은 32자 이하여야 합니다"))]
    pub student_number: Option<String>,
}

/// 관리자의 사용자 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(custom(function = "validate_role"))]
    pub role: String,

    /// 학번 (학생 역할에서만 저장됨)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 32, message = "학번은 32자 이하여야 합니다"))]
    pub student_number: Option<String>,
}

impl CreateUserRequest {
    /// 검증을 통과한 요청의 역할
    pub fn parsed_role(&self) -> Result<UserRole, String> {
        UserRole::parse(&self.role)
    }
}

/// 관리자의 사용자 수정 요청
///
/// 포함된 필드만 변경됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 32, message = "학번은 32자 이하여야 합니다"))]
    pub student_number: Option<String>,
}

impl UpdateUserRequest {
    pub fn parsed_role(&self) -> Result<Option<UserRole>, String> {
        self.role.as_deref().map(UserRole::parse).transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.student_number.is_none()
    }
}

/// 역할 문자열 검증
/// 사용자 목록 조회 쿼리 (`?role=student`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}

impl UserListQuery {
    pub fn parsed_role(&self) -> Result<Option<UserRole>, String> {
        self.role.as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(UserRole::parse)
            .transpose()
    }
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    UserRole::parse(role).map(|_| ()).map_err(|_| {
        ValidationError::new("invalid_role")
            .with_message("역할은 student, lecturer, admin 중 하나여야 합니다".into())
    })
}

/// 비밀번호 보안 강도를 검증하는 함수
///
/// 영문자와 숫자를 각각 1개 이상 포함해야 합니다.
///
/// ```rust,ignore
/// assert!(validate_password_strength("attend2024").is_ok());
/// assert!(validate_password_strength("password").is_err());   // 숫자 없음
/// assert!(validate_password_strength("12345678").is_err());   // 영문자 없음
/// ```
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 영문자와 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            student_number: None,
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("ada@example.com", "attend2024").validate().is_ok());
        assert!(register("not-an-email", "attend2024").validate().is_err());
        assert!(register("ada@example.com", "short1").validate().is_err());
        assert!(register("ada@example.com", "onlyletters").validate().is_err());
    }

    #[test]
    fn test_create_user_role_validation() {
        let mut req = CreateUserRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: "compiler1".to_string(),
            role: "Lecturer".to_string(),
            student_number: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.parsed_role().unwrap(), UserRole::Lecturer);

        req.role = "teacher".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_update_user_request_blank_strings_are_dropped() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name": "   ", "is_active": false}"#).unwrap();

        assert!(req.name.is_none());
        assert_eq!(req.is_active, Some(false));
        assert!(!req.is_empty());
        assert!(req.validate().is_ok());
        assert!(UpdateUserRequest::default().is_empty());
    }

    #[test]
    fn test_user_list_query_role_filter() {
        assert_eq!(UserListQuery::default().parsed_role().unwrap(), None);
        assert_eq!(
            UserListQuery { role: Some("admin".to_string()) }.parsed_role().unwrap(),
            Some(UserRole::Admin)
        );
        assert!(UserListQuery { role: Some("guest".to_string()) }.parsed_role().is_err());
    }
}

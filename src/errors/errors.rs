//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 출결 서비스 백엔드를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `ValidationError` | 400 Bad Request |
//! | `AuthenticationError` | 401 Unauthorized |
//! | `AuthorizationError` | 403 Forbidden |
//! | `NotFound` | 404 Not Found |
//! | `ConflictError` | 409 Conflict |
//! | 나머지 | 500 Internal Server Error |
//!
//! 운영(`production`) 환경에서는 5xx 응답의 상세 메시지를 숨기고
//! 서버 로그에만 기록합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn submit(data: CreateFeedbackRequest) -> Result<SystemFeedback, AppError> {
//!     if data.title.is_empty() {
//!         return Err(AppError::ValidationError("title is required".to_string()));
//!     }
//!
//!     let feedback = feedback_repo.create(data.into()).await?;
//!
//!     Ok(feedback)
//! }
//! ```

use thiserror::Error;
use crate::config::Environment;

/// 운영 환경에서 5xx 응답에 사용되는 고정 메시지
pub const GENERIC_SERVER_ERROR: &str = "서버 내부 오류가 발생했습니다";

/// 애플리케이션 전역 에러 타입
///
/// 백엔드 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에게 노출할 메시지를 결정합니다.
    ///
    /// 운영 환경의 5xx 에러는 내부 정보가 새지 않도록 고정 메시지로 대체됩니다.
    pub fn public_message(&self, env: &Environment) -> String {
        if self.status().is_server_error() && *env == Environment::Production {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.status()
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 `{"error": "..."}` JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            log::error!("{}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.public_message(&Environment::current())
            }))
    }
}

impl From<mongodb::error::Error> for AppError {
    /// MongoDB 에러 변환
    ///
    /// 유니크 인덱스 위반(E11000)은 409로, 나머지는 500으로 매핑합니다.
    fn from(e: mongodb::error::Error) -> Self {
        if is_duplicate_key(&e) {
            AppError::ConflictError("이미 존재하는 데이터입니다".to_string())
        } else {
            AppError::DatabaseError(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(_) => duplicate_only_insert_failures(e).is_some(),
        _ => false,
    }
}

/// 순서 없는 `insert_many`가 유니크 인덱스 위반으로만 실패했으면 건너뛴 문서 수를 반환합니다.
///
/// 다른 쓰기 에러나 write concern 에러가 섞여 있으면 `None`.
pub(crate) fn duplicate_only_insert_failures(e: &mongodb::error::Error) -> Option<usize> {
    use mongodb::error::{ErrorKind, InsertManyError};

    match e.kind.as_ref() {
        ErrorKind::InsertMany(InsertManyError { write_errors: Some(errors), write_concern_error: None, .. })
            if !errors.is_empty() && errors.iter().all(|error| error.code == DUPLICATE_KEY) =>
        {
            Some(errors.len())
        }
        _ => None,
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use mongodb::error::{Error as MongoError, ErrorKind, InsertManyError, WriteError, WriteFailure};
    use serde_json::json;

    fn insert_many_error(body: serde_json::Value) -> MongoError {
        let failure: InsertManyError = serde_json::from_value(body).unwrap();
        MongoError::from(ErrorKind::InsertMany(failure))
    }

    #[test]
    fn test_single_duplicate_write_is_conflict() {
        let write_error: WriteError = serde_json::from_value(json!({
            "code": 11000,
            "errmsg": "E11000 duplicate key error collection: attendance"
        })).unwrap();
        let error = AppError::from(MongoError::from(ErrorKind::Write(WriteFailure::WriteError(write_error))));

        assert!(matches!(error, AppError::ConflictError(_)));
    }

    #[test]
    fn test_insert_many_with_only_duplicates_is_skippable() {
        let error = insert_many_error(json!({
            "writeErrors": [
                { "index": 1, "code": 11000, "errmsg": "E11000 duplicate key" },
                { "index": 4, "code": 11000, "errmsg": "E11000 duplicate key" }
            ]
        }));

        assert_eq!(duplicate_only_insert_failures(&error), Some(2));
        assert!(is_duplicate_key(&error));
        assert!(matches!(AppError::from(error), AppError::ConflictError(_)));
    }

    #[test]
    fn test_insert_many_with_other_failures_is_database_error() {
        let error = insert_many_error(json!({
            "writeErrors": [
                { "index": 0, "code": 11000, "errmsg": "E11000 duplicate key" },
                { "index": 2, "code": 121, "errmsg": "Document failed validation" }
            ]
        }));

        assert_eq!(duplicate_only_insert_failures(&error), None);
        assert!(matches!(AppError::from(error), AppError::DatabaseError(_)));

        let empty = insert_many_error(json!({ "writeErrors": [] }));
        assert_eq!(duplicate_only_insert_failures(&empty), None);
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("category is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Feedback not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("Already marked".to_string());

        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Admin only".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let errors = [
            AppError::InternalError("boom".to_string()),
            AppError::DatabaseError("connection reset".to_string()),
            AppError::RedisError("timeout".to_string()),
        ];

        for error in errors {
            assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_server_error_message_is_hidden_in_production() {
        let error = AppError::DatabaseError("mongodb://admin:secret@db failed".to_string());

        assert_eq!(error.public_message(&Environment::Production), GENERIC_SERVER_ERROR);
        assert!(error.public_message(&Environment::Development).contains("mongodb://"));
    }

    #[test]
    fn test_client_error_message_is_kept_in_production() {
        let error = AppError::ValidationError("severity must be 1-5".to_string());

        assert_eq!(
            error.public_message(&Environment::Production),
            "Validation error: severity must be 1-5"
        );
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        match app_result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            _ => panic!("Expected InternalError"),
        }
    }
}

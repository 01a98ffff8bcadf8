//! 공통 유틸리티 함수 모듈
//!
//! 애플리케이션 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리, ObjectId 파싱
//! - [`export_utils`] - 출석 데이터 정규화(`sanitize_export_data`)와 CSV 렌더링
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::validate_required_string;
//! use crate::utils::export_utils::{sanitize_export_data, to_csv};
//!
//! // 문자열 검증
//! let clean_name = validate_required_string("  John  ", "name")?;
//!
//! // 내보내기
//! let csv = to_csv(&sanitize_export_data(&rows));
//! ```

pub mod string_utils;
pub mod export_utils;

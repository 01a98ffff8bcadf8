//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 요청/응답 구조체를 정의합니다.
//! 요청 DTO는 `validator`로 필수 필드와 형식을 검증하고,
//! 응답 DTO는 `From<Entity>`로 엔티티에서 변환됩니다.
//!
//! ## 모듈 구조
//!
//! ```text
//! dto/
//! ├── users/        # 회원가입, 로그인, 사용자 관리
//! │   ├── request/
//! │   └── response/
//! ├── courses/      # 강의 생성/수정, 수강생 등록
//! ├── sessions/     # 출석 세션 생성, QR 코드
//! ├── attendance/   # QR 스캔, 상태 변경, 요약, 내보내기
//! ├── feedback/     # 시스템 피드백
//! └── admin/        # 관리자 대시보드 통계
//! ```
//!
//! ## 작성 규칙
//!
//! - **필수 필드**: 누락 시 JSON 파싱 단계가 아닌 검증 단계에서 400을 돌려주기 위해
//!   `Option<T>` + `#[validate(required)]` 조합을 사용합니다.
//! - **ID**: 요청/응답 모두 ObjectId hex 문자열
//! - **날짜/시간**: RFC 3339 문자열
//! - **민감한 정보**: 비밀번호 해시와 QR 토큰은 일반 응답에서 제외

use mongodb::bson::DateTime;

pub mod users;
pub mod courses;
pub mod sessions;
pub mod attendance;
pub mod feedback;
pub mod admin;

pub use users::*;

/// BSON 시간을 RFC 3339 문자열로 변환합니다.
pub(crate) fn format_datetime(value: DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        let value = DateTime::from_millis(0);
        assert_eq!(format_datetime(value), "1970-01-01T00:00:00Z");
    }
}

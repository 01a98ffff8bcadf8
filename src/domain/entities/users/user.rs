//! User Entity Implementation
//!
//! 학생, 강의자, 관리자 계정을 표현하는 사용자 엔티티입니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::UserRole;

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 이름
    pub name: String,
    /// 이메일 (unique, 소문자로 저장)
    pub email: String,
    /// bcrypt 해시된 비밀번호
    pub password_hash: String,
    /// 사용자 역할
    pub role: UserRole,
    /// 학번 (학생만, unique)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    /// 계정 활성화 여부
    pub is_active: bool,
    /// 마지막 로그인 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 이메일은 소문자로 정규화되며, 학생이 아닌 역할의 학번은 버려집니다.
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
        student_number: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            email: normalize_email(&email),
            password_hash,
            role,
            student_number: student_number.filter(|_| role == UserRole::Student),
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    pub fn is_lecturer(&self) -> bool {
        self.role == UserRole::Lecturer
    }
}

/// 이메일 비교와 저장에 사용하는 정규화 형태
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new(
            "Ada".to_string(),
            "  Ada@Example.COM ".to_string(),
            "hash".to_string(),
            UserRole::Student,
            Some("S1001".to_string()),
        );

        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_active);
        assert!(user.is_student());
        assert_eq!(user.student_number.as_deref(), Some("S1001"));
        assert!(user.id_string().is_none());
    }

    #[test]
    fn test_student_number_dropped_for_non_students() {
        let user = User::new(
            "Grace".to_string(),
            "grace@example.com".to_string(),
            "hash".to_string(),
            UserRole::Lecturer,
            Some("S2002".to_string()),
        );

        assert!(user.is_lecturer());
        assert!(user.student_number.is_none());
    }
}

//! Course Entity
//!
//! 강의와 담당 강의자, 수강생 명단을 표현합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 강의 코드 (unique, 대문자로 저장)
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 담당 강의자
    pub lecturer_id: ObjectId,
    /// 수강생 명단
    #[serde(default)]
    pub student_ids: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Course {
    pub fn new(code: &str, title: String, description: Option<String>, lecturer_id: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            code: normalize_course_code(code),
            title,
            description,
            lecturer_id,
            student_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_enrolled(&self, student_id: &ObjectId) -> bool {
        self.student_ids.contains(student_id)
    }

    pub fn is_taught_by(&self, lecturer_id: &ObjectId) -> bool {
        self.lecturer_id == *lecturer_id
    }
}

/// `" cs 101 "` → `"CS101"`
pub fn normalize_course_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_code_is_normalized() {
        assert_eq!(normalize_course_code(" cs 101 "), "CS101");
        assert_eq!(normalize_course_code("MATH-2"), "MATH-2");
    }

    #[test]
    fn test_enrollment_and_ownership() {
        let lecturer = ObjectId::new();
        let student = ObjectId::new();
        let mut course = Course::new("cs101", "Intro".to_string(), None, lecturer);

        assert!(course.is_taught_by(&lecturer));
        assert!(!course.is_taught_by(&student));
        assert!(!course.is_enrolled(&student));

        course.student_ids.push(student);
        assert!(course.is_enrolled(&student));
    }
}

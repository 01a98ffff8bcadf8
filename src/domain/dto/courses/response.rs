use serde::{Deserialize, Serialize};
use crate::domain::dto::format_datetime;
use crate::domain::entities::courses::course::Course;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub id: String,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub lecturer_id: String,
    pub student_ids: Vec<String>,
    pub student_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        let student_ids: Vec<String> = course.student_ids.iter().map(|id| id.to_hex()).collect();

        Self {
            id: course.id.map(|id| id.to_hex()).unwrap_or_default(),
            code: course.code,
            title: course.title,
            description: course.description,
            lecturer_id: course.lecturer_id.to_hex(),
            student_count: student_ids.len(),
            student_ids,
            created_at: format_datetime(course.created_at),
            updated_at: format_datetime(course.updated_at),
        }
    }
}

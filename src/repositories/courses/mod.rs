//! 강의 데이터 액세스 계층
//!
//! [`CourseRepository`](course_repo::CourseRepository)를 통해 강의와 수강생 명단을 관리합니다.

pub mod course_repo;

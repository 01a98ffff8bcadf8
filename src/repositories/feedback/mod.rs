//! 시스템 피드백 데이터 액세스 계층

pub mod feedback_repo;

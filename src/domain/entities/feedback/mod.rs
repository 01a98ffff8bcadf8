//! 시스템 피드백 엔티티 모듈

pub mod system_feedback;

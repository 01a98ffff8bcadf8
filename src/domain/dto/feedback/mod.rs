//! 시스템 피드백 DTO

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

//! 출석 세션 데이터 액세스 계층

pub mod session_repo;

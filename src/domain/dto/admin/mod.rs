//! 관리자 대시보드 DTO

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// 역할별 사용자 수
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCounts {
    pub student: u64,
    pub lecturer: u64,
    pub admin: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCounts {
    pub total: u64,
    pub active: u64,
}

/// `GET /admin/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminStatsResponse {
    pub users: UserCounts,
    pub courses: u64,
    pub sessions: SessionCounts,
    pub attendance_records: u64,
    /// 상태 이름 → 건수 (`New`, `Under Review`, ...)
    pub feedback: BTreeMap<String, u64>,
}

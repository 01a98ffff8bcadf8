//! 출석 세션 정책 설정
//!
//! ```bash
//! export ATTENDANCE_SESSION_MINUTES="15"       # 세션 기본 유효 시간
//! export ATTENDANCE_MAX_SESSION_MINUTES="240"  # 세션 최대 유효 시간
//! export ATTENDANCE_LATE_AFTER_MINUTES="10"    # 이 시간 이후 스캔은 지각 처리
//! ```

use super::data_config::env_or;

pub struct AttendanceConfig;

impl AttendanceConfig {
    pub fn default_session_minutes() -> i64 {
        env_or("ATTENDANCE_SESSION_MINUTES", 15)
    }

    pub fn max_session_minutes() -> i64 {
        env_or("ATTENDANCE_MAX_SESSION_MINUTES", 240)
    }

    pub fn late_after_minutes() -> i64 {
        env_or("ATTENDANCE_LATE_AFTER_MINUTES", 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_defaults() {
        if std::env::var("ATTENDANCE_SESSION_MINUTES").is_err() {
            assert_eq!(AttendanceConfig::default_session_minutes(), 15);
        }
        if std::env::var("ATTENDANCE_MAX_SESSION_MINUTES").is_err() {
            assert_eq!(AttendanceConfig::max_session_minutes(), 240);
        }
        if std::env::var("ATTENDANCE_LATE_AFTER_MINUTES").is_err() {
            assert_eq!(AttendanceConfig::late_after_minutes(), 10);
        }
    }
}

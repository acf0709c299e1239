//! 로깅 초기화
//!
//! `RUST_LOG`로 레벨을 조정하며 없으면 `info`를 사용합니다.

use tracing_subscriber::EnvFilter;

/// 기본 로그 필터
pub const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// 전역 tracing 구독자를 설치합니다.
///
/// 이미 설치되어 있으면 아무 일도 하지 않습니다.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init();
}

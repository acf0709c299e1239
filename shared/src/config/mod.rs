//! 설정 모듈
//!
//! 환경 변수(.env 포함)에서 애플리케이션과 데이터베이스 설정을 읽어옵니다.

pub mod app_config;
pub mod db;

pub use app_config::{AppConfig, KakaoConfig};
pub use db::{DbConfig, DbSettings};

use std::env;
use tracing::{info, warn};

use crate::tool::error::AppError;

/// .env 파일 로드
///
/// 현재 디렉토리, 상위 디렉토리(서브패키지에서 실행되는 경우), 기본 위치 순으로 시도합니다.
pub fn load_env() {
    let current_dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let workspace_env = current_dir.join(".env");
    let parent_env = current_dir.parent().map(|p| p.join(".env"));

    if workspace_env.exists() {
        dotenv::from_path(&workspace_env).ok();
        info!("환경 파일 로드: {:?}", workspace_env);
        return;
    }

    if let Some(parent_env) = parent_env.filter(|p| p.exists()) {
        dotenv::from_path(&parent_env).ok();
        info!("환경 파일 로드: {:?}", parent_env);
        return;
    }

    if dotenv::dotenv().is_err() {
        warn!(".env 파일을 찾을 수 없어서 환경 변수를 직접 사용합니다.");
    }
}

/// 필수 환경 변수
pub(crate) fn required_var(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!("{} 환경변수가 필요합니다.", key))),
    }
}

/// 기본값이 있는 환경 변수
pub(crate) fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} 환경변수가 없어서 {}를 사용합니다.", key, default);
        default.to_string()
    })
}

/// 숫자 환경 변수
pub(crate) fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, AppError> {
    var_or(key, default)
        .parse::<T>()
        .map_err(|_| AppError::Configuration(format!("{}는 숫자여야 함", key)))
}

//! 근무표 서비스 공용 라이브러리
//!
//! 인증 토큰, 설정, 도메인 모델, 저장소, 에러 타입을 제공합니다.

pub mod auth;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod tool;

pub use tool::error::{AppError, ErrorCode};

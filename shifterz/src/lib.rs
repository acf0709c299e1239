//! Shifterz Library Module
//!
//! 근무표 백엔드의 HTTP 계층과 서비스. 바이너리와 통합 테스트에서 사용합니다.

pub mod api;
pub mod auth_middleware;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use api::{configure_routes, AppState};
pub use auth_middleware::{resolve_token_from_request, AuthMiddleware, Authenticated};
pub use error::{ApiError, ApiResult};
pub use service::{IdentityProvider, KakaoClient, LoginService, WorkCalendarService};

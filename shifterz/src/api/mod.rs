//! REST API 핸들러
//!
//! 라우트 구성과 핸들러가 공유하는 애플리케이션 상태

pub mod auth_api;
pub mod member_api;
pub mod work_calendar_api;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use shared::service::MemberStore;
use shared::tool::error::ErrorCode;

use crate::error::ApiError;
use crate::service::{LoginService, WorkCalendarService};

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub login: LoginService,
    pub members: Arc<dyn MemberStore>,
    pub calendars: WorkCalendarService,
}

/// 헬스체크
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// 해석할 수 없는 JSON 본문은 INVALID_REQUEST
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("요청 본문 해석 실패: {}", err);
        ApiError::from(ErrorCode::InvalidRequest).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|_err, _req| ApiError::from(ErrorCode::InvalidRequest).into())
}

/// 라우트 설정
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health))
        .configure(auth_api::configure)
        .configure(member_api::configure)
        .configure(work_calendar_api::configure);
}

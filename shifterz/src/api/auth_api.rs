//! 카카오 로그인 핸들러

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::model::Member;
use shared::tool::error::ErrorCode;

use super::AppState;
use crate::error::ApiResult;

/// 로그인 페이지 응답
#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub location: String,
}

/// 콜백 요청
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// 로그인 응답 (토큰 쌍 포함)
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub is_new_member: bool,
    pub member: Member,
}

/// 카카오 로그인 페이지 주소
pub async fn login_page(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPageResponse {
        location: state.login.authorization_url(),
    })
}

/// 카카오 로그인 콜백
pub async fn login_callback(
    query: web::Query<CallbackQuery>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let code = query
        .into_inner()
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or(ErrorCode::InvalidRequest)?;

    let outcome = state.login.login(&code).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        access_expires_at: outcome.tokens.access_expires_at,
        refresh_expires_at: outcome.tokens.refresh_expires_at,
        is_new_member: outcome.is_new_member,
        member: outcome.member,
    }))
}

/// 라우트 설정
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/login")
            .route("/page", web::get().to(login_page))
            .route("/callback", web::get().to(login_callback)),
    );
}

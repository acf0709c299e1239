//! 회원 핸들러

use actix_web::{web, HttpResponse};

use shared::tool::error::ErrorCode;

use super::AppState;
use crate::auth_middleware::Authenticated;
use crate::error::ApiResult;

/// 내 정보 조회
pub async fn me(principal: Authenticated, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let member = state
        .members
        .find_by_id(principal.member_id)
        .await?
        .ok_or(ErrorCode::MemberNotFound)?;

    Ok(HttpResponse::Ok().json(member))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/members/me", web::get().to(me));
}

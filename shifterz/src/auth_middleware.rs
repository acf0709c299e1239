//! 인증 미들웨어
//!
//! `X-AUTH-TOKEN` 헤더의 Access Token을 검증해 요청 확장에 인증 주체를 넣습니다.
//! 토큰이 없거나 유효하지 않으면 인증 없이 다음 단계로 넘기고,
//! 보호된 핸들러는 [`Authenticated`] 추출기에서 401을 돌려줍니다.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, warn};

use shared::auth::{Principal, TokenService, AUTH_TOKEN_HEADER, ROLE_USER};
use shared::tool::error::{AppError, ErrorCode};

use crate::error::ApiError;

/// 요청 헤더에서 토큰을 꺼냅니다. 검증은 하지 않습니다.
///
/// 헤더가 없거나 UTF-8이 아닌 값이면 `None`.
pub fn resolve_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// 한 시각 기준으로 토큰을 검증하고 인증 주체를 복원합니다.
///
/// 유효하지 않은 토큰은 `Ok(None)`, 회원 조회 실패는 `Err`.
pub async fn authenticate_at(
    token_service: &TokenService,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Principal>, AppError> {
    if !token_service.validate_token_at(token, now) {
        return Ok(None);
    }
    token_service.resolve_principal_at(token, now).await.map(Some)
}

/// 인증 미들웨어
pub struct AuthMiddleware {
    token_service: TokenService,
}

impl AuthMiddleware {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            token_service: self.token_service.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    token_service: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = resolve_token_from_request(req.headers());

        // 헤더가 없으면 인증 없이 진행
        let Some(token) = token else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        let token_service = self.token_service.clone();
        let service = self.service.clone();

        Box::pin(async move {
            match authenticate_at(&token_service, &token, Utc::now()).await {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Ok(None) => {
                    debug!("유효하지 않은 토큰: path={}", req.path());
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Err(e) => {
                    warn!("인증 주체 복원 실패: path={}", req.path());
                    e.log("인증 미들웨어");
                    let response = req.error_response(ApiError::from(ErrorCode::Unauthorized));
                    Ok(response.map_into_right_body())
                }
            }
        })
    }
}

/// 인증된 요청 주체 추출기
///
/// 미들웨어가 주체를 넣지 않았거나 `ROLE_USER` 권한이 없으면 401 `UNAUTHORIZED`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl Deref for Authenticated {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let principal = req
            .extensions()
            .get::<Principal>()
            .filter(|principal| principal.has_authority(ROLE_USER))
            .cloned();
        ready(
            principal
                .map(Authenticated)
                .ok_or_else(|| ApiError::from(ErrorCode::Unauthorized)),
        )
    }
}

//! 애플리케이션 설정

use std::fmt;

use super::{parse_var, required_var, var_or};
use crate::auth::{derive_signing_key, SigningKey};
use crate::tool::error::AppError;

pub const KAKAO_AUTHORIZE_URL: &str = "https://kauth.kakao.com/oauth/authorize";
pub const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
pub const KAKAO_USER_INFO_URL: &str = "https://kapi.kakao.com/v2/user/me";

/// 카카오 OAuth 설정
#[derive(Clone)]
pub struct KakaoConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
}

impl KakaoConfig {
    /// 카카오 기본 엔드포인트를 사용하는 설정
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            authorize_url: KAKAO_AUTHORIZE_URL.to_string(),
            token_url: KAKAO_TOKEN_URL.to_string(),
            user_info_url: KAKAO_USER_INFO_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            client_id: required_var("KAKAO_CLIENT_ID")?,
            client_secret: std::env::var("KAKAO_CLIENT_SECRET").ok(),
            redirect_uri: var_or(
                "KAKAO_REDIRECT_URI",
                "http://localhost:8080/login/callback",
            ),
            authorize_url: var_or("KAKAO_AUTHORIZE_URL", KAKAO_AUTHORIZE_URL),
            token_url: var_or("KAKAO_TOKEN_URL", KAKAO_TOKEN_URL),
            user_info_url: var_or("KAKAO_USER_INFO_URL", KAKAO_USER_INFO_URL),
        })
    }
}

impl fmt::Debug for KakaoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KakaoConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// 애플리케이션 설정
///
/// 시작할 때 한 번 읽고 이후에는 바뀌지 않습니다.
#[derive(Clone)]
pub struct AppConfig {
    jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub kakao: KakaoConfig,
}

impl AppConfig {
    pub fn new(jwt_secret: impl Into<String>, kakao: KakaoConfig) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            kakao,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            jwt_secret: required_var("JWT_SECRET")?,
            server_host: var_or("server_host", "0.0.0.0"),
            server_port: parse_var("server_port", "8080")?,
            kakao: KakaoConfig::from_env()?,
        })
    }

    /// 토큰 서명 키
    pub fn signing_key(&self) -> SigningKey {
        derive_signing_key(&self.jwt_secret)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"***")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("kakao", &self.kakao)
            .finish()
    }
}

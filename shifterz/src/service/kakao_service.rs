//! 카카오 로그인 서비스
//! OAuth 2.0 인가 코드로 카카오 사용자 정보를 가져옵니다.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, warn};

use shared::config::KakaoConfig;
use shared::model::ProviderProfile;
use shared::tool::error::{AppError, ErrorCode};

/// 외부 인증 제공자
///
/// 로그인 흐름은 이 인터페이스만 알고 카카오 프로토콜은 모릅니다.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 사용자를 보낼 로그인 페이지 주소
    fn authorization_url(&self) -> String;

    /// 인가 코드를 사용자 프로필로 교환
    async fn exchange_code_for_profile(&self, code: &str) -> Result<ProviderProfile, AppError>;
}

/// 카카오 토큰 응답
#[derive(Debug, Deserialize)]
struct KakaoTokenResponse {
    access_token: Option<String>,
}

/// 카카오 사용자 정보 응답
#[derive(Debug, Deserialize)]
struct KakaoUserResponse {
    id: i64,
    #[serde(default)]
    properties: Option<KakaoProperties>,
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoProperties {
    nickname: Option<String>,
    profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoAccount {
    email: Option<String>,
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoProfile {
    nickname: Option<String>,
    profile_image_url: Option<String>,
}

impl From<KakaoUserResponse> for ProviderProfile {
    fn from(user: KakaoUserResponse) -> Self {
        let properties = user.properties.unwrap_or_default();
        let account = user.kakao_account.unwrap_or_default();
        let profile = account.profile.unwrap_or_default();

        ProviderProfile {
            provider_id: user.id,
            nickname: properties.nickname.or(profile.nickname),
            email: account.email,
            profile_image_url: properties.profile_image.or(profile.profile_image_url),
        }
    }
}

/// 카카오 OAuth 클라이언트
#[derive(Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    config: KakaoConfig,
}

impl KakaoClient {
    pub fn new(config: KakaoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Authorization Code를 카카오 Access Token으로 교환
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<String, AppError> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("redirect_uri", self.config.redirect_uri.as_str());
        params.insert("code", code);
        if let Some(secret) = &self.config.client_secret {
            params.insert("client_secret", secret.as_str());
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("카카오 토큰 요청 실패: {}", e);
                AppError::Business(ErrorCode::InvalidKakaoToken)
            })?;

        if !response.status().is_success() {
            warn!("카카오 토큰 교환 거부: status={}", response.status());
            return Err(ErrorCode::InvalidKakaoToken.into());
        }

        let token: KakaoTokenResponse = response.json().await.map_err(|e| {
            warn!("카카오 토큰 응답 해석 실패: {}", e);
            AppError::Business(ErrorCode::InvalidKakaoToken)
        })?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(access_token),
            _ => Err(ErrorCode::InvalidKakaoToken.into()),
        }
    }

    /// 카카오 Access Token으로 사용자 정보 가져오기
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .http
            .get(&self.config.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("카카오 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            warn!("카카오 사용자 정보 조회 거부: status={}", response.status());
            return Err(ErrorCode::KakaoUserinfoFetchFailed.into());
        }

        let user: KakaoUserResponse = response.json().await.map_err(|e| {
            error!("카카오 사용자 정보 해석 실패: {}", e);
            AppError::Business(ErrorCode::KakaoUserinfoFetchFailed)
        })?;

        Ok(user.into())
    }
}

#[async_trait]
impl IdentityProvider for KakaoClient {
    fn authorization_url(&self) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
        ];

        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, NON_ALPHANUMERIC)))
            .collect();

        format!("{}?{}", self.config.authorize_url, query.join("&"))
    }

    async fn exchange_code_for_profile(&self, code: &str) -> Result<ProviderProfile, AppError> {
        let access_token = self.exchange_code_for_token(code).await?;
        self.fetch_profile(&access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_encodes_redirect_uri() {
        let client = KakaoClient::new(KakaoConfig::new(
            "client-123",
            "http://localhost:8080/login/callback",
        ));

        assert_eq!(
            client.authorization_url(),
            "https://kauth.kakao.com/oauth/authorize?client_id=client%2D123\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Flogin%2Fcallback\
             &response_type=code"
        );
    }

    #[test]
    fn profile_prefers_properties_and_falls_back_to_account() {
        let user: KakaoUserResponse = serde_json::from_value(serde_json::json!({
            "id": 12345,
            "kakao_account": {
                "email": "worker@kakao.com",
                "profile": {
                    "nickname": "계정닉네임",
                    "profile_image_url": "http://k.kakaocdn.net/img.jpg"
                }
            }
        }))
        .unwrap();

        let profile = ProviderProfile::from(user);
        assert_eq!(profile.provider_id, 12345);
        assert_eq!(profile.nickname.as_deref(), Some("계정닉네임"));
        assert_eq!(profile.email.as_deref(), Some("worker@kakao.com"));
        assert_eq!(
            profile.profile_image_url.as_deref(),
            Some("http://k.kakaocdn.net/img.jpg")
        );

        let user: KakaoUserResponse = serde_json::from_value(serde_json::json!({
            "id": 1,
            "properties": { "nickname": "속성닉네임" },
            "kakao_account": { "profile": { "nickname": "계정닉네임" } }
        }))
        .unwrap();
        assert_eq!(ProviderProfile::from(user).nickname.as_deref(), Some("속성닉네임"));
    }
}

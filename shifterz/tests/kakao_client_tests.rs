//! 카카오 OAuth 클라이언트 테스트
//!
//! wiremock 서버를 카카오 인증/API 서버 대신 사용합니다.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared::config::KakaoConfig;
use shared::tool::error::ErrorCode;
use shifterz::{IdentityProvider, KakaoClient};

fn client_for(server: &MockServer, secret: Option<&str>) -> KakaoClient {
    let mut config = KakaoConfig::new("rest-api-key", "http://localhost:8080/login/callback");
    config.client_secret = secret.map(str::to_string);
    config.authorize_url = format!("{}/oauth/authorize", server.uri());
    config.token_url = format!("{}/oauth/token", server.uri());
    config.user_info_url = format!("{}/v2/user/me", server.uri());
    KakaoClient::new(config)
}

async fn mount_token_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_id=rest-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "kakao-access-token",
            "expires_in": 21599
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn exchanges_code_and_reads_profile() {
    let server = MockServer::start().await;
    mount_token_ok(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/user/me"))
        .and(header("authorization", "Bearer kakao-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4_021_337_777_i64,
            "properties": {
                "nickname": "야간근무자",
                "profile_image": "http://k.kakaocdn.net/profile.jpg"
            },
            "kakao_account": {
                "email": "night@kakao.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server, None)
        .exchange_code_for_profile("auth-code")
        .await
        .unwrap();

    assert_eq!(profile.provider_id, 4_021_337_777);
    assert_eq!(profile.nickname.as_deref(), Some("야간근무자"));
    assert_eq!(profile.email.as_deref(), Some("night@kakao.com"));
    assert_eq!(
        profile.profile_image_url.as_deref(),
        Some("http://k.kakaocdn.net/profile.jpg")
    );
}

#[tokio::test]
async fn client_secret_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("client_secret=shh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "kakao-access-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server, Some("shh"))
        .exchange_code_for_token("auth-code")
        .await
        .unwrap();
    assert_eq!(token, "kakao-access-token");
}

#[tokio::test]
async fn rejected_code_is_invalid_kakao_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_code": "KOE320"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .exchange_code_for_profile("used-code")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidKakaoToken);
}

#[tokio::test]
async fn token_response_without_access_token_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "bearer" })))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .exchange_code_for_token("auth-code")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidKakaoToken);
}

#[tokio::test]
async fn user_info_failure_is_reported() {
    let server = MockServer::start().await;
    mount_token_ok(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/user/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "msg": "this access token does not exist",
            "code": -401
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .exchange_code_for_profile("auth-code")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::KakaoUserinfoFetchFailed);
}

#[tokio::test]
async fn unreachable_kakao_is_invalid_token() {
    let server = MockServer::start().await;
    let client = client_for(&server, None);
    drop(server);

    let err = client.exchange_code_for_token("auth-code").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidKakaoToken);
}

#[tokio::test]
async fn authorization_url_uses_configured_endpoint() {
    let server = MockServer::start().await;
    let url = client_for(&server, None).authorization_url();

    assert!(url.starts_with(&format!("{}/oauth/authorize?", server.uri())));
    assert!(url.contains("client_id=rest%2Dapi%2Dkey"));
    assert!(url.contains("response_type=code"));
}

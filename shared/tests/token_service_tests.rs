//! 토큰 서비스 통합 테스트
//!
//! 시간이 관련된 검증은 모두 `_at` 함수로 고정 시각을 넣어 확인합니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::auth::{
    derive_signing_key, TokenError, TokenService, ACCESS_TOKEN_LIFETIME_SECS,
    REFRESH_TOKEN_LIFETIME_SECS, ROLE_USER,
};
use shared::model::ProviderProfile;
use shared::service::{InMemoryMemberStore, MemberStore};
use shared::AppError;

const SECRET: &str = "shifterz-test-secret-value";

fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn service_with(secret: &str, members: Arc<InMemoryMemberStore>) -> TokenService {
    TokenService::new(&derive_signing_key(secret), members).unwrap()
}

fn service() -> TokenService {
    service_with(SECRET, Arc::new(InMemoryMemberStore::new()))
}

#[test]
fn subject_id_survives_issue_and_extract() {
    let tokens = service();
    for id in [1_i64, 42, 9_007_199_254_740_993, i64::MAX] {
        let token = tokens.issue_access_token_at(id, issued_at()).unwrap();
        let extracted = tokens
            .extract_subject_id_at(&token, issued_at() + Duration::seconds(1))
            .unwrap();
        assert_eq!(extracted, id);
    }
}

#[test]
fn issued_access_token_is_valid_right_away_with_real_clock() {
    let tokens = service();
    let token = tokens.issue_access_token(7).unwrap();
    assert!(tokens.validate_token(&token));
    assert_eq!(tokens.extract_subject_id(&token).unwrap(), 7);
}

#[test]
fn access_token_expires_after_thirty_minutes() {
    let tokens = service();
    let token = tokens.issue_access_token_at(7, issued_at()).unwrap();
    let lifetime = Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS);

    assert!(tokens.validate_token_at(&token, issued_at()));
    assert!(tokens.validate_token_at(&token, issued_at() + lifetime - Duration::seconds(1)));
    // 만료 시각과 같으면 만료
    assert!(!tokens.validate_token_at(&token, issued_at() + lifetime));
    assert!(!tokens.validate_token_at(&token, issued_at() + lifetime + Duration::seconds(1)));
}

#[test]
fn refresh_token_lives_for_seven_days() {
    let tokens = service();
    let token = tokens.issue_refresh_token_at(7, issued_at()).unwrap();

    let almost = issued_at() + Duration::seconds(REFRESH_TOKEN_LIFETIME_SECS - 1);
    let past = issued_at() + Duration::seconds(REFRESH_TOKEN_LIFETIME_SECS + 1);

    assert!(tokens.validate_token_at(&token, almost));
    assert!(!tokens.validate_token_at(&token, past));
}

#[test]
fn garbage_tokens_are_invalid_without_error() {
    let tokens = service();
    assert!(!tokens.validate_token(""));
    assert!(!tokens.validate_token("garbage"));
    assert!(!tokens.validate_token("a.b.c"));
    assert!(!tokens.validate_token("eyJhbGciOiJIUzI1NiJ9.e30."));

    assert!(matches!(
        tokens.extract_subject_id("garbage"),
        Err(TokenError::Malformed)
    ));
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let ours = service();
    let theirs = service_with("some-other-secret", Arc::new(InMemoryMemberStore::new()));

    let foreign = theirs.issue_access_token_at(7, issued_at()).unwrap();

    assert!(!ours.validate_token_at(&foreign, issued_at()));
    assert!(matches!(
        ours.extract_subject_id_at(&foreign, issued_at()),
        Err(TokenError::Malformed)
    ));
}

#[test]
fn tampered_claims_break_the_signature() {
    let tokens = service();
    let token = tokens.issue_access_token_at(7, issued_at()).unwrap();
    let other = tokens.issue_access_token_at(8, issued_at()).unwrap();

    // 7번 토큰의 서명에 8번 토큰의 클레임을 붙임
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert!(!tokens.validate_token_at(&forged, issued_at()));
}

#[test]
fn expired_token_cannot_be_used_for_extraction() {
    let tokens = service();
    let token = tokens.issue_access_token_at(7, issued_at()).unwrap();
    let later = issued_at() + Duration::hours(1);

    assert!(matches!(
        tokens.extract_subject_id_at(&token, later),
        Err(TokenError::Expired)
    ));
}

#[tokio::test]
async fn principal_for_existing_member_has_user_role() {
    let members = Arc::new(InMemoryMemberStore::new());
    let member = members
        .create(&ProviderProfile {
            provider_id: 3_141_592,
            nickname: Some("근무자".into()),
            email: Some("worker@kakao.com".into()),
            profile_image_url: None,
        })
        .await
        .unwrap();

    let tokens = service_with(SECRET, members.clone());
    let token = tokens.issue_access_token_at(member.id, issued_at()).unwrap();

    let principal = tokens
        .resolve_principal_at(&token, issued_at() + Duration::minutes(5))
        .await
        .unwrap();

    assert_eq!(principal.member_id, member.id);
    assert_eq!(principal.authorities, vec![ROLE_USER.to_string()]);
    assert!(principal.credentials.is_empty());
}

#[tokio::test]
async fn principal_for_unknown_member_fails_with_member_not_found() {
    let tokens = service();
    let token = tokens.issue_access_token_at(404, issued_at()).unwrap();

    // 토큰 자체는 유효함
    assert!(tokens.validate_token_at(&token, issued_at()));

    let err = tokens
        .resolve_principal_at(&token, issued_at())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Token(TokenError::MemberNotFound)));
}

#[tokio::test]
async fn removed_member_can_no_longer_resolve() {
    let members = Arc::new(InMemoryMemberStore::new());
    let member = members
        .create(&ProviderProfile {
            provider_id: 77,
            nickname: None,
            email: None,
            profile_image_url: None,
        })
        .await
        .unwrap();
    let tokens = service_with(SECRET, members.clone());
    let token = tokens.issue_access_token_at(member.id, issued_at()).unwrap();

    members.remove(member.id).await;

    let err = tokens
        .resolve_principal_at(&token, issued_at())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Token(TokenError::MemberNotFound)));
}

#[tokio::test]
async fn principal_resolution_rejects_expired_token() {
    let tokens = service();
    let token = tokens.issue_access_token_at(1, issued_at()).unwrap();
    let err = tokens
        .resolve_principal_at(&token, issued_at() + Duration::days(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Token(TokenError::Expired)));
}

//! JWT 토큰 서비스
//!
//! Access Token과 Refresh Token 발급, 검증, 토큰에서 인증 주체 복원.
//!
//! 검증 경로는 모두 [`TokenService::verify_at`] 하나를 거칩니다.
//! 다음 경우는 전부 유효하지 않은 토큰으로 취급됩니다.
//! - 세 부분(header.claims.signature) 구조가 아니거나 base64/JSON 해석 실패
//! - HS256 이외의 알고리즘이거나 서명 불일치
//! - `sub` 또는 `exp` 클레임 누락
//! - `exp`가 현재 시각보다 크지 않음 (만료 시각과 같으면 만료)

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::types::{Claims, Principal, TokenPair};
use crate::model::MemberId;
use crate::service::member_store::MemberStore;
use crate::tool::error::AppError;

/// Access Token 유효 시간: 30분
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 30 * 60;
/// Refresh Token 유효 시간: 7일
pub const REFRESH_TOKEN_LIFETIME_SECS: i64 = 604_800;

/// 토큰 검증 실패 원인
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("형식이 잘못되었거나 서명이 일치하지 않는 토큰")]
    Malformed,

    #[error("만료된 토큰")]
    Expired,

    #[error("토큰에 해당하는 회원이 없음")]
    MemberNotFound,

    #[error("토큰 서명 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// 서명 키
///
/// 설정된 원본 시크릿을 base64로 인코딩한 값입니다. HS256 키로는
/// 이 값을 디코딩한 바이트, 즉 원본 시크릿 바이트가 사용됩니다.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    encoded: String,
}

impl SigningKey {
    pub fn as_base64(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

/// 원본 시크릿 문자열에서 서명 키를 파생합니다.
pub fn derive_signing_key(raw_secret: &str) -> SigningKey {
    SigningKey {
        encoded: B64.encode(raw_secret.as_bytes()),
    }
}

/// 토큰 서비스
///
/// 시작 시 한 번 만들어지고 이후에는 읽기만 합니다.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    members: Arc<dyn MemberStore>,
}

impl TokenService {
    /// 새 토큰 서비스 생성
    pub fn new(key: &SigningKey, members: Arc<dyn MemberStore>) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_base64_secret(key.as_base64())?;
        let decoding_key = DecodingKey::from_base64_secret(key.as_base64())?;

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 verify_at에서 주어진 시각 기준으로 판단
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            members,
        })
    }

    pub fn access_token_lifetime() -> Duration {
        Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS)
    }

    pub fn refresh_token_lifetime() -> Duration {
        Duration::seconds(REFRESH_TOKEN_LIFETIME_SECS)
    }

    /// 주어진 유효 시간으로 토큰을 발급합니다.
    ///
    /// 같은 `now`에 대해서는 항상 같은 토큰이 나옵니다.
    pub fn issue_token(
        &self,
        subject: MemberId,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Access Token 발급 (30분)
    pub fn issue_access_token(&self, subject: MemberId) -> Result<String, TokenError> {
        self.issue_access_token_at(subject, Utc::now())
    }

    pub fn issue_access_token_at(
        &self,
        subject: MemberId,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.issue_token(subject, Self::access_token_lifetime(), now)
    }

    /// Refresh Token 발급 (7일)
    ///
    /// 아직 이 토큰으로 Access Token을 재발급하는 흐름은 없습니다.
    pub fn issue_refresh_token(&self, subject: MemberId) -> Result<String, TokenError> {
        self.issue_refresh_token_at(subject, Utc::now())
    }

    pub fn issue_refresh_token_at(
        &self,
        subject: MemberId,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.issue_token(subject, Self::refresh_token_lifetime(), now)
    }

    /// 토큰 쌍 생성 (Access + Refresh)
    pub fn issue_token_pair(&self, subject: MemberId) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_access_token_at(subject, now)?,
            refresh_token: self.issue_refresh_token_at(subject, now)?,
            access_expires_at: now + Self::access_token_lifetime(),
            refresh_expires_at: now + Self::refresh_token_lifetime(),
        })
    }

    /// 서명, 구조, 만료를 한 번에 검증하고 클레임을 돌려줍니다.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("토큰 검증 실패: {:?}", e.kind());
            TokenError::Malformed
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// 토큰 유효성, 만료일자 확인
    ///
    /// 어떤 실패도 밖으로 내보내지 않고 `false`가 됩니다.
    pub fn validate_token(&self, token: &str) -> bool {
        self.validate_token_at(token, Utc::now())
    }

    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.verify_at(token, now).is_ok()
    }

    /// 토큰에서 회원 ID 추출
    ///
    /// 만료된 토큰도 거부합니다.
    pub fn extract_subject_id(&self, token: &str) -> Result<MemberId, TokenError> {
        self.extract_subject_id_at(token, Utc::now())
    }

    pub fn extract_subject_id_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<MemberId, TokenError> {
        let claims = self.verify_at(token, now)?;
        claims
            .sub
            .parse::<MemberId>()
            .map_err(|_| TokenError::Malformed)
    }

    /// 토큰에서 인증 주체 복원
    ///
    /// 토큰이 유효해도 회원이 없으면 `TokenError::MemberNotFound`.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AppError> {
        self.resolve_principal_at(token, Utc::now()).await
    }

    pub async fn resolve_principal_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, AppError> {
        let member_id = self.extract_subject_id_at(token, now)?;

        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or(TokenError::MemberNotFound)?;

        Ok(Principal::user(member.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::member_store::InMemoryMemberStore;
    use chrono::TimeZone;

    fn service(secret: &str) -> TokenService {
        let members: Arc<dyn MemberStore> = Arc::new(InMemoryMemberStore::default());
        TokenService::new(&derive_signing_key(secret), members).unwrap()
    }

    #[test]
    fn derived_key_is_base64_of_raw_secret() {
        assert_eq!(derive_signing_key("secret").as_base64(), "c2VjcmV0");
        assert_eq!(derive_signing_key(""), derive_signing_key(""));
        assert_eq!(format!("{:?}", derive_signing_key("secret")), "SigningKey(***)");
    }

    #[test]
    fn issuance_is_deterministic_for_fixed_time() {
        let svc = service("unit-test-secret");
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        let a = svc.issue_access_token_at(5, now).unwrap();
        let b = svc.issue_access_token_at(5, now).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split('.').count(), 3);
    }

    #[test]
    fn claims_carry_subject_and_timestamps() {
        let svc = service("unit-test-secret");
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        let token = svc.issue_refresh_token_at(12, now).unwrap();
        let claims = svc.verify_at(&token, now).unwrap();
        assert_eq!(claims.sub, "12");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + REFRESH_TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn non_numeric_subject_is_malformed() {
        let svc = service("unit-test-secret");
        let now = Utc::now();
        let claims = Claims {
            sub: "someone@example.com".into(),
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(svc.validate_token(&token));
        assert!(matches!(
            svc.extract_subject_id(&token),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn expired_token_is_rejected_by_extraction() {
        let svc = service("unit-test-secret");
        let issued = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        let token = svc.issue_access_token_at(3, issued).unwrap();
        let later = issued + Duration::minutes(31);
        assert!(matches!(
            svc.extract_subject_id_at(&token, later),
            Err(TokenError::Expired)
        ));
    }
}

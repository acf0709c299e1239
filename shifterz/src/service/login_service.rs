//! 로그인 서비스
//!
//! 인가 코드 → 카카오 프로필 → 회원 조회/생성 → 토큰 발급

use std::sync::Arc;
use tracing::info;

use shared::auth::{TokenPair, TokenService};
use shared::model::Member;
use shared::service::MemberStore;
use shared::tool::error::AppError;

use super::kakao_service::IdentityProvider;

/// 로그인 결과
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub member: Member,
    pub tokens: TokenPair,
    pub is_new_member: bool,
}

#[derive(Clone)]
pub struct LoginService {
    provider: Arc<dyn IdentityProvider>,
    members: Arc<dyn MemberStore>,
    tokens: TokenService,
}

impl LoginService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        members: Arc<dyn MemberStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            provider,
            members,
            tokens,
        }
    }

    pub fn authorization_url(&self) -> String {
        self.provider.authorization_url()
    }

    /// 인가 코드로 로그인
    ///
    /// 처음 보는 카카오 계정이면 회원을 만들고, 아니면 프로필만 갱신합니다.
    pub async fn login(&self, code: &str) -> Result<LoginOutcome, AppError> {
        let profile = self.provider.exchange_code_for_profile(code).await?;

        let (member, is_new_member) = match self.members.find_by_kakao_id(profile.provider_id).await? {
            Some(existing) => (self.members.sync_profile(existing.id, &profile).await?, false),
            None => (self.members.create(&profile).await?, true),
        };

        let tokens = self.tokens.issue_token_pair(member.id)?;

        info!(
            "로그인 성공: member_id={}, 신규={}",
            member.id, is_new_member
        );

        Ok(LoginOutcome {
            member,
            tokens,
            is_new_member,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::auth::derive_signing_key;
    use shared::model::ProviderProfile;
    use shared::service::InMemoryMemberStore;
    use shared::tool::error::ErrorCode;

    struct FixedProvider {
        nickname: &'static str,
    }

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        fn authorization_url(&self) -> String {
            "https://kauth.example/authorize".into()
        }

        async fn exchange_code_for_profile(&self, code: &str) -> Result<ProviderProfile, AppError> {
            if code != "good-code" {
                return Err(ErrorCode::InvalidKakaoToken.into());
            }
            Ok(ProviderProfile {
                provider_id: 555,
                nickname: Some(self.nickname.to_string()),
                email: None,
                profile_image_url: None,
            })
        }
    }

    fn login_service(
        nickname: &'static str,
        members: Arc<InMemoryMemberStore>,
    ) -> (LoginService, TokenService) {
        let tokens = TokenService::new(&derive_signing_key("login-test"), members.clone()).unwrap();
        let service = LoginService::new(
            Arc::new(FixedProvider { nickname }),
            members,
            tokens.clone(),
        );
        (service, tokens)
    }

    #[tokio::test]
    async fn first_login_creates_member_and_issues_tokens() {
        let members = Arc::new(InMemoryMemberStore::new());
        let (service, tokens) = login_service("첫로그인", members.clone());

        let outcome = service.login("good-code").await.unwrap();

        assert!(outcome.is_new_member);
        assert_eq!(outcome.member.kakao_id, 555);
        assert_eq!(members.len().await, 1);
        assert_eq!(
            tokens.extract_subject_id(&outcome.tokens.access_token).unwrap(),
            outcome.member.id
        );
        assert!(tokens.validate_token(&outcome.tokens.refresh_token));
    }

    #[tokio::test]
    async fn second_login_syncs_profile_of_same_member() {
        let members = Arc::new(InMemoryMemberStore::new());
        let (first, _) = login_service("이전", members.clone());
        let created = first.login("good-code").await.unwrap().member;

        let (second, _) = login_service("새닉네임", members.clone());
        let outcome = second.login("good-code").await.unwrap();

        assert!(!outcome.is_new_member);
        assert_eq!(outcome.member.id, created.id);
        assert_eq!(outcome.member.nickname.as_deref(), Some("새닉네임"));
        assert_eq!(members.len().await, 1);
    }

    #[test]
    fn rejected_code_creates_nothing() {
        tokio_test::block_on(async {
            let members = Arc::new(InMemoryMemberStore::new());
            let (service, _) = login_service("x", members.clone());

            let err = service.login("bad-code").await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidKakaoToken);
            assert!(members.is_empty().await);
        });
    }
}

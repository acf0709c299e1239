use serde::{Deserialize, Serialize};

/// 회원 내부 식별자
pub type MemberId = i64;

/// 회원
///
/// 카카오 로그인에 처음 성공할 때 생성되고, 이후 로그인마다 카카오 프로필로 갱신됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub kakao_id: i64,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
}

/// 외부 인증 제공자에서 받아온 프로필
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider_id: i64,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
}

impl Member {
    /// 프로필로 새 회원 레코드를 만듭니다.
    pub fn from_profile(id: MemberId, profile: &ProviderProfile) -> Self {
        Self {
            id,
            kakao_id: profile.provider_id,
            nickname: profile.nickname.clone(),
            email: profile.email.clone(),
            profile_image_url: profile.profile_image_url.clone(),
        }
    }

    /// 프로필 필드만 다시 맞춥니다. 식별자는 바뀌지 않습니다.
    pub fn apply_profile(&mut self, profile: &ProviderProfile) {
        self.nickname = profile.nickname.clone();
        self.email = profile.email.clone();
        self.profile_image_url = profile.profile_image_url.clone();
    }
}

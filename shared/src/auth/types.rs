//! 인증 관련 공통 타입 정의

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::MemberId;

/// Access Token을 실어 보내는 요청 헤더
pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

/// 로그인한 회원에게 부여되는 유일한 권한
pub const ROLE_USER: &str = "ROLE_USER";

/// JWT 클레임
///
/// Access/Refresh 토큰이 같은 형태를 씁니다. 만료 시간만 다릅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 회원 ID
    pub iat: i64,    // 발급 시간
    pub exp: i64,    // 만료 시간
}

/// JWT 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// 인증된 요청 주체
///
/// 요청마다 Access Token에서 새로 복원되며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub member_id: MemberId,
    pub authorities: Vec<String>,
    pub credentials: String,
}

impl Principal {
    /// `ROLE_USER` 권한 하나와 빈 자격 증명을 가진 주체
    pub fn user(member_id: MemberId) -> Self {
        Self {
            member_id,
            authorities: vec![ROLE_USER.to_string()],
            credentials: String::new(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_principal_has_single_fixed_role() {
        let principal = Principal::user(42);
        assert_eq!(principal.member_id, 42);
        assert_eq!(principal.authorities, vec![ROLE_USER.to_string()]);
        assert!(principal.has_authority("ROLE_USER"));
        assert!(!principal.has_authority("ROLE_ADMIN"));
        assert!(principal.credentials.is_empty());
    }
}

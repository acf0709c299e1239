//! 인증 모듈
//!
//! 세션 토큰 발급/검증과 인증 주체 타입

pub mod token;
pub mod types;

pub use token::{
    derive_signing_key, SigningKey, TokenError, TokenService, ACCESS_TOKEN_LIFETIME_SECS,
    REFRESH_TOKEN_LIFETIME_SECS,
};
pub use types::{Claims, Principal, TokenPair, AUTH_TOKEN_HEADER, ROLE_USER};

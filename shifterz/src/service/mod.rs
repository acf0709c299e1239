//! 서비스 계층 모듈
//!
//! 로그인과 근무표 비즈니스 로직을 담당합니다.

pub mod kakao_service;
pub mod login_service;
pub mod work_calendar_service;

pub use kakao_service::{IdentityProvider, KakaoClient};
pub use login_service::{LoginOutcome, LoginService};
pub use work_calendar_service::{
    CreateCalendarRequest, UpdateShiftsRequest, WorkCalendarService,
};

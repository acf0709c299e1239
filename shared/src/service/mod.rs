//! 저장소 계층 모듈
//!
//! 회원과 근무표 데이터 액세스를 담당합니다.

pub mod calendar_store;
pub mod member_store;

pub use calendar_store::{CalendarStore, InMemoryCalendarStore, MySqlCalendarStore};
pub use member_store::{InMemoryMemberStore, MemberStore, MySqlMemberStore};

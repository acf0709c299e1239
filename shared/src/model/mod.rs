pub mod member;
pub mod work_calendar;

pub use member::{Member, MemberId, ProviderProfile};
pub use work_calendar::{NewWorkCalendar, WorkCalendar, WorkDay, WorkTime};

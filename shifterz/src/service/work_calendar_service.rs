//! 근무표 서비스
//!
//! 요청 검증과 근무표 등록/수정/삭제/근무일 조회

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

use shared::model::{MemberId, NewWorkCalendar, WorkCalendar, WorkDay, WorkTime};
use shared::service::CalendarStore;
use shared::tool::error::helpers::{required, required_text};
use shared::tool::error::{AppError, ErrorCode};

const YEAR_RANGE: std::ops::RangeInclusive<i64> = 1000..=9999;
const MONTH_RANGE: std::ops::RangeInclusive<i64> = 1..=12;

/// 근무표 등록 요청
///
/// 누락된 항목을 각자의 에러 코드로 알려주기 위해 모든 필드가 선택값입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCalendarRequest {
    pub calendar_name: Option<String>,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub work_group: Option<String>,
    pub work_times: Option<BTreeMap<String, WorkTime>>,
    /// "YYYY-MM-DD" → 근무 타입
    pub shifts: Option<BTreeMap<String, String>>,
}

/// 근무일 수정 요청
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShiftsRequest {
    pub shifts: Option<BTreeMap<String, String>>,
}

/// 경로의 연도 문자열 해석
pub fn parse_year(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|y| YEAR_RANGE.contains(y))
        .map(|y| y as i32)
        .ok_or(AppError::Business(ErrorCode::InvalidYearFormat))
}

/// 경로의 월 문자열 해석
pub fn parse_month(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|m| MONTH_RANGE.contains(m))
        .map(|m| m as u32)
        .ok_or(AppError::Business(ErrorCode::InvalidMonthFormat))
}

fn check_time(value: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::Business(ErrorCode::InvalidRequest))
}

fn validate_work_times(
    work_times: Option<BTreeMap<String, WorkTime>>,
) -> Result<BTreeMap<String, WorkTime>, AppError> {
    let work_times = required(work_times, ErrorCode::CalendarWorkTimeRequired)?;
    if work_times.is_empty() {
        return Err(ErrorCode::CalendarWorkTimeRequired.into());
    }

    let mut validated = BTreeMap::new();
    for (work_type, time) in work_times {
        let work_type = required_text(Some(work_type), ErrorCode::InvalidRequest)?;
        check_time(&time.start_time)?;
        check_time(&time.end_time)?;
        validated.insert(work_type, time);
    }
    Ok(validated)
}

/// 날짜 키를 해석하고 모두 해당 연/월 안에 있는지 확인합니다.
fn validate_shifts(
    shifts: Option<BTreeMap<String, String>>,
    year: i32,
    month: u32,
) -> Result<BTreeMap<NaiveDate, String>, AppError> {
    let shifts = required(shifts, ErrorCode::CalendarShiftRequired)?;
    if shifts.is_empty() {
        return Err(ErrorCode::CalendarShiftRequired.into());
    }

    let mut validated = BTreeMap::new();
    for (raw_date, work_type) in shifts {
        let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Business(ErrorCode::InvalidRequest))?;
        if date.year() != year || date.month() != month {
            return Err(ErrorCode::InvalidRequest.into());
        }
        let work_type = required_text(Some(work_type), ErrorCode::InvalidRequest)?;
        validated.insert(date, work_type);
    }
    Ok(validated)
}

/// 등록 요청 검증
///
/// 이름 → 연도 → 월 → 근무조 → 근무 시간 → 근무일 순으로 확인하고
/// 처음 걸린 항목의 에러를 돌려줍니다.
pub fn validate_create(request: CreateCalendarRequest) -> Result<NewWorkCalendar, AppError> {
    let calendar_name = required_text(request.calendar_name, ErrorCode::CalendarNameRequired)?;

    let year = required(request.year, ErrorCode::CalendarYearRequired)?;
    if !YEAR_RANGE.contains(&year) {
        return Err(ErrorCode::InvalidYearFormat.into());
    }

    let month = required(request.month, ErrorCode::CalendarMonthRequired)?;
    if !MONTH_RANGE.contains(&month) {
        return Err(ErrorCode::InvalidMonthFormat.into());
    }

    let work_group = required_text(request.work_group, ErrorCode::CalendarWorkGroupRequired)?;
    let work_times = validate_work_times(request.work_times)?;
    let shifts = validate_shifts(request.shifts, year as i32, month as u32)?;

    Ok(NewWorkCalendar {
        calendar_name,
        year: year as i32,
        month: month as u32,
        work_group,
        work_times,
        shifts,
    })
}

#[derive(Clone)]
pub struct WorkCalendarService {
    calendars: Arc<dyn CalendarStore>,
}

impl WorkCalendarService {
    pub fn new(calendars: Arc<dyn CalendarStore>) -> Self {
        Self { calendars }
    }

    /// 근무표 등록
    pub async fn create(
        &self,
        member_id: MemberId,
        request: CreateCalendarRequest,
    ) -> Result<WorkCalendar, AppError> {
        let calendar = validate_create(request)?;

        if self
            .calendars
            .find(member_id, calendar.year, calendar.month)
            .await?
            .is_some()
        {
            return Err(ErrorCode::CalendarDuplication.into());
        }

        let created = self.calendars.create(member_id, calendar).await?;
        info!(
            "근무표 등록: member_id={}, {}-{:02}",
            member_id, created.year, created.month
        );
        Ok(created)
    }

    /// 근무일 수정
    ///
    /// 요청에 있는 날짜만 바꾸고 나머지 날짜는 그대로 둡니다.
    pub async fn update_shifts(
        &self,
        member_id: MemberId,
        year: i32,
        month: u32,
        request: UpdateShiftsRequest,
    ) -> Result<WorkCalendar, AppError> {
        let shifts = request
            .shifts
            .filter(|s| !s.is_empty())
            .ok_or(AppError::Business(ErrorCode::CalendarShiftRequired))?;

        let calendar = self
            .calendars
            .find(member_id, year, month)
            .await?
            .ok_or(AppError::Business(ErrorCode::CalendarNotFound))?;

        let shifts = validate_shifts(Some(shifts), year, month)?;
        self.calendars.upsert_shifts(calendar.id, &shifts).await?;

        self.calendars
            .find(member_id, year, month)
            .await?
            .ok_or(AppError::Business(ErrorCode::CalendarNotFound))
    }

    /// 근무표 삭제
    pub async fn delete(&self, member_id: MemberId, year: i32, month: u32) -> Result<(), AppError> {
        let deleted = self
            .calendars
            .delete(member_id, year, month)
            .await
            .map_err(|e| {
                error!("근무표 삭제 실패: member_id={}, {}-{}: {}", member_id, year, month, e);
                AppError::Business(ErrorCode::CalendarDeleteFailed)
            })?;

        if !deleted {
            return Err(ErrorCode::CalendarNotFound.into());
        }

        info!("근무표 삭제: member_id={}, {}-{:02}", member_id, year, month);
        Ok(())
    }

    /// 연/월의 근무일 조회
    pub async fn work_days(
        &self,
        member_id: MemberId,
        year: i32,
        month: u32,
    ) -> Result<Vec<WorkDay>, AppError> {
        let days = self
            .calendars
            .find(member_id, year, month)
            .await?
            .map(|calendar| calendar.work_days())
            .unwrap_or_default();

        if days.is_empty() {
            return Err(ErrorCode::WorkDayNotFound.into());
        }
        Ok(days)
    }
}

//! 근무표 핸들러
//!
//! 모든 요청은 로그인한 회원 자신의 근무표에만 적용됩니다.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use shared::model::{WorkCalendar, WorkDay, WorkTime};

use super::AppState;
use crate::auth_middleware::Authenticated;
use crate::error::ApiResult;
use crate::service::work_calendar_service::{parse_month, parse_year};
use crate::service::{CreateCalendarRequest, UpdateShiftsRequest};

/// 근무표 응답
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub id: i64,
    pub calendar_name: String,
    pub year: i32,
    pub month: u32,
    pub work_group: String,
    pub work_times: BTreeMap<String, WorkTime>,
    pub shifts: BTreeMap<NaiveDate, String>,
}

impl From<WorkCalendar> for CalendarResponse {
    fn from(calendar: WorkCalendar) -> Self {
        Self {
            id: calendar.id,
            calendar_name: calendar.calendar_name,
            year: calendar.year,
            month: calendar.month,
            work_group: calendar.work_group,
            work_times: calendar.work_times,
            shifts: calendar.shifts,
        }
    }
}

/// 근무일 조회 응답
#[derive(Debug, Serialize)]
pub struct WorkDaysResponse {
    pub year: i32,
    pub month: u32,
    pub work_days: Vec<WorkDay>,
}

/// 근무표 등록
pub async fn create_calendar(
    principal: Authenticated,
    body: web::Json<CreateCalendarRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let created = state
        .calendars
        .create(principal.member_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(CalendarResponse::from(created)))
}

/// 근무일 수정
pub async fn update_calendar(
    principal: Authenticated,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateShiftsRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let (year, month) = (parse_year(&year)?, parse_month(&month)?);

    let updated = state
        .calendars
        .update_shifts(principal.member_id, year, month, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CalendarResponse::from(updated)))
}

/// 근무표 삭제
pub async fn delete_calendar(
    principal: Authenticated,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let (year, month) = (parse_year(&year)?, parse_month(&month)?);

    state
        .calendars
        .delete(principal.member_id, year, month)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 연/월 근무일 조회
pub async fn get_work_days(
    principal: Authenticated,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let (year, month) = (parse_year(&year)?, parse_month(&month)?);

    let work_days = state
        .calendars
        .work_days(principal.member_id, year, month)
        .await?;

    Ok(HttpResponse::Ok().json(WorkDaysResponse {
        year,
        month,
        work_days,
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/works/calendar")
            .route("", web::post().to(create_calendar))
            .route("/{year}/{month}", web::patch().to(update_calendar))
            .route("/{year}/{month}", web::delete().to(delete_calendar))
            .route("/{year}/{month}", web::get().to(get_work_days)),
    );
}

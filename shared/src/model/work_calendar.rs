//! 근무표 도메인 모델

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::member::MemberId;

/// 근무 시간대 (HH:MM)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTime {
    pub start_time: String,
    pub end_time: String,
}

/// 특정 회원의 한 달치 근무표
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    pub id: i64,
    pub member_id: MemberId,
    pub calendar_name: String,
    pub year: i32,
    pub month: u32,
    pub work_group: String,
    /// 근무 타입(예: "D", "E", "N") → 시간대
    pub work_times: BTreeMap<String, WorkTime>,
    /// 날짜 → 근무 타입
    pub shifts: BTreeMap<NaiveDate, String>,
}

/// 검증을 마친 근무표 생성 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkCalendar {
    pub calendar_name: String,
    pub year: i32,
    pub month: u32,
    pub work_group: String,
    pub work_times: BTreeMap<String, WorkTime>,
    pub shifts: BTreeMap<NaiveDate, String>,
}

/// 하루치 근무 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDay {
    pub work_date: NaiveDate,
    pub work_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl WorkCalendar {
    pub fn from_new(id: i64, member_id: MemberId, new: NewWorkCalendar) -> Self {
        Self {
            id,
            member_id,
            calendar_name: new.calendar_name,
            year: new.year,
            month: new.month,
            work_group: new.work_group,
            work_times: new.work_times,
            shifts: new.shifts,
        }
    }

    /// 날짜순 근무일 목록. 근무 타입에 시간대가 있으면 함께 채웁니다.
    pub fn work_days(&self) -> Vec<WorkDay> {
        self.shifts
            .iter()
            .map(|(date, work_type)| {
                let time = self.work_times.get(work_type);
                WorkDay {
                    work_date: *date,
                    work_type: work_type.clone(),
                    start_time: time.map(|t| t.start_time.clone()),
                    end_time: time.map(|t| t.end_time.clone()),
                }
            })
            .collect()
    }
}

//! 근무표 저장소

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::model::{MemberId, NewWorkCalendar, WorkCalendar, WorkTime};
use crate::tool::error::{AppError, ErrorCode};

/// 근무표 저장소 인터페이스
///
/// 근무표는 (회원, 연도, 월)마다 하나입니다.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn find(
        &self,
        member_id: MemberId,
        year: i32,
        month: u32,
    ) -> Result<Option<WorkCalendar>, AppError>;

    /// 같은 연/월이 이미 있으면 `CalendarDuplication`
    async fn create(
        &self,
        member_id: MemberId,
        calendar: NewWorkCalendar,
    ) -> Result<WorkCalendar, AppError>;

    /// 주어진 날짜의 근무 타입을 넣거나 바꿉니다. 나머지 날짜는 그대로입니다.
    async fn upsert_shifts(
        &self,
        calendar_id: i64,
        shifts: &BTreeMap<NaiveDate, String>,
    ) -> Result<(), AppError>;

    /// 삭제된 근무표가 있으면 `true`
    async fn delete(&self, member_id: MemberId, year: i32, month: u32) -> Result<bool, AppError>;
}

#[derive(FromRow)]
struct CalendarRow {
    id: i64,
    member_id: i64,
    calendar_name: String,
    year: i32,
    month: i32,
    work_group: String,
    work_times: String,
}

fn decode_error(e: serde_json::Error) -> AppError {
    AppError::Database(sqlx::Error::Decode(Box::new(e)))
}

fn encode_error(e: serde_json::Error) -> AppError {
    AppError::Database(sqlx::Error::Encode(Box::new(e)))
}

fn is_duplicate_entry(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| code == "23000" || code.starts_with("1062"))
            .unwrap_or(false),
        _ => false,
    }
}

/// MariaDB 근무표 저장소
#[derive(Clone)]
pub struct MySqlCalendarStore {
    pool: MySqlPool,
}

impl MySqlCalendarStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn load_shifts(&self, calendar_id: i64) -> Result<BTreeMap<NaiveDate, String>, AppError> {
        let days: Vec<(NaiveDate, String)> = sqlx::query_as(
            "SELECT work_date, work_type FROM work_days WHERE calendar_id = ? ORDER BY work_date",
        )
        .bind(calendar_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(days.into_iter().collect())
    }
}

#[async_trait]
impl CalendarStore for MySqlCalendarStore {
    async fn find(
        &self,
        member_id: MemberId,
        year: i32,
        month: u32,
    ) -> Result<Option<WorkCalendar>, AppError> {
        let row: Option<CalendarRow> = sqlx::query_as(
            "SELECT id, member_id, calendar_name, year, month, work_group, work_times
             FROM work_calendars
             WHERE member_id = ? AND year = ? AND month = ?",
        )
        .bind(member_id)
        .bind(year)
        .bind(month as i32)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let work_times: BTreeMap<String, WorkTime> =
            serde_json::from_str(&row.work_times).map_err(decode_error)?;
        let shifts = self.load_shifts(row.id).await?;

        Ok(Some(WorkCalendar {
            id: row.id,
            member_id: row.member_id,
            calendar_name: row.calendar_name,
            year: row.year,
            month: row.month as u32,
            work_group: row.work_group,
            work_times,
            shifts,
        }))
    }

    async fn create(
        &self,
        member_id: MemberId,
        calendar: NewWorkCalendar,
    ) -> Result<WorkCalendar, AppError> {
        let work_times_json = serde_json::to_string(&calendar.work_times).map_err(encode_error)?;

        // 트랜잭션으로 근무표와 근무일을 함께 저장
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO work_calendars (member_id, calendar_name, year, month, work_group, work_times)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(member_id)
        .bind(&calendar.calendar_name)
        .bind(calendar.year)
        .bind(calendar.month as i32)
        .bind(&calendar.work_group)
        .bind(work_times_json)
        .execute(&mut *tx)
        .await;

        let calendar_id = match result {
            Ok(done) => done.last_insert_id() as i64,
            Err(e) if is_duplicate_entry(&e) => {
                warn!(
                    "근무표 중복: member_id={}, {}-{}",
                    member_id, calendar.year, calendar.month
                );
                return Err(AppError::Business(ErrorCode::CalendarDuplication));
            }
            Err(e) => return Err(e.into()),
        };

        for (date, work_type) in &calendar.shifts {
            sqlx::query(
                "INSERT INTO work_days (calendar_id, work_date, work_type) VALUES (?, ?, ?)",
            )
            .bind(calendar_id)
            .bind(date)
            .bind(work_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("근무표 생성: id={}, member_id={}", calendar_id, member_id);

        Ok(WorkCalendar::from_new(calendar_id, member_id, calendar))
    }

    async fn upsert_shifts(
        &self,
        calendar_id: i64,
        shifts: &BTreeMap<NaiveDate, String>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (date, work_type) in shifts {
            sqlx::query(
                "INSERT INTO work_days (calendar_id, work_date, work_type) VALUES (?, ?, ?)
                 ON DUPLICATE KEY UPDATE work_type = VALUES(work_type)",
            )
            .bind(calendar_id)
            .bind(date)
            .bind(work_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, member_id: MemberId, year: i32, month: u32) -> Result<bool, AppError> {
        // work_days는 ON DELETE CASCADE
        let result = sqlx::query(
            "DELETE FROM work_calendars WHERE member_id = ? AND year = ? AND month = ?",
        )
        .bind(member_id)
        .bind(year)
        .bind(month as i32)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Default)]
struct CalendarTable {
    next_id: i64,
    rows: HashMap<i64, WorkCalendar>,
}

/// 메모리 근무표 저장소
#[derive(Default)]
pub struct InMemoryCalendarStore {
    table: RwLock<CalendarTable>,
}

impl InMemoryCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalendarStore for InMemoryCalendarStore {
    async fn find(
        &self,
        member_id: MemberId,
        year: i32,
        month: u32,
    ) -> Result<Option<WorkCalendar>, AppError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|c| c.member_id == member_id && c.year == year && c.month == month)
            .cloned())
    }

    async fn create(
        &self,
        member_id: MemberId,
        calendar: NewWorkCalendar,
    ) -> Result<WorkCalendar, AppError> {
        let mut table = self.table.write().await;
        let exists = table.rows.values().any(|c| {
            c.member_id == member_id && c.year == calendar.year && c.month == calendar.month
        });
        if exists {
            return Err(AppError::Business(ErrorCode::CalendarDuplication));
        }

        table.next_id += 1;
        let created = WorkCalendar::from_new(table.next_id, member_id, calendar);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn upsert_shifts(
        &self,
        calendar_id: i64,
        shifts: &BTreeMap<NaiveDate, String>,
    ) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        let calendar = table
            .rows
            .get_mut(&calendar_id)
            .ok_or(AppError::Business(ErrorCode::CalendarNotFound))?;
        for (date, work_type) in shifts {
            calendar.shifts.insert(*date, work_type.clone());
        }
        Ok(())
    }

    async fn delete(&self, member_id: MemberId, year: i32, month: u32) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table
            .rows
            .retain(|_, c| !(c.member_id == member_id && c.year == year && c.month == month));
        Ok(table.rows.len() < before)
    }
}

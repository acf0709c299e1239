//! MariaDB Database Configuration
//!
//! 근무표 서비스의 MariaDB 연결 설정입니다.
//! 환경 변수에서 연결 정보를 읽어와 연결 풀을 관리합니다.

use sqlx::mysql::MySqlConnectOptions;
use sqlx::{MySql, MySqlPool, Pool};
use tracing::{error, info};

use super::{parse_var, var_or};
use crate::tool::error::AppError;

/// MariaDB 연결 풀 타입 별칭
pub type DbConnection = Pool<MySql>;

/// 데이터베이스 접속 정보
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DbSettings {
    /// 환경 변수에서 접속 정보를 읽습니다. 없는 값은 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: var_or("db_host", "localhost"),
            port: parse_var("db_port", "3306")?,
            user: var_or("db_id", "root"),
            password: var_or("db_password", ""),
            database: var_or("db_name", "shifterz"),
        })
    }

    /// 접속 옵션. 계정/비밀번호는 URL을 거치지 않으므로 특수문자를 그대로 씁니다.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

// 비밀번호는 로그에 남기지 않음
impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS members (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        kakao_id BIGINT NOT NULL UNIQUE,
        kakao_nickname VARCHAR(255) NULL,
        kakao_email VARCHAR(255) NULL,
        kakao_profile_image_url VARCHAR(1024) NULL
    )",
    "CREATE TABLE IF NOT EXISTS work_calendars (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        member_id BIGINT NOT NULL,
        calendar_name VARCHAR(255) NOT NULL,
        year INT NOT NULL,
        month INT NOT NULL,
        work_group VARCHAR(255) NOT NULL,
        work_times TEXT NOT NULL,
        UNIQUE KEY uk_member_year_month (member_id, year, month),
        CONSTRAINT fk_calendar_member FOREIGN KEY (member_id)
            REFERENCES members (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS work_days (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        calendar_id BIGINT NOT NULL,
        work_date DATE NOT NULL,
        work_type VARCHAR(64) NOT NULL,
        UNIQUE KEY uk_calendar_date (calendar_id, work_date),
        CONSTRAINT fk_day_calendar FOREIGN KEY (calendar_id)
            REFERENCES work_calendars (id) ON DELETE CASCADE
    )",
];

/// MariaDB 데이터베이스 설정 구조체
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub pool: DbConnection,
    pub settings: DbSettings,
}

impl DbConfig {
    /// 환경 변수의 접속 정보로 연결 풀을 생성합니다.
    pub async fn new() -> Result<Self, AppError> {
        Self::connect(DbSettings::from_env()?).await
    }

    pub async fn connect(settings: DbSettings) -> Result<Self, AppError> {
        info!("데이터베이스 연결 시도: {:?}", settings);

        let pool = MySqlPool::connect_with(settings.connect_options()).await?;

        info!("MariaDB 연결 풀 생성 완료: {}:{}", settings.host, settings.port);

        Ok(Self { pool, settings })
    }

    pub fn get_pool(&self) -> &DbConnection {
        &self.pool
    }

    /// 데이터베이스 연결 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                info!("데이터베이스 연결 상태 양호");
                Ok(true)
            }
            Err(e) => {
                error!("데이터베이스 연결 실패: {}", e);
                Err(e.into())
            }
        }
    }

    /// 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("스키마 확인 완료 ({}개 테이블)", SCHEMA.len());
        Ok(())
    }

    /// 애플리케이션 종료 시 호출하여 리소스를 정리합니다.
    pub async fn close(&self) {
        info!("데이터베이스 연결 풀을 닫는 중...");
        self.pool.close().await;
        info!("데이터베이스 연결 풀 종료 완료");
    }
}

//! 회원 저장소
//!
//! MariaDB 구현과 테스트/로컬 실행용 메모리 구현을 제공합니다.

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::model::{Member, MemberId, ProviderProfile};
use crate::tool::error::{AppError, ErrorCode};

/// 회원 저장소 인터페이스
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, AppError>;

    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<Member>, AppError>;

    /// 프로필로 새 회원 생성
    async fn create(&self, profile: &ProviderProfile) -> Result<Member, AppError>;

    /// 기존 회원의 프로필 필드 갱신
    async fn sync_profile(
        &self,
        id: MemberId,
        profile: &ProviderProfile,
    ) -> Result<Member, AppError>;
}

#[derive(FromRow)]
struct MemberRow {
    id: i64,
    kakao_id: i64,
    kakao_nickname: Option<String>,
    kakao_email: Option<String>,
    kakao_profile_image_url: Option<String>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: row.id,
            kakao_id: row.kakao_id,
            nickname: row.kakao_nickname,
            email: row.kakao_email,
            profile_image_url: row.kakao_profile_image_url,
        }
    }
}

/// MariaDB 회원 저장소
#[derive(Clone)]
pub struct MySqlMemberStore {
    pool: MySqlPool,
}

impl MySqlMemberStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for MySqlMemberStore {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, AppError> {
        let row: Option<MemberRow> = sqlx::query_as(
            "SELECT id, kakao_id, kakao_nickname, kakao_email, kakao_profile_image_url
             FROM members
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<Member>, AppError> {
        let row: Option<MemberRow> = sqlx::query_as(
            "SELECT id, kakao_id, kakao_nickname, kakao_email, kakao_profile_image_url
             FROM members
             WHERE kakao_id = ?",
        )
        .bind(kakao_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn create(&self, profile: &ProviderProfile) -> Result<Member, AppError> {
        let result = sqlx::query(
            "INSERT INTO members (kakao_id, kakao_nickname, kakao_email, kakao_profile_image_url)
             VALUES (?, ?, ?, ?)",
        )
        .bind(profile.provider_id)
        .bind(&profile.nickname)
        .bind(&profile.email)
        .bind(&profile.profile_image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("회원 저장 실패 (kakao_id={}): {}", profile.provider_id, e);
            AppError::Business(ErrorCode::MemberSaveFailed)
        })?;

        let id = result.last_insert_id() as MemberId;
        info!("신규 회원 생성: id={}", id);

        Ok(Member::from_profile(id, profile))
    }

    async fn sync_profile(
        &self,
        id: MemberId,
        profile: &ProviderProfile,
    ) -> Result<Member, AppError> {
        let result = sqlx::query(
            "UPDATE members
             SET kakao_nickname = ?, kakao_email = ?, kakao_profile_image_url = ?
             WHERE id = ?",
        )
        .bind(&profile.nickname)
        .bind(&profile.email)
        .bind(&profile.profile_image_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        // 값이 같으면 MySQL은 영향받은 행을 0으로 보고하므로 다시 읽어서 확인
        if result.rows_affected() == 0 {
            return self
                .find_by_id(id)
                .await?
                .ok_or(AppError::Business(ErrorCode::MemberNotFound));
        }

        Ok(Member::from_profile(id, profile))
    }
}

#[derive(Default)]
struct MemberTable {
    next_id: MemberId,
    rows: HashMap<MemberId, Member>,
}

/// 메모리 회원 저장소
#[derive(Default)]
pub struct InMemoryMemberStore {
    table: RwLock<MemberTable>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 회원 수
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 저장된 회원을 지웁니다. 탈퇴한 회원의 토큰을 흉내낼 때 씁니다.
    pub async fn remove(&self, id: MemberId) -> Option<Member> {
        self.table.write().await.rows.remove(&id)
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<Member>, AppError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|m| m.kakao_id == kakao_id)
            .cloned())
    }

    async fn create(&self, profile: &ProviderProfile) -> Result<Member, AppError> {
        let mut table = self.table.write().await;
        if table
            .rows
            .values()
            .any(|m| m.kakao_id == profile.provider_id)
        {
            return Err(AppError::Business(ErrorCode::MemberSaveFailed));
        }

        table.next_id += 1;
        let member = Member::from_profile(table.next_id, profile);
        table.rows.insert(member.id, member.clone());
        Ok(member)
    }

    async fn sync_profile(
        &self,
        id: MemberId,
        profile: &ProviderProfile,
    ) -> Result<Member, AppError> {
        let mut table = self.table.write().await;
        let member = table
            .rows
            .get_mut(&id)
            .ok_or(AppError::Business(ErrorCode::MemberNotFound))?;
        member.apply_profile(profile);
        Ok(member.clone())
    }
}

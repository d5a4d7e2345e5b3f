use crate::debts::ActiveSessionSource;
use crate::error::{AppResult, RepositoryResult};
use crate::models::{Member, Session};
use crate::services::SessionStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for sessions and their members
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new active session
    pub async fn create(
        &self,
        title: &str,
        creator_id: i64,
        chat_id: i64,
    ) -> RepositoryResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, title, creator_id, chat_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, creator_id, chat_id, created_at, finished_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(creator_id)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    pub async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, title, creator_id, chat_id, created_at, finished_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// The unfinished session of a chat, if any
    pub async fn find_active_by_chat(&self, chat_id: i64) -> RepositoryResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, title, creator_id, chat_id, created_at, finished_at
            FROM sessions
            WHERE chat_id = $1 AND finished_at IS NULL
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Mark a session finished. Returns false if it was not active.
    pub async fn finish(&self, id: Uuid) -> RepositoryResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE sessions
            SET finished_at = NOW()
            WHERE id = $1 AND finished_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Add a member; adding an existing member is a no-op
    pub async fn add_member(&self, session_id: Uuid, user_id: i64) -> RepositoryResult<Member> {
        sqlx::query(
            r#"
            INSERT INTO members (session_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (session_id, user_id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(Member::new(session_id, user_id))
    }

    pub async fn is_member(&self, session_id: Uuid, user_id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            SELECT 1
            FROM members
            WHERE session_id = $1 AND user_id = $2
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }

    pub async fn find_members(&self, session_id: Uuid) -> RepositoryResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT session_id, user_id
            FROM members
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

#[async_trait]
impl ActiveSessionSource for SessionRepository {
    async fn active_session(&self, chat_id: i64) -> AppResult<Option<Session>> {
        Ok(self.find_active_by_chat(chat_id).await?)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn active_in_chat(&self, chat_id: i64) -> AppResult<Option<Session>> {
        Ok(self.find_active_by_chat(chat_id).await?)
    }

    async fn create_session(
        &self,
        title: &str,
        creator_id: i64,
        chat_id: i64,
    ) -> AppResult<Session> {
        Ok(self.create(title, creator_id, chat_id).await?)
    }

    async fn finish_session(&self, session_id: Uuid) -> AppResult<bool> {
        Ok(self.finish(session_id).await?)
    }

    async fn add_member(&self, session_id: Uuid, user_id: i64) -> AppResult<Member> {
        Ok(SessionRepository::add_member(self, session_id, user_id).await?)
    }
}

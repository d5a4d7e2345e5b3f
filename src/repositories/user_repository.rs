use crate::error::{AppResult, RepositoryResult};
use crate::models::User;
use crate::services::UserStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user data access
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user, or refresh the username of an existing one
    pub async fn upsert(&self, id: i64, username: &str) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username
            RETURNING id, username, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username, ignoring case
    pub async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE lower(username) = lower($1)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// All members of a session
    pub async fn find_by_session(&self, session_id: Uuid) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.created_at
            FROM users u
                JOIN members m ON m.user_id = u.id
            WHERE m.session_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert_user(&self, id: i64, username: &str) -> AppResult<User> {
        Ok(self.upsert(id, username).await?)
    }

    async fn user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find_by_username(username).await?)
    }

    async fn session_users(&self, session_id: Uuid) -> AppResult<Vec<User>> {
        Ok(self.find_by_session(session_id).await?)
    }
}

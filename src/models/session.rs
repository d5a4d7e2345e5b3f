use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Session state, derived from `finished_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Finished,
}

/// A settlement period opened in one chat. A chat has at most one active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub title: String,
    pub creator_id: i64,
    pub chat_id: i64,
    pub created_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

impl Session {
    pub fn new(title: String, creator_id: i64, chat_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            creator_id,
            chat_id,
            created_at: chrono::Utc::now().naive_utc(),
            finished_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.finished_at.is_some() {
            SessionState::Finished
        } else {
            SessionState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }
}

/// Membership of a user in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub session_id: Uuid,
    pub user_id: i64,
}

impl Member {
    pub fn new(session_id: Uuid, user_id: i64) -> Self {
        Self {
            session_id,
            user_id,
        }
    }
}

use crate::error::{AppError, AppResult};
use crate::models::{Member, Session, User};
use crate::services::{SessionStore, UserStore};
use std::sync::Arc;
use tracing::info;

/// Service for opening and closing expense sessions
pub struct SessionService {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    /// Start a new session in a chat. Fails if the chat already has an active one.
    pub async fn start_session(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
        title: &str,
    ) -> AppResult<Session> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Session title must not be empty".into()));
        }

        if let Some(active) = self.sessions.active_in_chat(chat_id).await? {
            return Err(AppError::BusinessLogic(format!(
                "Session '{}' is still active in this chat",
                active.title
            )));
        }

        let creator = self.users.upsert_user(user_id, username).await?;
        let session = self.sessions.create_session(title, creator.id, chat_id).await?;
        self.sessions.add_member(session.id, creator.id).await?;

        info!(
            "Started session '{}' ({}) in chat {} by @{}",
            session.title, session.id, chat_id, creator.username
        );
        Ok(session)
    }

    /// Finish the active session of a chat
    pub async fn finish_session(&self, chat_id: i64) -> AppResult<Session> {
        let session = self.require_active(chat_id).await?;

        if !self.sessions.finish_session(session.id).await? {
            return Err(AppError::NotFound(format!(
                "Session {} is already finished",
                session.id
            )));
        }

        info!("Finished session '{}' ({}) in chat {}", session.title, session.id, chat_id);
        Ok(session)
    }

    pub async fn active_session(&self, chat_id: i64) -> AppResult<Option<Session>> {
        self.sessions.active_in_chat(chat_id).await
    }

    /// Active session of a chat, or `NotFound`
    pub async fn require_active(&self, chat_id: i64) -> AppResult<Session> {
        self.active_session(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No active session in chat {}", chat_id)))
    }

    /// Register a user and make them a member of the session
    pub async fn init_member(
        &self,
        session: &Session,
        user_id: i64,
        username: &str,
    ) -> AppResult<(User, Member)> {
        let user = self.users.upsert_user(user_id, username).await?;
        let member = self.sessions.add_member(session.id, user.id).await?;
        Ok((user, member))
    }

    pub async fn members(&self, session: &Session) -> AppResult<Vec<User>> {
        self.users.session_users(session.id).await
    }
}

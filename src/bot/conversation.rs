use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the bot expects as the user's next plain message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SessionTitle,
    Purchases,
    Expenses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    pub chat_id: i64,
    pub stage: Stage,
}

/// Pending two-step commands keyed by user id
#[derive(Clone, Default)]
pub struct ConversationState {
    contexts: Arc<RwLock<HashMap<i64, ConversationContext>>>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the user's next message in `chat_id`, replacing any earlier stage
    pub async fn begin(&self, user_id: i64, chat_id: i64, stage: Stage) {
        let mut contexts = self.contexts.write().await;
        contexts.insert(user_id, ConversationContext { chat_id, stage });
    }

    /// Remove and return the pending stage if it was started in `chat_id`
    pub async fn take(&self, user_id: i64, chat_id: i64) -> Option<Stage> {
        let mut contexts = self.contexts.write().await;
        match contexts.get(&user_id) {
            Some(context) if context.chat_id == chat_id => {
                contexts.remove(&user_id).map(|context| context.stage)
            }
            _ => None,
        }
    }

    pub async fn peek(&self, user_id: i64) -> Option<ConversationContext> {
        self.contexts.read().await.get(&user_id).cloned()
    }

    pub async fn clear(&self, user_id: i64) {
        self.contexts.write().await.remove(&user_id);
    }

    pub async fn pending_count(&self) -> usize {
        self.contexts.read().await.len()
    }
}

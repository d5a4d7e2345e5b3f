use crate::bot::handler::{BotHandler, IncomingMessage};
use crate::bot::telegram::{ParseMode, TelegramClient, Update};
use crate::error::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, warn};

/// Long-polls Telegram and feeds messages to the handler
pub struct BotPoller {
    client: Arc<TelegramClient>,
    handler: Arc<BotHandler>,
    poll_timeout: Duration,
    offset: i64,
}

impl BotPoller {
    pub fn new(client: Arc<TelegramClient>, handler: Arc<BotHandler>) -> Self {
        Self {
            client,
            handler,
            poll_timeout: Duration::from_secs(10),
            offset: 0,
        }
    }

    /// Set the long-poll timeout, also used as the backoff after errors
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Run until the task is dropped
    pub async fn start(mut self) {
        info!("Bot poller started, long-polling for {:?}", self.poll_timeout);

        loop {
            if let Err(e) = self.poll_once().await {
                error!("Error in bot poller: {}", e);
                time::sleep(self.poll_timeout).await;
            }
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    async fn poll_once(&mut self) -> AppResult<()> {
        let updates = self
            .client
            .get_updates(self.offset, self.poll_timeout.as_secs())
            .await?;

        if !updates.is_empty() {
            debug!("Received {} update(s)", updates.len());
            self.dispatch(updates).await;
        }

        Ok(())
    }

    /// Answer each update in order. The offset moves past an update only once
    /// it has been handled, so an interrupted batch is fetched again.
    pub async fn dispatch(&mut self, updates: Vec<Update>) {
        for update in updates {
            self.answer(&update).await;
            self.offset = self.offset.max(update.update_id + 1);
        }
    }

    async fn answer(&self, update: &Update) {
        let Some(message) = update.message.as_ref().and_then(IncomingMessage::from_message) else {
            return;
        };

        let Some(reply) = self.handler.handle(&message).await else {
            return;
        };

        if let Err(e) = self
            .client
            .send_message(message.chat_id, &reply, Some(ParseMode::Html))
            .await
        {
            warn!("Failed to reply in chat {}: {}", message.chat_id, e);
        }
    }
}

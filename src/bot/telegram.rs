//! Minimal Telegram Bot API client: long polling and sending messages.

use crate::config::BotConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
}

impl TelegramUser {
    /// Name the user is stored and mentioned under.
    ///
    /// Users without a username get their first name tagged with their id.
    /// `#` never appears in Telegram usernames, so the result cannot collide
    /// with another user's name.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => username.clone(),
            None => {
                let first_name: Vec<&str> = self.first_name.split_whitespace().collect();
                format!("{}#{}", first_name.join("_"), self.id)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

/// Envelope every Bot API response is wrapped in
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

pub struct TelegramClient {
    client: Client,
    config: BotConfig,
}

impl TelegramClient {
    pub fn new(config: BotConfig) -> AppResult<Self> {
        // Long polls must not be cut off by the HTTP timeout
        let client = Client::builder()
            .timeout(config.poll_timeout() + Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch updates newer than `offset`, waiting up to `timeout_secs`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> AppResult<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> AppResult<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        self.call("sendMessage", &request).await
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Calling Telegram method {}", method);

        let response = self
            .client
            .post(self.config.method_url(method))
            .json(body)
            .send()
            .await?;

        let payload: ApiResponse<T> = response.json().await?;
        unwrap_response(method, payload)
    }
}

fn unwrap_response<T>(method: &str, payload: ApiResponse<T>) -> AppResult<T> {
    if !payload.ok {
        return Err(AppError::ExternalService(format!(
            "Telegram {} failed: {}",
            method,
            payload.description.as_deref().unwrap_or("no description")
        )));
    }

    payload.result.ok_or_else(|| {
        AppError::ExternalService(format!("Telegram {} returned no result", method))
    })
}

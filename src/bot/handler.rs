use crate::bot::conversation::{ConversationState, Stage};
use crate::bot::parser::{ExpenseParser, PurchaseParser};
use crate::bot::presenter;
use crate::bot::telegram::Message;
use crate::error::{AppError, AppResult};
use crate::services::{DebtService, PurchaseService, SessionService};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    StartSession,
    FinishSession,
    AddPurchases,
    GetPurchases,
    AddExpenses,
    GetDebts,
}

impl Command {
    /// Parse the first word of a message, dropping any `@bot_name` suffix.
    /// Returns `None` for plain text and unknown commands.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word);

        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "start_session" => Some(Command::StartSession),
            "finish_session" => Some(Command::FinishSession),
            "add_purchases" => Some(Command::AddPurchases),
            "get_purchases" => Some(Command::GetPurchases),
            "add_expenses" => Some(Command::AddExpenses),
            "get_debts" => Some(Command::GetDebts),
            _ => None,
        }
    }

    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Start | Command::Help | Command::StartSession
        )
    }
}

/// A chat message reduced to what the handler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
}

impl IncomingMessage {
    /// Messages without text or sender are ignored
    pub fn from_message(message: &Message) -> Option<Self> {
        let from = message.from.as_ref()?;
        let text = message.text.as_ref()?;

        Some(Self {
            chat_id: message.chat.id,
            user_id: from.id,
            username: from.display_name(),
            text: text.clone(),
        })
    }

    fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}

/// Routes chat messages to the services and renders the replies
pub struct BotHandler {
    sessions: Arc<SessionService>,
    purchases: Arc<PurchaseService>,
    debts: Arc<DebtService>,
    conversation: ConversationState,
}

impl BotHandler {
    pub fn new(
        sessions: Arc<SessionService>,
        purchases: Arc<PurchaseService>,
        debts: Arc<DebtService>,
    ) -> Self {
        Self {
            sessions,
            purchases,
            debts,
            conversation: ConversationState::new(),
        }
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// Reply to one message, if it calls for a reply
    pub async fn handle(&self, message: &IncomingMessage) -> Option<String> {
        if message.is_command() {
            // Any command abandons a pending two-step command
            self.conversation.clear(message.user_id).await;

            // Commands meant for other bots in the chat
            let command = Command::parse(&message.text)?;
            debug!("Chat {}: {:?} from @{}", message.chat_id, command, message.username);

            return Some(match self.run_command(command, message).await {
                Ok(reply) => reply,
                Err(err) => self.error_reply(message, None, err).await,
            });
        }

        let stage = self
            .conversation
            .take(message.user_id, message.chat_id)
            .await?;

        Some(match self.complete_stage(stage, message).await {
            Ok(reply) => reply,
            Err(err) => self.error_reply(message, Some(stage), err).await,
        })
    }

    async fn run_command(&self, command: Command, message: &IncomingMessage) -> AppResult<String> {
        let active = self.sessions.active_session(message.chat_id).await?;
        if command.needs_session() && active.is_none() {
            return Ok(presenter::NO_ACTIVE_SESSION.to_string());
        }

        let reply = match command {
            Command::Start | Command::Help => presenter::HELP.to_string(),
            Command::StartSession => {
                if active.is_some() {
                    return Ok(presenter::SESSION_ALREADY_ACTIVE.to_string());
                }
                self.await_input(message, Stage::SessionTitle).await;
                presenter::ask_session_title()
            }
            Command::FinishSession => {
                let session = self.sessions.finish_session(message.chat_id).await?;
                presenter::session_finished(&session)
            }
            Command::AddPurchases => {
                self.await_input(message, Stage::Purchases).await;
                presenter::ask_purchases()
            }
            Command::GetPurchases => {
                let purchases = self.purchases.list_purchases(message.chat_id).await?;
                presenter::render_purchases(&purchases)
            }
            Command::AddExpenses => {
                self.await_input(message, Stage::Expenses).await;
                presenter::ask_expenses()
            }
            Command::GetDebts => {
                let ledger = self.debts.get_all_debts(message.chat_id).await?;
                presenter::render_debts(&ledger)
            }
        };

        Ok(reply)
    }

    async fn complete_stage(&self, stage: Stage, message: &IncomingMessage) -> AppResult<String> {
        match stage {
            Stage::SessionTitle => {
                let session = self
                    .sessions
                    .start_session(
                        message.chat_id,
                        message.user_id,
                        &message.username,
                        &message.text,
                    )
                    .await?;
                Ok(presenter::session_started(&session))
            }
            Stage::Purchases => {
                let purchases = PurchaseParser::parse(&message.text)?;
                let created = self
                    .purchases
                    .add_purchases(
                        message.chat_id,
                        message.user_id,
                        &message.username,
                        &purchases,
                    )
                    .await?;
                Ok(presenter::purchases_added(created.len()))
            }
            Stage::Expenses => {
                let expenses = ExpenseParser::parse(&message.text)?;
                let inserted = self
                    .purchases
                    .add_expenses(
                        message.chat_id,
                        message.user_id,
                        &message.username,
                        &expenses,
                    )
                    .await?;
                Ok(presenter::expenses_added(inserted))
            }
        }
    }

    async fn await_input(&self, message: &IncomingMessage, stage: Stage) {
        self.conversation
            .begin(message.user_id, message.chat_id, stage)
            .await;
    }

    async fn error_reply(&self, message: &IncomingMessage, stage: Option<Stage>, err: AppError) -> String {
        if err.is_connection_error() {
            error!("Chat {}: database unavailable: {}", message.chat_id, err);
        } else {
            warn!(
                "Chat {}: request from @{} failed: {}",
                message.chat_id, message.username, err
            );
        }

        let reply = error_text(&err, stage);

        // Malformed input keeps the user in the same step so they can resend it
        if let (Some(stage), AppError::Parse(_) | AppError::Validation(_)) = (stage, &err) {
            self.await_input(message, stage).await;
        }

        reply
    }
}

/// User-facing text for a failed request
pub fn error_text(err: &AppError, stage: Option<Stage>) -> String {
    let detail = match err {
        AppError::Parse(e) => e.to_string(),
        AppError::Validation(msg) | AppError::NotFound(msg) | AppError::BusinessLogic(msg) => {
            msg.clone()
        }
        _ => return presenter::TECHNICAL_PROBLEM.to_string(),
    };
    let detail = presenter::escape_html(&detail);

    match (err, stage) {
        (AppError::Parse(_) | AppError::Validation(_), Some(Stage::Purchases)) => {
            format!("{}\n\n{}", detail, presenter::ask_purchases())
        }
        (AppError::Parse(_) | AppError::Validation(_), Some(Stage::Expenses)) => {
            format!("{}\n\n{}", detail, presenter::ask_expenses())
        }
        _ => detail,
    }
}

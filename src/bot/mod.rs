pub mod conversation;
pub mod handler;
pub mod parser;
pub mod poller;
pub mod presenter;
pub mod telegram;

pub use conversation::{ConversationContext, ConversationState, Stage};
pub use handler::{BotHandler, Command, IncomingMessage};
pub use parser::{ExpenseParser, ParseError, ParseResult, PurchaseParser};
pub use poller::BotPoller;
pub use telegram::{ParseMode, TelegramClient, Update};

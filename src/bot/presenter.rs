//! Rendering of bot replies. All output is Telegram HTML.

use crate::bot::parser::{EXPENSE_FORMAT, PURCHASE_FORMAT};
use crate::debts::{Direction, Ledger};
use crate::models::{Purchase, Session};

pub const NO_DEBTS: &str = "No debts";
pub const NO_PURCHASES: &str = "No purchases yet";
pub const NO_ACTIVE_SESSION: &str =
    "There is no active session in this chat. Start one with /start_session";
pub const SESSION_ALREADY_ACTIVE: &str =
    "A session is already running in this chat. Finish it with /finish_session first";
pub const TECHNICAL_PROBLEM: &str = "Something went wrong on our side, please try again later";

pub const HELP: &str = "<b>Collector</b> splits shared purchases between friends.\n\n\
/start_session - start a new session in this chat\n\
/add_purchases - add what you paid for\n\
/get_purchases - list purchases of the session\n\
/add_expenses - mark who consumed which purchase\n\
/get_debts - show who owes whom\n\
/finish_session - close the session\n\
/help - show this message";

/// Escape the characters Telegram HTML treats specially
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// One block per debtor: the debt line, then the entries behind it
pub fn render_debts(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return NO_DEBTS.to_string();
    }

    let mut blocks = Vec::new();
    for debtor in ledger.debtors() {
        let Some(creditors) = ledger.creditors_of(debtor) else {
            continue;
        };

        let mut lines = Vec::new();
        for (creditor, edge) in creditors {
            lines.push(format!(
                "@{} ➡️ @{} – {}",
                escape_html(debtor),
                escape_html(creditor),
                edge.total_amount
            ));
            for entry in &edge.history {
                let sign = match entry.direction {
                    Direction::Outgoing => '−',
                    Direction::Incoming => '+',
                };
                lines.push(format!(
                    "<i>{}{} – {}</i>",
                    sign,
                    entry.amount,
                    escape_html(&entry.item_title)
                ));
            }
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

pub fn render_purchases(purchases: &[Purchase]) -> String {
    if purchases.is_empty() {
        return NO_PURCHASES.to_string();
    }

    purchases
        .iter()
        .map(|purchase| {
            let mut line = format!(
                "{}. {} – {}",
                purchase.id,
                escape_html(&purchase.title),
                purchase.price
            );
            if purchase.quantity > 1 {
                line.push_str(&format!(" × {}", purchase.quantity));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session_started(session: &Session) -> String {
    format!(
        "Session <b>{}</b> started. Add purchases with /add_purchases",
        escape_html(&session.title)
    )
}

pub fn session_finished(session: &Session) -> String {
    format!("Session <b>{}</b> finished", escape_html(&session.title))
}

pub fn purchases_added(count: usize) -> String {
    format!("Added {} purchase(s)", count)
}

pub fn expenses_added(count: u64) -> String {
    format!("Added {} expense(s)", count)
}

pub fn ask_session_title() -> String {
    "Send the title of the new session".to_string()
}

pub fn ask_purchases() -> String {
    format!(
        "Send purchases, one per line:\n<code>{}</code>",
        escape_html(PURCHASE_FORMAT)
    )
}

pub fn ask_expenses() -> String {
    format!(
        "Send expenses, one per line:\n<code>{}</code>",
        escape_html(EXPENSE_FORMAT)
    )
}

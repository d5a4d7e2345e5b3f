//! Parsers for the multi-line purchase and expense messages.

use crate::models::{EaterRef, NewExpense, NewPurchase};
use thiserror::Error;

pub const PURCHASE_FORMAT: &str = "<Title>, <Price>[, <Quantity>]";
pub const EXPENSE_FORMAT: &str = "<Purchase number> [@user1 @user2 ... | @me | @all]";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}")]
    MissingField { line: usize, expected: &'static str },

    #[error("line {line}: {field} must be a whole number, got {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {value:?} is not a mention, use @username")]
    InvalidMention { line: usize, value: String },

    #[error("line {line}: @me can only be used once")]
    DuplicateMe { line: usize },

    #[error("line {line}: @all can't be combined with other users")]
    AllWithOthers { line: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Numbered non-blank lines of a message, 1-based
fn lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Parses `<title>, <price>[, <quantity>]`, one purchase per line
pub struct PurchaseParser;

impl PurchaseParser {
    pub fn parse(input: &str) -> ParseResult<Vec<NewPurchase>> {
        lines(input)
            .map(|(number, line)| Self::parse_line(number, line))
            .collect()
    }

    fn parse_line(number: usize, line: &str) -> ParseResult<NewPurchase> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 || fields[0].is_empty() {
            return Err(ParseError::MissingField {
                line: number,
                expected: PURCHASE_FORMAT,
            });
        }

        let price = fields[1]
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidNumber {
                line: number,
                field: "price",
                value: fields[1].to_string(),
            })?;

        let quantity = match fields.get(2) {
            Some(raw) => raw.parse::<i32>().map_err(|_| ParseError::InvalidNumber {
                line: number,
                field: "quantity",
                value: raw.to_string(),
            })?,
            None => 1,
        };

        Ok(NewPurchase::new(fields[0], price, quantity))
    }
}

/// Parses `<purchase number> [@user ...]`, one expense per line.
///
/// A bare purchase number means the author consumed it.
pub struct ExpenseParser;

impl ExpenseParser {
    pub fn parse(input: &str) -> ParseResult<Vec<NewExpense>> {
        lines(input)
            .map(|(number, line)| Self::parse_line(number, line))
            .collect()
    }

    fn parse_line(number: usize, line: &str) -> ParseResult<NewExpense> {
        let mut tokens = line.split_whitespace();
        let raw_id = tokens.next().ok_or(ParseError::MissingField {
            line: number,
            expected: EXPENSE_FORMAT,
        })?;

        let purchase_id = raw_id
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidNumber {
                line: number,
                field: "purchase number",
                value: raw_id.to_string(),
            })?;

        let mut eaters = Vec::new();
        for token in tokens {
            let eater = match token {
                "@me" => EaterRef::Me,
                "@all" => EaterRef::All,
                _ => match token.strip_prefix('@') {
                    Some(name) if !name.is_empty() => EaterRef::Username(name.to_string()),
                    _ => {
                        return Err(ParseError::InvalidMention {
                            line: number,
                            value: token.to_string(),
                        })
                    }
                },
            };
            eaters.push(eater);
        }

        if eaters.is_empty() {
            eaters.push(EaterRef::Me);
        }

        if eaters.len() > 1 && eaters.contains(&EaterRef::All) {
            return Err(ParseError::AllWithOthers { line: number });
        }

        if eaters.iter().filter(|eater| **eater == EaterRef::Me).count() > 1 {
            return Err(ParseError::DuplicateMe { line: number });
        }

        Ok(NewExpense {
            purchase_id,
            eaters,
        })
    }
}

//! Response definitions
//!
//! Represents replies read from the server.

use super::codes::{self, StatusClass};
use super::item::{Definition, DictItem, Match};

/// Structured form of a text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseData {
    /// HELP, SHOW SERVER and SHOW INFO text, verbatim
    Text(String),

    /// SHOW DATABASES / SHOW STRATEGIES listing
    Items(Vec<DictItem>),

    /// One DEFINE result
    Definition(Definition),

    /// MATCH results grouped by word
    Matches(Vec<Match>),
}

/// A single server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Three digit status code
    pub status: u16,

    /// Status line text after the code
    pub message: String,

    /// Text body, terminator removed and dots unescaped
    pub raw_data: Option<String>,

    /// Decoded body
    pub data: Option<ResponseData>,
}

impl Response {
    /// A reply made of a status line only
    pub fn status_only(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            raw_data: None,
            data: None,
        }
    }

    /// A reply with a text body, decoded according to its status code
    pub fn with_body(status: u16, message: impl Into<String>, raw_data: String) -> Self {
        let message = message.into();
        let data = decode_body(status, &message, &raw_data);
        Self {
            status,
            message,
            raw_data: Some(raw_data),
            data,
        }
    }

    pub fn class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }

    /// 1xx, 2xx and 3xx replies
    pub fn is_success(&self) -> bool {
        self.class().is_success()
    }

    /// 4xx and 5xx replies
    pub fn is_error(&self) -> bool {
        matches!(
            self.class(),
            StatusClass::TransientFailure | StatusClass::PermanentFailure
        )
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            Some(ResponseData::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[DictItem]> {
        match &self.data {
            Some(ResponseData::Items(items)) => Some(items),
            _ => None,
        }
    }

    pub fn definition(&self) -> Option<&Definition> {
        match &self.data {
            Some(ResponseData::Definition(definition)) => Some(definition),
            _ => None,
        }
    }

    pub fn matches(&self) -> Option<&[Match]> {
        match &self.data {
            Some(ResponseData::Matches(matches)) => Some(matches),
            _ => None,
        }
    }
}

fn decode_body(status: u16, message: &str, raw: &str) -> Option<ResponseData> {
    match status {
        codes::DATABASES_PRESENT | codes::STRATEGIES_AVAILABLE => {
            Some(ResponseData::Items(DictItem::parse_list(raw)))
        }
        codes::DEFINITION => Some(ResponseData::Definition(Definition::from_reply(message, raw))),
        codes::MATCHES_FOUND => Some(ResponseData::Matches(Match::parse_list(raw))),
        codes::DATABASE_INFO | codes::HELP_TEXT | codes::SERVER_INFO => {
            Some(ResponseData::Text(raw.to_string()))
        }
        _ => None,
    }
}

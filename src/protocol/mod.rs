//! Protocol Module
//!
//! Defines the DICT wire protocol (RFC 2229) as seen from the client.
//!
//! ## Protocol Format (text, line oriented)
//!
//! ### Request Format
//! ```text
//! COMMAND [param ...] CRLF
//! ```
//!
//! ### Commands
//! - CLIENT text
//! - SHOW SERVER / SHOW DATABASES / SHOW STRATEGIES / SHOW INFO db
//! - HELP
//! - AUTH user md5(connection-id + secret)
//! - DEFINE db "word"
//! - MATCH db strategy "word"
//! - QUIT
//!
//! ### Response Format
//! ```text
//! ┌──────────┬─────┬──────────────────────────────┐
//! │ Code (3) │ SP  │ Status text                  │ CRLF
//! └──────────┴─────┴──────────────────────────────┘
//! [ text body lines ... CRLF "." CRLF ]
//! ```
//!
//! ### Text Bodies
//! - Codes 110, 111, 112, 113, 114, 151 and 152 are followed by a body
//! - A body ends with a line holding a single `.`
//! - Body lines starting with `.` are sent with the dot doubled

mod banner;
pub mod codes;
mod command;
mod item;
mod parser;
mod response;

pub use banner::Banner;
pub use codes::{carries_text, is_preliminary, StatusClass};
pub use command::{auth_digest, Command, CommandBuilder, CommandType};
pub use item::{Definition, DictItem, Match};
pub use parser::{LineReader, LineSource, ParserState, ResponseParser};
pub use response::{Response, ResponseData};


//! # dictclient
//!
//! A blocking client for the DICT dictionary lookup protocol (RFC 2229):
//! - Banner parsing with capabilities and connection id
//! - Typed, validated commands (DEFINE, MATCH, SHOW, AUTH, ...)
//! - A line-driven response parser for status lines and text bodies
//! - A convenience client returning definitions, matches and listings
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DictClient                            │
//! │              (one method per DICT command)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command::execute
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Command                               │
//! │             (render request line, send, collect)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │ write_line              │ LineSource
//!          ▼                         ▼
//!   ┌─────────────┐          ┌────────────────┐
//!   │ Connection  │ ◀─────── │ ResponseParser │
//!   │ (TcpStream) │          │ (state machine)│
//!   └─────────────┘          └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dictclient::{Config, DictClient};
//!
//! let config = Config::builder().host("dict.org").build();
//! let mut client = DictClient::connect(config)?;
//! for definition in client.define("lattice")? {
//!     println!("{}", definition);
//! }
//! client.close()?;
//! # Ok::<(), dictclient::DictError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DictError, Result};
pub use config::{ClientInfo, Config};
pub use client::DictClient;
pub use network::Connection;
pub use protocol::{Banner, Command, CommandType, Definition, DictItem, Match, Response};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dictclient
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

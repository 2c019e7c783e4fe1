//! Network Module
//!
//! TCP transport for the client.
//!
//! ## Architecture
//! - One blocking socket per connection
//! - Strictly one command in flight; no pipelining
//! - Timeouts bound connect, read and write

mod connection;

pub use connection::{Connection, ConnectionState};

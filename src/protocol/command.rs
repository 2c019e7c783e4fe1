//! Command definitions
//!
//! Represents requests sent to a DICT server. Each variant carries exactly
//! the fields its command needs; [`CommandBuilder`] offers the same thing
//! keyed by [`CommandType`] and checks field combinations at build time.

use std::fmt;
use std::io::Write;

use md5::{Digest, Md5};

use crate::error::{DictError, Result};
use crate::network::Connection;

use super::parser::ResponseParser;
use super::response::Response;

/// Database name meaning "search every database"
pub const ALL_DATABASES: &str = "*";

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Client,
    ShowServer,
    Help,
    Auth,
    ShowDatabases,
    ShowInfo,
    ShowStrategies,
    Define,
    Match,
    Quit,
    Other,
}

/// A validated command
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// Identify the client to the server
    Client { text: String },

    /// Server information written by the administrator
    ShowServer,

    /// Summary of server commands
    Help,

    /// Authenticate; the secret only ever leaves as a digest
    Auth { username: String, secret: String },

    /// List databases
    ShowDatabases,

    /// Information about one database
    ShowInfo { database: String },

    /// List match strategies
    ShowStrategies,

    /// Look up a word
    Define { database: String, word: String },

    /// Find words with a strategy
    Match {
        database: String,
        strategy: String,
        word: String,
    },

    /// Politely disconnect
    Quit,

    /// Anything else, sent as-is
    Other {
        command: String,
        param: Option<String>,
    },
}

impl Command {
    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    pub fn client(text: impl Into<String>) -> Result<Self> {
        Command::Client { text: text.into() }.checked()
    }

    pub fn show_server() -> Self {
        Command::ShowServer
    }

    pub fn help() -> Self {
        Command::Help
    }

    pub fn auth(username: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Command::Auth {
            username: username.into(),
            secret: secret.into(),
        }
        .checked()
    }

    pub fn show_databases() -> Self {
        Command::ShowDatabases
    }

    pub fn show_info(database: impl Into<String>) -> Result<Self> {
        Command::ShowInfo {
            database: database.into(),
        }
        .checked()
    }

    pub fn show_strategies() -> Self {
        Command::ShowStrategies
    }

    /// DEFINE in every database
    pub fn define(word: impl Into<String>) -> Result<Self> {
        Self::define_in(ALL_DATABASES, word)
    }

    pub fn define_in(database: impl Into<String>, word: impl Into<String>) -> Result<Self> {
        Command::Define {
            database: database.into(),
            word: word.into(),
        }
        .checked()
    }

    /// MATCH in every database
    pub fn match_word(strategy: impl Into<String>, word: impl Into<String>) -> Result<Self> {
        Self::match_in(ALL_DATABASES, strategy, word)
    }

    pub fn match_in(
        database: impl Into<String>,
        strategy: impl Into<String>,
        word: impl Into<String>,
    ) -> Result<Self> {
        Command::Match {
            database: database.into(),
            strategy: strategy.into(),
            word: word.into(),
        }
        .checked()
    }

    pub fn quit() -> Self {
        Command::Quit
    }

    pub fn other(command: impl Into<String>, param: Option<String>) -> Result<Self> {
        Command::Other {
            command: command.into(),
            param,
        }
        .checked()
    }

    /// Start a builder for a command type
    pub fn builder(command_type: CommandType) -> CommandBuilder {
        CommandBuilder::new(command_type)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Client { .. } => CommandType::Client,
            Command::ShowServer => CommandType::ShowServer,
            Command::Help => CommandType::Help,
            Command::Auth { .. } => CommandType::Auth,
            Command::ShowDatabases => CommandType::ShowDatabases,
            Command::ShowInfo { .. } => CommandType::ShowInfo,
            Command::ShowStrategies => CommandType::ShowStrategies,
            Command::Define { .. } => CommandType::Define,
            Command::Match { .. } => CommandType::Match,
            Command::Quit => CommandType::Quit,
            Command::Other { .. } => CommandType::Other,
        }
    }

    fn checked(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Check fields; variants can also be built directly, bypassing constructors
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Client { text } => check_text("CLIENT text", text),
            Command::Auth { username, secret } => {
                check_atom("AUTH username", username)?;
                if secret.is_empty() {
                    return Err(DictError::InvalidCommand(
                        "AUTH secret must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
            Command::ShowInfo { database } => check_atom("SHOW INFO database", database),
            Command::Define { database, word } => {
                check_atom("DEFINE database", database)?;
                check_text("DEFINE word", word)
            }
            Command::Match {
                database,
                strategy,
                word,
            } => {
                check_atom("MATCH database", database)?;
                check_atom("MATCH strategy", strategy)?;
                check_text("MATCH word", word)
            }
            Command::Other { command, param } => {
                check_text("command text", command)?;
                match param {
                    Some(param) => check_text("command parameter", param),
                    None => Ok(()),
                }
            }
            Command::ShowServer
            | Command::Help
            | Command::ShowDatabases
            | Command::ShowStrategies
            | Command::Quit => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Wire format
    // -------------------------------------------------------------------------

    /// Render the request line, without the line terminator
    ///
    /// `connection_id` comes from the banner and is only needed for AUTH.
    pub fn to_line(&self, connection_id: Option<&str>) -> Result<String> {
        self.validate()?;
        let line = match self {
            Command::Auth { username, secret } => {
                let id = connection_id.ok_or(DictError::MissingConnectionId)?;
                format!("AUTH {} {}", username, auth_digest(id, secret))
            }
            _ => self.to_string(),
        };
        Ok(line)
    }

    /// Write the request line, CRLF terminated, and flush
    pub fn write_to<W: Write>(&self, writer: &mut W, connection_id: Option<&str>) -> Result<()> {
        let line = self.to_line(connection_id)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\r\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Send the command and read every reply that belongs to it
    ///
    /// Non-success status codes come back as ordinary responses. A reply
    /// that cannot be read to the end closes the connection.
    pub fn execute(&self, connection: &mut Connection) -> Result<Vec<Response>> {
        let line = self.to_line(connection.id())?;
        tracing::debug!("-> {}", self);
        connection.write_line(&line)?;

        let result = ResponseParser::new(&mut *connection).collect_all();
        if let Err(e) = &result {
            tracing::warn!("Abandoning {} after a broken reply: {}", connection, e);
            connection.abandon();
        }
        result
    }
}

/// Displays the request line with the AUTH secret masked
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Client { text } => write!(f, "CLIENT {}", text),
            Command::ShowServer => f.write_str("SHOW SERVER"),
            Command::Help => f.write_str("HELP"),
            Command::Auth { username, .. } => write!(f, "AUTH {} ****", username),
            Command::ShowDatabases => f.write_str("SHOW DATABASES"),
            Command::ShowInfo { database } => write!(f, "SHOW INFO {}", database),
            Command::ShowStrategies => f.write_str("SHOW STRATEGIES"),
            Command::Define { database, word } => {
                write!(f, "DEFINE {} {}", database, quote(word))
            }
            Command::Match {
                database,
                strategy,
                word,
            } => write!(f, "MATCH {} {} {}", database, strategy, quote(word)),
            Command::Quit => f.write_str("QUIT"),
            Command::Other { command, param } => match param {
                Some(param) => write!(f, "{} {}", command, param),
                None => f.write_str(command),
            },
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command({})", self)
    }
}

/// MD5 of connection id + secret, lowercase hex (RFC 2229 section 3.11)
pub fn auth_digest(connection_id: &str, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(connection_id.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DictError::InvalidCommand(format!("{} must not be empty", field)));
    }
    if value.contains(['\r', '\n']) {
        return Err(DictError::InvalidCommand(format!(
            "{} must not contain line breaks",
            field
        )));
    }
    Ok(())
}

/// Sent unquoted, so must be a single word
fn check_atom(field: &str, value: &str) -> Result<()> {
    check_text(field, value)?;
    if value.chars().any(|c| c.is_whitespace() || c == '"') {
        return Err(DictError::InvalidCommand(format!(
            "{} must be a single word, got {:?}",
            field, value
        )));
    }
    Ok(())
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`Command`] from loosely set fields
///
/// Setting a field the command type does not take is recorded and reported
/// by [`build`](CommandBuilder::build), as is a missing required field.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command_type: CommandType,
    param: Option<String>,
    database: Option<String>,
    strategy: Option<String>,
    username: Option<String>,
    secret: Option<String>,
    command_text: Option<String>,
    misuse: Vec<String>,
}

impl CommandBuilder {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            param: None,
            database: None,
            strategy: None,
            username: None,
            secret: None,
            command_text: None,
            misuse: Vec::new(),
        }
    }

    /// Raw command text, OTHER only
    pub fn command_text(mut self, text: impl Into<String>) -> Self {
        self.allow("command text", &[CommandType::Other]);
        self.command_text = Some(text.into());
        self
    }

    /// Word for DEFINE/MATCH, text for CLIENT, trailing parameter for OTHER
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.allow(
            "param",
            &[
                CommandType::Client,
                CommandType::Define,
                CommandType::Match,
                CommandType::Other,
            ],
        );
        self.param = Some(param.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.allow(
            "database",
            &[CommandType::Define, CommandType::Match, CommandType::ShowInfo],
        );
        self.database = Some(database.into());
        self
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.allow("strategy", &[CommandType::Match]);
        self.strategy = Some(strategy.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.allow("username", &[CommandType::Auth]);
        self.username = Some(username.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.allow("secret", &[CommandType::Auth]);
        self.secret = Some(secret.into());
        self
    }

    pub fn build(self) -> Result<Command> {
        if !self.misuse.is_empty() {
            return Err(DictError::InvalidCommand(self.misuse.join("; ")));
        }

        let command_type = self.command_type;
        let missing =
            |what: &str| DictError::InvalidCommand(format!("{:?} requires {}", command_type, what));
        let database = self.database;
        let any_database = || ALL_DATABASES.to_string();

        match command_type {
            CommandType::Client => {
                Command::client(self.param.ok_or_else(|| missing("a parameter"))?)
            }
            CommandType::ShowServer => Ok(Command::ShowServer),
            CommandType::Help => Ok(Command::Help),
            CommandType::Auth => match (self.username, self.secret) {
                (Some(username), Some(secret)) => Command::auth(username, secret),
                _ => Err(missing("a username and a secret")),
            },
            CommandType::ShowDatabases => Ok(Command::ShowDatabases),
            CommandType::ShowInfo => {
                Command::show_info(database.ok_or_else(|| missing("a database"))?)
            }
            CommandType::ShowStrategies => Ok(Command::ShowStrategies),
            CommandType::Define => Command::define_in(
                database.unwrap_or_else(any_database),
                self.param.ok_or_else(|| missing("a word"))?,
            ),
            CommandType::Match => {
                let strategy = self.strategy.ok_or_else(|| missing("a strategy"))?;
                let word = self.param.ok_or_else(|| missing("a word"))?;
                Command::match_in(database.unwrap_or_else(any_database), strategy, word)
            }
            CommandType::Quit => Ok(Command::Quit),
            CommandType::Other => Command::other(
                self.command_text.ok_or_else(|| missing("command text"))?,
                self.param,
            ),
        }
    }

    fn allow(&mut self, field: &str, types: &[CommandType]) {
        if !types.contains(&self.command_type) {
            self.misuse.push(format!(
                "{} is not valid for {:?}",
                field, self.command_type
            ));
        }
    }
}

//! Client Module
//!
//! One method per DICT command, returning decoded values instead of raw
//! responses.
//!
//! ## Responsibilities
//! - Open the connection and announce the client with CLIENT
//! - Map each command's replies to a typed result
//! - Treat "nothing found" replies (552, 554, 555) as empty results
//! - Send QUIT before closing the socket

use crate::config::Config;
use crate::error::{DictError, Result};
use crate::network::Connection;
use crate::protocol::codes;
use crate::protocol::{Banner, Command, Definition, DictItem, Match, Response};

/// A connected DICT client
pub struct DictClient {
    connection: Connection,
    config: Config,
}

impl DictClient {
    /// Connect, read the banner and send CLIENT
    pub fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let mut connection = Connection::from_config(&config);
        connection.connect()?;
        if let Err(e) = check_greeting(&connection) {
            connection.close()?;
            return Err(e);
        }

        let mut client = Self { connection, config };
        client.send_client()?;
        tracing::info!("Connected to {}", client.connection);
        Ok(client)
    }

    fn send_client(&mut self) -> Result<()> {
        let command = Command::client(self.config.client.client_string())?;
        let response = self.first_response(&command)?;
        expect(&response, &[codes::OK])
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn banner(&self) -> Option<&Banner> {
        self.connection.banner()
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Send any command and return its raw replies
    pub fn execute(&mut self, command: &Command) -> Result<Vec<Response>> {
        command.execute(&mut self.connection)
    }

    /// Server information written by the administrator
    pub fn server_info(&mut self) -> Result<String> {
        let response = self.first_response(&Command::show_server())?;
        expect(&response, &[codes::SERVER_INFO])?;
        Ok(response.raw_data.unwrap_or_default())
    }

    /// Summary of the commands the server understands
    pub fn help(&mut self) -> Result<String> {
        let response = self.first_response(&Command::help())?;
        expect(&response, &[codes::HELP_TEXT])?;
        Ok(response.raw_data.unwrap_or_default())
    }

    /// Authenticate; `Ok(false)` when the server refuses the credentials
    pub fn authenticate(&mut self, username: &str, secret: &str) -> Result<bool> {
        let command = Command::auth(username, secret)?;
        let response = self.first_response(&command)?;
        let accepted = response.status == codes::AUTH_OK;
        if !accepted {
            tracing::debug!("AUTH rejected: {} {}", response.status, response.message);
        }
        Ok(accepted)
    }

    /// Databases available on the server
    pub fn databases(&mut self) -> Result<Vec<DictItem>> {
        let response = self.first_response(&Command::show_databases())?;
        if response.status == codes::NO_DATABASES {
            return Ok(Vec::new());
        }
        expect(&response, &[codes::DATABASES_PRESENT])?;
        Ok(response.items().map(<[DictItem]>::to_vec).unwrap_or_default())
    }

    /// Match strategies available on the server
    pub fn strategies(&mut self) -> Result<Vec<DictItem>> {
        let response = self.first_response(&Command::show_strategies())?;
        if response.status == codes::NO_STRATEGIES {
            return Ok(Vec::new());
        }
        expect(&response, &[codes::STRATEGIES_AVAILABLE])?;
        Ok(response.items().map(<[DictItem]>::to_vec).unwrap_or_default())
    }

    /// Detailed information about one database
    pub fn database_info(&mut self, database: &str) -> Result<String> {
        let response = self.first_response(&Command::show_info(database)?)?;
        expect(&response, &[codes::DATABASE_INFO])?;
        Ok(response.raw_data.unwrap_or_default())
    }

    /// Define a word in every database
    pub fn define(&mut self, word: &str) -> Result<Vec<Definition>> {
        self.run_define(Command::define(word)?)
    }

    /// Define a word in one database
    pub fn define_in(&mut self, database: &str, word: &str) -> Result<Vec<Definition>> {
        self.run_define(Command::define_in(database, word)?)
    }

    fn run_define(&mut self, command: Command) -> Result<Vec<Definition>> {
        let responses = self.execute(&command)?;
        let Some(first) = responses.first() else {
            return Ok(Vec::new());
        };
        if first.status == codes::NO_MATCH {
            return Ok(Vec::new());
        }
        expect(first, &[codes::DEFINITIONS_RETRIEVED])?;

        Ok(responses
            .into_iter()
            .skip(1)
            .filter(|response| response.status == codes::DEFINITION)
            .filter_map(|response| response.definition().cloned())
            .collect())
    }

    /// Match a word in every database
    pub fn match_word(&mut self, strategy: &str, word: &str) -> Result<Vec<Match>> {
        self.run_match(Command::match_word(strategy, word)?)
    }

    /// Match a word in one database
    pub fn match_in(&mut self, database: &str, strategy: &str, word: &str) -> Result<Vec<Match>> {
        self.run_match(Command::match_in(database, strategy, word)?)
    }

    fn run_match(&mut self, command: Command) -> Result<Vec<Match>> {
        let response = self.first_response(&command)?;
        if response.status == codes::NO_MATCH {
            return Ok(Vec::new());
        }
        expect(&response, &[codes::MATCHES_FOUND])?;
        Ok(response.matches().map(<[Match]>::to_vec).unwrap_or_default())
    }

    /// Send QUIT and close the socket
    ///
    /// The socket is closed even when the server does not acknowledge QUIT.
    pub fn close(mut self) -> Result<()> {
        let quit = self.first_response(&Command::quit());
        self.connection.close()?;
        let response = quit?;
        expect(&response, &[codes::CLOSING])?;
        tracing::info!("Disconnected");
        Ok(())
    }

    fn first_response(&mut self, command: &Command) -> Result<Response> {
        self.execute(command)?.into_iter().next().ok_or_else(|| {
            DictError::InvalidState(format!("no response to {}", command))
        })
    }
}

/// Refuse greetings carrying a failure code (420, 421, 530)
fn check_greeting(connection: &Connection) -> Result<()> {
    let Some(greeting) = connection.greeting() else {
        return Ok(());
    };
    let code = greeting.get(..3).and_then(|code| code.parse::<u16>().ok());
    match code {
        Some(code) if code >= 400 => Err(DictError::Status {
            code,
            message: greeting[3..].trim().to_string(),
        }),
        _ => Ok(()),
    }
}

fn expect(response: &Response, expected: &[u16]) -> Result<()> {
    if expected.contains(&response.status) {
        Ok(())
    } else {
        Err(DictError::Status {
            code: response.status,
            message: response.message.clone(),
        })
    }
}

//! Connection Handler
//!
//! Owns the TCP socket to a DICT server.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::{Config, DEFAULT_PORT, DEFAULT_TIMEOUT_MS};
use crate::error::{DictError, Result};
use crate::protocol::{Banner, LineReader, LineSource};

/// Where a connection is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, `connect` not called yet
    Unconnected,

    /// Socket open, banner read
    Connected,

    /// Closed or failed; build a new connection to reconnect
    Closed,
}

/// A connection to a single DICT server
pub struct Connection {
    host: String,
    port: u16,

    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,

    /// TCP stream reader (buffered, line oriented)
    reader: Option<LineReader<BufReader<TcpStream>>>,

    /// TCP stream writer (buffered for efficiency)
    writer: Option<BufWriter<TcpStream>>,

    /// First line sent by the server
    greeting: Option<String>,

    /// Parsed greeting, if the server follows the banner format
    banner: Option<Banner>,

    state: ConnectionState,
}

impl Connection {
    /// Connection to `host` on the default port
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, DEFAULT_PORT)
    }

    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        let timeout = Some(Duration::from_millis(DEFAULT_TIMEOUT_MS));
        Self {
            host: host.into(),
            port,
            connect_timeout: timeout,
            read_timeout: timeout,
            write_timeout: timeout,
            reader: None,
            writer: None,
            greeting: None,
            banner: None,
            state: ConnectionState::Unconnected,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut connection = Self::with_port(config.host.clone(), config.port);
        connection.connect_timeout = config.connect_timeout();
        connection.read_timeout = config.read_timeout();
        connection.write_timeout = config.write_timeout();
        connection
    }

    /// Use one timeout for connect, read and write (`None` = block forever)
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self.write_timeout = timeout;
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Open the socket and read the server banner
    ///
    /// A greeting that does not follow the banner format is accepted; the
    /// banner, capabilities and connection id are then unavailable.
    pub fn connect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Unconnected {
            return Err(DictError::InvalidState(format!(
                "cannot connect a connection that is {:?}",
                self.state
            )));
        }

        match self.open() {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Connecting to {} failed: {}", self, e);
                self.abandon();
                Err(e)
            }
        }
    }

    fn open(&mut self) -> Result<()> {
        let stream = self.dial()?;
        tracing::debug!("Connected to {}", self);

        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_write_timeout(self.write_timeout)?;

        // Clone stream for separate read/write handles
        let mut reader = LineReader::new(BufReader::new(stream.try_clone()?));
        let writer = BufWriter::new(stream);

        let greeting = reader.next_line()?.ok_or_else(|| {
            DictError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection before sending a banner",
            ))
        })?;
        tracing::debug!("<- {}", greeting);

        self.banner = Banner::parse(&greeting);
        if self.banner.is_none() {
            tracing::warn!("{} sent a non-conforming banner: {:?}", self, greeting);
        }
        self.greeting = Some(greeting);
        self.reader = Some(reader);
        self.writer = Some(writer);
        Ok(())
    }

    fn dial(&self) -> Result<TcpStream> {
        let mut last_err = None;
        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(DictError::Io(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", self.host),
            )
        })))
    }

    /// Close the socket
    ///
    /// Does not send QUIT; that is a protocol exchange for the caller.
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            tracing::debug!("Closing connection to {}", self);
            if let Some(writer) = self.writer.as_mut() {
                // Best effort: the peer may already be gone after QUIT
                let _ = writer.flush();
            }
        }
        self.abandon();
        Ok(())
    }

    /// Drop the socket and mark the connection unusable
    pub(crate) fn abandon(&mut self) {
        if let Some(writer) = self.writer.take() {
            let _ = writer.get_ref().shutdown(Shutdown::Both);
        }
        self.reader = None;
        self.state = ConnectionState::Closed;
    }

    // -------------------------------------------------------------------------
    // Line I/O
    // -------------------------------------------------------------------------

    /// Read one line without its CR/LF; `None` when the server closed
    ///
    /// An I/O error or end of stream closes the connection.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let reader = self.reader.as_mut().ok_or(DictError::NotConnected)?;
        let result = reader.next_line();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!("{} closed the connection", self);
                self.abandon();
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self, e);
                self.abandon();
            }
        }
        result
    }

    /// Write one line followed by CRLF and flush
    ///
    /// An I/O error closes the connection.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(DictError::NotConnected)?;
        let result = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\r\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            tracing::warn!("Error writing to {}: {}", self, e);
            self.abandon();
            return Err(e.into());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Raw first line sent by the server
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn capabilities(&self) -> Option<&BTreeSet<String>> {
        self.banner.as_ref().map(|banner| &banner.capabilities)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.banner
            .as_ref()
            .is_some_and(|banner| banner.has_capability(capability))
    }

    /// Connection id from the banner, used for AUTH
    pub fn id(&self) -> Option<&str> {
        self.banner.as_ref().map(|banner| banner.connection_id.as_str())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> Option<String> {
        self.writer
            .as_ref()
            .and_then(|writer| writer.get_ref().peer_addr().ok())
            .map(|addr| addr.to_string())
    }
}

impl LineSource for Connection {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.read_line()
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == DEFAULT_PORT {
            f.write_str(&self.host)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("state", &self.state)
            .field("banner", &self.banner)
            .finish()
    }
}

//! Response parser
//!
//! Turns the lines a server sends after one command into a sequence of
//! [`Response`] values.
//!
//! ## States
//! ```text
//!                 ┌──────────── 150 ────────────┐
//!                 ▼                             │
//!        ┌─────────────────┐  110..114,151,152  ┌────────────────┐
//!  ────▶ │ AwaitStatusLine │ ─────────────────▶ │ AwaitTerminator│
//!        └────────┬────────┘ ◀───── "." ─────── └────────────────┘
//!                 │ any other code
//!                 ▼
//!            ┌────────┐
//!            │  Done  │
//!            └────────┘
//! ```
//!
//! Every transition is decided by the content of the line just read, so
//! the parser never waits for a line the server is not going to send.

use std::io::{self, BufRead};
use std::mem;

use crate::error::{DictError, Result};

use super::codes;
use super::response::Response;

/// Supplies protocol lines, one at a time
pub trait LineSource {
    /// Next line with its trailing CR/LF removed, or `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

/// [`LineSource`] over any buffered reader
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(256),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Where the parser is within one command's replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Next line must be a status line
    AwaitStatusLine,

    /// Collecting a text body until a lone `.`
    AwaitTerminator {
        status: u16,
        message: String,
        lines: Vec<String>,
    },

    /// No more replies belong to this command
    Done,
}

/// Parses all replies for a single command
pub struct ResponseParser<'a, S: LineSource + ?Sized> {
    source: &'a mut S,
    state: ParserState,
}

impl<'a, S: LineSource + ?Sized> ResponseParser<'a, S> {
    /// Start a session positioned right after a command was sent
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            state: ParserState::AwaitStatusLine,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Whether another reply belongs to this command
    pub fn has_next(&self) -> bool {
        self.state != ParserState::Done
    }

    /// Read the next reply
    ///
    /// Any error ends the session.
    pub fn parse(&mut self) -> Result<Response> {
        loop {
            // Errors returned below leave the state at Done
            match mem::replace(&mut self.state, ParserState::Done) {
                ParserState::Done => {
                    return Err(DictError::InvalidState(
                        "no more responses for this command".to_string(),
                    ));
                }

                ParserState::AwaitStatusLine => {
                    let line = self.read_line()?;
                    let (status, message) = parse_status_line(&line)?;
                    tracing::debug!("<- {} {}", status, message);

                    if codes::carries_text(status) {
                        self.state = ParserState::AwaitTerminator {
                            status,
                            message,
                            lines: Vec::new(),
                        };
                        continue;
                    }
                    if codes::is_preliminary(status) {
                        self.state = ParserState::AwaitStatusLine;
                    }
                    return Ok(Response::status_only(status, message));
                }

                ParserState::AwaitTerminator {
                    status,
                    message,
                    mut lines,
                } => {
                    let line = self.read_line()?;
                    if line == "." {
                        // A body is always followed by another status line
                        self.state = ParserState::AwaitStatusLine;
                        return Ok(Response::with_body(status, message, lines.join("\n")));
                    }

                    tracing::trace!("<- {}", line);
                    lines.push(match line.strip_prefix("..") {
                        Some(rest) => format!(".{}", rest),
                        None => line,
                    });
                    self.state = ParserState::AwaitTerminator {
                        status,
                        message,
                        lines,
                    };
                }
            }
        }
    }

    /// Read every remaining reply for this command
    pub fn collect_all(mut self) -> Result<Vec<Response>> {
        let mut responses = Vec::new();
        while self.has_next() {
            responses.push(self.parse()?);
        }
        Ok(responses)
    }

    fn read_line(&mut self) -> Result<String> {
        self.source.next_line()?.ok_or_else(|| {
            DictError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed in the middle of a response",
            ))
        })
    }
}

impl<S: LineSource + ?Sized> Iterator for ResponseParser<'_, S> {
    type Item = Result<Response>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_next().then(|| self.parse())
    }
}

/// Split `"250 ok"` into `(250, "ok")`
fn parse_status_line(line: &str) -> Result<(u16, String)> {
    let malformed = || DictError::MalformedStatusLine(line.to_string());

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) || bytes[0] == b'0' {
        return Err(malformed());
    }
    let message = match bytes.get(3) {
        None => "",
        Some(b' ') => line[4..].trim(),
        Some(_) => return Err(malformed()),
    };
    let status = line[..3].parse::<u16>().map_err(|_| malformed())?;

    Ok((status, message.to_string()))
}

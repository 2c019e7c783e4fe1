//! Connection banner
//!
//! The first line a DICT server sends after accepting a connection:
//!
//! ```text
//! 220 dictd 1.12 <auth.mime> <100@dictd.org>
//!     └── message ┘ └ caps ┘ └ connection id ┘
//! ```

use std::collections::BTreeSet;
use std::fmt;

use super::codes;

/// Parsed server greeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Free text between the status code and the capability list
    pub message: String,

    /// Message id used as the AUTH challenge, brackets included
    pub connection_id: String,

    /// Lowercase capability tokens
    pub capabilities: BTreeSet<String>,
}

impl Banner {
    /// Parse a greeting line
    ///
    /// Returns `None` when the line does not end in a capability group and a
    /// connection id group, or when no message text is left. Servers that do
    /// not follow the format exist, so this is not an error.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        let (rest, connection_id) = split_trailing_group(line)?;
        if connection_id.len() <= 2 {
            return None;
        }
        let (rest, capabilities) = split_trailing_group(rest)?;
        let capabilities = &capabilities[1..capabilities.len() - 1];

        let message = strip_status_code(rest).trim();
        if message.is_empty() {
            return None;
        }

        Some(Self {
            message: message.to_string(),
            connection_id: connection_id.to_string(),
            capabilities: capabilities
                .split('.')
                .map(str::trim)
                .filter(|cap| !cap.is_empty())
                .map(str::to_lowercase)
                .collect(),
        })
    }

    /// Whether the server advertised a capability (case-insensitive)
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(&capability.to_lowercase())
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let caps: Vec<&str> = self.capabilities.iter().map(String::as_str).collect();
        write!(
            f,
            "{} {} <{}> {}",
            codes::BANNER,
            self.message,
            caps.join("."),
            self.connection_id
        )
    }
}

/// Split `"... <group>"` into the text before the group and `"<group>"`
fn split_trailing_group(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_end();
    if !text.ends_with('>') {
        return None;
    }
    let open = text.rfind('<')?;
    let group = &text[open..];
    // The group must be the last thing on the line, with nothing nested
    if group[1..group.len() - 1].contains('>') {
        return None;
    }
    Some((&text[..open], group))
}

fn strip_status_code(text: &str) -> &str {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    if bytes.len() >= 3 && bytes[..3].iter().all(u8::is_ascii_digit) {
        match bytes.get(3) {
            None => "",
            Some(b' ') => &text[4..],
            Some(_) => text,
        }
    } else {
        text
    }
}

//! Decoded body entries
//!
//! SHOW DATABASES, SHOW STRATEGIES and MATCH bodies are lists of
//! `key "value"` lines. DEFINE bodies are free text introduced by a 151
//! status line naming the word and the database it came from.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A `key "value"` pair from a listing body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictItem {
    /// Database or strategy name
    pub key: String,

    /// Description (or the matched word, for MATCH bodies)
    pub value: String,
}

impl DictItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse one listing line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = tokenize(line).into_iter();
        let key = tokens.next()?;
        let value = tokens.collect::<Vec<_>>().join(" ");
        Some(Self { key, value })
    }

    /// Parse every non-blank line of a listing body
    pub fn parse_list(body: &str) -> Vec<Self> {
        body.lines().filter_map(Self::parse).collect()
    }
}

impl fmt::Display for DictItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.key, self.value)
    }
}

/// One definition of a word, from a 151 reply and its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub word: String,
    pub database: String,
    pub database_description: String,
    pub text: String,
}

impl Definition {
    /// Build from the 151 status text (`"word" db "description"`) and body
    pub fn from_reply(status_text: &str, body: &str) -> Self {
        let mut tokens = tokenize(status_text).into_iter();
        let word = tokens.next().unwrap_or_default();
        let database = tokens.next().unwrap_or_default();
        let database_description = tokens.collect::<Vec<_>>().join(" ");
        Self {
            word,
            database,
            database_description,
            text: body.to_string(),
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From {} [{}]:", self.database_description, self.database)?;
        write!(f, "{}", self.text)
    }
}

/// A matched word and every database it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub word: String,
    pub databases: Vec<String>,
}

impl Match {
    /// Group `db "word"` lines by word, keeping first-seen order
    pub fn parse_list(body: &str) -> Vec<Self> {
        let mut matches: Vec<Match> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut seen: HashSet<(usize, String)> = HashSet::new();

        for item in DictItem::parse_list(body) {
            let slot = *index.entry(item.value.clone()).or_insert_with(|| {
                matches.push(Match {
                    word: item.value,
                    databases: Vec::new(),
                });
                matches.len() - 1
            });
            if seen.insert((slot, item.key.clone())) {
                matches[slot].databases.push(item.key);
            }
        }
        matches
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.word, self.databases.join(", "))
    }
}

/// Split a line into words, treating `"..."` as one word
///
/// Inside quotes a backslash escapes the next character. An unterminated
/// quote runs to the end of the line.
pub(crate) fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    _ => token.push(c),
                }
            }
        } else {
            token.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    tokens
}

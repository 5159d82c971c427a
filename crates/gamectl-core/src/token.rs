//! Command token parsing
//!
//! A token is `name` or `name:argument`. Only the first colon splits, and a
//! colon at position 0 never does.

use std::fmt;

/// Separator used inside registry names for multi-word commands
pub const WORD_SEPARATOR: char = '_';

/// A parsed command token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    /// Command name as typed
    pub name: String,
    /// Embedded argument, if the token carried one
    pub argument: Option<String>,
}

impl CommandToken {
    /// Parse a raw token
    pub fn parse(raw: &str) -> Self {
        match raw.find(':') {
            Some(idx) if idx > 0 => Self {
                name: raw[..idx].to_string(),
                argument: Some(raw[idx + 1..].to_string()),
            },
            _ => Self {
                name: raw.to_string(),
                argument: None,
            },
        }
    }

    /// Registry key for this token's name
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}:{}", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

/// Map hyphens to the registry word separator
pub fn normalize(name: &str) -> String {
    name.replace('-', &WORD_SEPARATOR.to_string())
}

//! Error types for gamectl

use thiserror::Error;

/// Result type for gamectl operations
pub type Result<T> = std::result::Result<T, GameCtlError>;

/// gamectl error types
#[derive(Debug, Error)]
pub enum GameCtlError {
    /// Caller input cannot be satisfied (unknown command, missing or
    /// ambiguous instance, malformed clientfile)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote answered with a status outside the expected set
    #[error("Remote error {status}: {reason}")]
    Remote { status: u16, reason: String },

    /// Connection-level failure (DNS, refused, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with a payload of the wrong shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GameCtlError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        GameCtlError::Configuration(message.into())
    }
}

impl From<serde_json::Error> for GameCtlError {
    fn from(err: serde_json::Error) -> Self {
        GameCtlError::Serialization(err.to_string())
    }
}

/// Process exit codes for each failure class
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERIC_FAILURE: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
    pub const REMOTE: i32 = 3;
    pub const TRANSPORT: i32 = 4;
}

impl GameCtlError {
    /// Exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GameCtlError::Configuration(_) => exit_codes::CONFIGURATION,
            GameCtlError::Remote { .. } => exit_codes::REMOTE,
            GameCtlError::Transport(_) => exit_codes::TRANSPORT,
            GameCtlError::Protocol(_) | GameCtlError::Serialization(_) => {
                exit_codes::GENERIC_FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = GameCtlError::Remote {
            status: 409,
            reason: "server already running".into(),
        };
        assert_eq!(err.to_string(), "Remote error 409: server already running");
        assert_eq!(err.exit_code(), exit_codes::REMOTE);
    }

    #[test]
    fn test_configuration_exit_code() {
        let err = GameCtlError::config("command not found: frobnicate");
        assert!(err.to_string().contains("command not found: frobnicate"));
        assert_eq!(err.exit_code(), exit_codes::CONFIGURATION);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = GameCtlError::from(json_err);
        assert!(matches!(err, GameCtlError::Serialization(_)));
        assert_eq!(err.exit_code(), exit_codes::GENERIC_FAILURE);
    }
}

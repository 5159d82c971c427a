//! Session configuration and clientfile loading

use gamectl_core::{GameCtlError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding the server URL
pub const ENV_SERVER_URL: &str = "GAMECTL_SERVER_URL";
/// Environment variable overriding the secret
pub const ENV_SECRET: &str = "GAMECTL_SECRET";
/// Environment variable naming the clientfile
pub const ENV_CLIENTFILE: &str = "GAMECTL_CLIENTFILE";
/// Clientfile looked up in the working directory when nothing else is given
pub const DEFAULT_CLIENTFILE: &str = "gamectl.json";

/// Configuration for an HTTP session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the management service, e.g. `http://127.0.0.1:8080`
    pub server_url: String,
    /// Secret sent with every request
    pub secret: String,
    /// Timeout for a single request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            secret: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// On-disk clientfile layout
#[derive(Debug, Default, Deserialize)]
struct ClientFile {
    #[serde(default)]
    server_url: Option<String>,
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create config for a server URL and secret
    pub fn new(server_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load a JSON clientfile
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GameCtlError::config(format!("cannot read clientfile {}: {}", path.display(), e))
        })?;
        let file: ClientFile = serde_json::from_str(&text).map_err(|e| {
            GameCtlError::config(format!("malformed clientfile {}: {}", path.display(), e))
        })?;

        let mut config = Self::default();
        if let Some(url) = file.server_url {
            config.server_url = url;
        }
        if let Some(secret) = file.secret {
            config.secret = secret;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        debug!("Loaded clientfile {}", path.display());
        Ok(config)
    }

    /// Clientfile to read when none is given explicitly.
    ///
    /// `$GAMECTL_CLIENTFILE` wins; otherwise `./gamectl.json` if it exists.
    pub fn default_clientfile() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CLIENTFILE) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CLIENTFILE);
        local.exists().then_some(local)
    }

    /// Apply `GAMECTL_SERVER_URL` / `GAMECTL_SECRET` over this config
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Ok(secret) = std::env::var(ENV_SECRET) {
            self.secret = secret;
        }
        self
    }

    /// Check the config is usable for a session
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(GameCtlError::config("server URL not configured"));
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(GameCtlError::config(format!(
                "server URL must be http(s): {}",
                self.server_url
            )));
        }
        if self.secret.is_empty() {
            return Err(GameCtlError::config("secret not configured"));
        }
        Ok(())
    }
}

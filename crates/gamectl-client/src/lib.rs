//! gamectl HTTP client
//!
//! This crate provides the session used to reach the game server
//! management service over HTTP, and the configuration it is opened from.

pub mod config;
mod session;

pub use config::ClientConfig;
pub use session::{HttpSession, SECRET_HEADER};

//! # gamectl-core
//!
//! Core types and traits for the gamectl command pipeline.
//!
//! This crate provides the foundational types shared by the session and the
//! pipeline executor:
//! - Error taxonomy and exit codes
//! - Command token parsing and name normalization
//! - Instance resolution
//! - The `Transport` trait and its drain loop

pub mod error;
pub mod instance;
pub mod token;
pub mod transport;

pub use error::{GameCtlError, Result, exit_codes};
pub use instance::{InstanceSet, TargetPath, parse_instances, resolve_instance};
pub use token::CommandToken;
pub use transport::{Poll, Relay, Transport, locator_path};

//! # gamectl-pipeline
//!
//! Command registry and pipeline executor for gamectl.
//!
//! This crate provides:
//! - `Operation` trait for implementing commands
//! - `CommandRegistry`, the closed set of known commands
//! - Built-in commands (server lifecycle, broadcast, backup, sleep)
//! - `Pipeline`, which validates and runs token lists in order

pub mod commands;
pub mod executor;
pub mod operation;
pub mod registry;

#[cfg(test)]
mod testing;

pub use executor::{Outcome, Pipeline};
pub use operation::{Arity, Context, Flow, Operation};
pub use registry::{CommandRegistry, OperationDescriptor};

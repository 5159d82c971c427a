//! Operation trait

use async_trait::async_trait;
use gamectl_core::{Relay, Result, TargetPath, Transport};

/// Whether the pipeline continues after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next command
    Continue,
    /// Stop here without error
    Halt,
}

/// Number of argument slots an operation declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Takes no argument; a supplied one is ignored
    None,
    /// Takes the token's argument, which may be absent or empty
    One,
}

/// Everything an operation may touch during a run
pub struct Context<'a> {
    /// Session used for every remote call
    pub transport: &'a dyn Transport,
    /// Sink for lines printed back to the caller
    pub relay: &'a dyn Relay,
    /// Resolved base path of the target instance
    pub target: &'a TargetPath,
}

/// Trait for implementing pipeline commands
///
/// Implement this trait to make a command available in a `CommandRegistry`.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Run the command against the target instance
    async fn invoke(&self, ctx: &Context<'_>, argument: Option<&str>) -> Result<Flow>;
}

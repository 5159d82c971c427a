//! Command registry

use crate::commands;
use crate::operation::{Arity, Context, Flow, Operation};
use gamectl_core::{CommandToken, GameCtlError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A command name bound to its arity and handler
pub struct OperationDescriptor {
    /// Normalized command name (words joined by `_`)
    pub name: &'static str,
    /// Declared argument slots
    pub arity: Arity,
    /// One-line description for `--list-commands`
    pub summary: &'static str,
    handler: Box<dyn Operation>,
}

impl OperationDescriptor {
    /// Describe a command
    pub fn new(
        name: &'static str,
        arity: Arity,
        summary: &'static str,
        handler: impl Operation + 'static,
    ) -> Self {
        Self {
            name,
            arity,
            summary,
            handler: Box::new(handler),
        }
    }

    /// Run the handler
    pub async fn invoke(&self, ctx: &Context<'_>, argument: Option<&str>) -> Result<Flow> {
        self.handler.invoke(ctx, argument).await
    }

    /// Name as typed on the command line
    pub fn display_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Closed mapping from normalized command name to descriptor
///
/// Built once and never mutated afterwards.
pub struct CommandRegistry {
    operations: BTreeMap<&'static str, OperationDescriptor>,
}

impl CommandRegistry {
    /// Create a registry from descriptors. A later descriptor replaces an
    /// earlier one of the same name.
    pub fn new(descriptors: impl IntoIterator<Item = OperationDescriptor>) -> Self {
        let operations = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.name, descriptor))
            .collect();
        Self { operations }
    }

    /// Registry of every built-in command
    pub fn builtin() -> Self {
        Self::new(commands::builtin())
    }

    /// Resolve a parsed token to its descriptor
    pub fn lookup(&self, token: &CommandToken) -> Result<&OperationDescriptor> {
        self.operations
            .get(token.normalized_name().as_str())
            .ok_or_else(|| GameCtlError::config(format!("command not found: {}", token.name)))
    }

    /// List all descriptors, sorted by name
    pub fn list(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.values()
    }

    /// Number of registered commands
    pub fn count(&self) -> usize {
        self.operations.len()
    }
}

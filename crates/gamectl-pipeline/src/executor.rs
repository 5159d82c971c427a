//! Pipeline executor
//!
//! A run goes through three phases:
//! 1. every token is parsed and resolved against the registry;
//! 2. the target instance is resolved from `GET /instances`;
//! 3. commands run in order until one halts, one fails, or none remain.
//!
//! Nothing reaches the remote before phase 1 has accepted every token.

use crate::operation::{Arity, Context, Flow};
use crate::registry::{CommandRegistry, OperationDescriptor};
use gamectl_core::instance::INSTANCES_PATH;
use gamectl_core::{CommandToken, Relay, Result, Transport, parse_instances, resolve_instance};
use tracing::{debug, info};

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every command ran
    Completed,
    /// A command stopped the pipeline early
    Halted {
        /// The token that halted, as typed
        command: String,
    },
}

/// Runs token lists against a command registry
pub struct Pipeline {
    registry: CommandRegistry,
}

impl Pipeline {
    /// Create a pipeline over a registry
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// Pipeline over the built-in commands
    pub fn builtin() -> Self {
        Self::new(CommandRegistry::builtin())
    }

    /// The registry commands are resolved against
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Resolve every token before anything runs
    pub fn validate<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<Vec<(CommandToken, &OperationDescriptor)>> {
        tokens
            .iter()
            .map(|raw| {
                let token = CommandToken::parse(raw.as_ref());
                let descriptor = self.registry.lookup(&token)?;
                Ok((token, descriptor))
            })
            .collect()
    }

    /// Run `tokens` against the instance named `instance` (or the only
    /// instance when `None` or empty).
    pub async fn run<S: AsRef<str>>(
        &self,
        transport: &dyn Transport,
        relay: &dyn Relay,
        instance: Option<&str>,
        tokens: &[S],
    ) -> Result<Outcome> {
        let plan = self.validate(tokens)?;

        let instances = parse_instances(transport.get(INSTANCES_PATH).await?.as_deref())?;
        let target = resolve_instance(instance, &instances)?;
        info!("Running {} command(s) against {}", plan.len(), target);

        let ctx = Context {
            transport,
            relay,
            target: &target,
        };

        for (token, descriptor) in plan {
            let argument = match descriptor.arity {
                Arity::None => {
                    if token.argument.is_some() {
                        debug!("Ignoring argument of {}", descriptor.name);
                    }
                    None
                }
                Arity::One => token.argument.as_deref(),
            };

            info!("> {}", token);
            if descriptor.invoke(&ctx, argument).await? == Flow::Halt {
                info!("Pipeline halted by {}", token);
                return Ok(Outcome::Halted {
                    command: token.to_string(),
                });
            }
        }

        Ok(Outcome::Completed)
    }
}

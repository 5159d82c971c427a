//! Built-in pipeline commands

use crate::operation::{Arity, Context, Flow, Operation};
use crate::registry::OperationDescriptor;
use async_trait::async_trait;
use gamectl_core::{GameCtlError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Get list of built-in commands
pub fn builtin() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::new(
            "server",
            Arity::None,
            "Print the server state of the instance",
            ServerStatus,
        ),
        OperationDescriptor::new(
            "server_start",
            Arity::None,
            "Start the game server",
            ServerAction("start"),
        ),
        OperationDescriptor::new(
            "server_stop",
            Arity::None,
            "Stop the game server",
            ServerAction("stop"),
        ),
        OperationDescriptor::new(
            "server_restart",
            Arity::None,
            "Restart the game server",
            ServerAction("restart"),
        ),
        OperationDescriptor::new(
            "server_daemon",
            Arity::None,
            "Run the game server detached from the management service",
            ServerAction("daemon"),
        ),
        OperationDescriptor::new(
            "server_if_running",
            Arity::None,
            "Stop the pipeline unless the server is running",
            ServerExpect { running: true },
        ),
        OperationDescriptor::new(
            "server_if_stopped",
            Arity::None,
            "Stop the pipeline unless the server is stopped",
            ServerExpect { running: false },
        ),
        OperationDescriptor::new(
            "world_broadcast",
            Arity::One,
            "Broadcast a message to players. Example: world-broadcast:\"Restart in 5 minutes\"",
            WorldBroadcast,
        ),
        OperationDescriptor::new(
            "backup_world",
            Arity::One,
            "Back up the world and follow progress. Optional argument: prune backups older than N hours",
            BackupWorld,
        ),
        OperationDescriptor::new(
            "sleep",
            Arity::One,
            "Wait N seconds before the next command",
            Sleep,
        ),
    ]
}

/// Server state as returned by `GET <instance>/server`
#[derive(Debug, Deserialize)]
pub struct ServerState {
    pub running: bool,
}

/// Body for `POST <instance>/world/broadcast`
#[derive(Debug, Serialize)]
pub struct BroadcastParams<'a> {
    pub message: &'a str,
}

/// Body for `POST <instance>/deployment/backup-world`
#[derive(Debug, Serialize)]
pub struct BackupWorldParams {
    pub prunehours: u32,
}

/// Answer to a backup request: locator of the progress resource
#[derive(Debug, Deserialize)]
pub struct ProgressLocator {
    pub url: String,
}

/// Print the server state verbatim
pub struct ServerStatus;

#[async_trait]
impl Operation for ServerStatus {
    async fn invoke(&self, ctx: &Context<'_>, _argument: Option<&str>) -> Result<Flow> {
        if let Some(body) = ctx.transport.get(&ctx.target.join("server")).await? {
            for line in body.lines() {
                ctx.relay.line(line);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Post a server lifecycle action (`start`, `stop`, ...)
pub struct ServerAction(pub &'static str);

#[async_trait]
impl Operation for ServerAction {
    async fn invoke(&self, ctx: &Context<'_>, _argument: Option<&str>) -> Result<Flow> {
        let path = ctx.target.join(&format!("server/{}", self.0));
        ctx.transport.post(&path, None).await?;
        info!("Server {} requested for {}", self.0, ctx.target.name());
        Ok(Flow::Continue)
    }
}

/// Halt the pipeline when the server's running state differs from `running`
pub struct ServerExpect {
    pub running: bool,
}

#[async_trait]
impl Operation for ServerExpect {
    async fn invoke(&self, ctx: &Context<'_>, _argument: Option<&str>) -> Result<Flow> {
        let body = ctx
            .transport
            .get(&ctx.target.join("server"))
            .await?
            .ok_or_else(|| GameCtlError::Protocol("Empty server state response".into()))?;
        let state: ServerState = serde_json::from_str(&body).map_err(|e| {
            GameCtlError::Protocol(format!("Invalid server state response: {}", e))
        })?;

        if state.running == self.running {
            Ok(Flow::Continue)
        } else {
            info!(
                "Server on {} is {}, stopping pipeline",
                ctx.target.name(),
                if state.running { "running" } else { "stopped" }
            );
            Ok(Flow::Halt)
        }
    }
}

/// Broadcast the argument to players
pub struct WorldBroadcast;

#[async_trait]
impl Operation for WorldBroadcast {
    async fn invoke(&self, ctx: &Context<'_>, argument: Option<&str>) -> Result<Flow> {
        let params = BroadcastParams {
            message: argument.unwrap_or_default(),
        };
        ctx.transport
            .post(
                &ctx.target.join("world/broadcast"),
                Some(serde_json::to_value(&params)?),
            )
            .await?;
        Ok(Flow::Continue)
    }
}

/// Trigger a world backup and drain its progress
pub struct BackupWorld;

#[async_trait]
impl Operation for BackupWorld {
    async fn invoke(&self, ctx: &Context<'_>, argument: Option<&str>) -> Result<Flow> {
        let params = BackupWorldParams {
            prunehours: prune_hours(argument),
        };
        let body = ctx
            .transport
            .post(
                &ctx.target.join("deployment/backup-world"),
                Some(serde_json::to_value(&params)?),
            )
            .await?
            .ok_or_else(|| GameCtlError::Protocol("Backup returned no progress locator".into()))?;
        let locator: ProgressLocator = serde_json::from_str(&body).map_err(|e| {
            GameCtlError::Protocol(format!("Invalid backup response: {}", e))
        })?;

        ctx.transport.drain(&locator.url, ctx.relay).await?;
        info!("World backup of {} complete", ctx.target.name());
        Ok(Flow::Continue)
    }
}

/// Prune window in hours; absent or malformed means 0
fn prune_hours(argument: Option<&str>) -> u32 {
    match argument.map(str::trim) {
        None | Some("") => 0,
        Some(text) => text.parse().unwrap_or_else(|_| {
            warn!("Invalid prune hours '{}', using 0", text);
            0
        }),
    }
}

/// Wait before the next command
pub struct Sleep;

#[async_trait]
impl Operation for Sleep {
    async fn invoke(&self, _ctx: &Context<'_>, argument: Option<&str>) -> Result<Flow> {
        match parse_seconds(argument) {
            Some(seconds) => {
                debug!("Sleeping {}s", seconds);
                tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
            }
            None => warn!(
                "Invalid sleep duration '{}', skipping",
                argument.unwrap_or_default()
            ),
        }
        Ok(Flow::Continue)
    }
}

fn parse_seconds(argument: Option<&str>) -> Option<f64> {
    argument?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
}

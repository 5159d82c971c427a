//! gamectl
//!
//! Runs an ordered list of commands against one instance of the game server
//! management service:
//!
//! ```text
//! gamectl -i survival server-if-running world-broadcast:"Restarting in 30s" sleep:30 server-restart
//! ```
//!
//! Remote output goes to stdout, logs to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use gamectl_client::{ClientConfig, HttpSession};
use gamectl_core::{GameCtlError, exit_codes};
use gamectl_pipeline::{Arity, Outcome, Pipeline};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// gamectl - run command pipelines against game server instances
#[derive(Parser, Debug)]
#[command(name = "gamectl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Target instance (may be omitted when the service hosts exactly one)
    #[arg(short, long, env = "GAMECTL_INSTANCE", default_value = "")]
    instance: String,

    /// Path to the clientfile (JSON with server_url and secret)
    #[arg(long)]
    clientfile: Option<PathBuf>,

    /// Server URL, overrides clientfile and environment
    #[arg(long)]
    server_url: Option<String>,

    /// Secret, overrides clientfile and environment
    #[arg(long)]
    secret: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print full error chains and debug logs
    #[arg(long)]
    debug: bool,

    /// List available commands and exit
    #[arg(long)]
    list_commands: bool,

    /// Commands to run in order: `name` or `name:argument`
    commands: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug { "debug" } else { cli.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("gamectl: failed to install logger: {}", e);
    }

    let pipeline = Pipeline::builtin();

    if cli.list_commands {
        list_commands(&pipeline);
        return ExitCode::SUCCESS;
    }

    match run(&cli, &pipeline).await {
        Ok(Outcome::Completed) => {
            info!("All commands completed");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Halted { command }) => {
            info!("Stopped after {}", command);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.debug {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("gamectl: {}", err.root_cause());
            }
            ExitCode::from(exit_code(&err) as u8)
        }
    }
}

/// Open the session, run the pipeline, and close the session whatever the
/// outcome.
async fn run(cli: &Cli, pipeline: &Pipeline) -> Result<Outcome> {
    let clientfile = cli
        .clientfile
        .clone()
        .or_else(ClientConfig::default_clientfile);
    let config =
        load_config(cli, clientfile.as_deref()).context("loading client configuration")?;
    let session = HttpSession::open(&config).context("opening session")?;

    let relay = |line: &str| println!("{}", line);
    let result = pipeline
        .run(&session, &relay, Some(cli.instance.as_str()), cli.commands.as_slice())
        .await;

    let server_url = session.base_url().to_string();
    session.close();
    result.with_context(|| format!("pipeline against {} failed", server_url))
}

/// Clientfile, then environment, then flags
fn load_config(cli: &Cli, clientfile: Option<&Path>) -> gamectl_core::Result<ClientConfig> {
    let mut config = match clientfile {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();

    if let Some(url) = &cli.server_url {
        config.server_url = url.clone();
    }
    if let Some(secret) = &cli.secret {
        config.secret = secret.clone();
    }
    Ok(config)
}

fn list_commands(pipeline: &Pipeline) {
    for descriptor in pipeline.registry().list() {
        let usage = match descriptor.arity {
            Arity::None => descriptor.display_name(),
            Arity::One => format!("{}:<arg>", descriptor.display_name()),
        };
        println!("{:<24} {}", usage, descriptor.summary);
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GameCtlError>()
        .map(GameCtlError::exit_code)
        .unwrap_or(exit_codes::GENERIC_FAILURE)
}

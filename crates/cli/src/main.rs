//! SandClaw CLI — the main entry point.
//!
//! Commands:
//! - `run`      — Handle one task and print the reply
//! - `tools`    — List registered tools and whether each is allowed
//! - `context`  — Print the assembled memory context
//! - `config`   — Print a starter config, the effective config, or its path

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sandclaw_config::OrchestratorMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "sandclaw",
    about = "SandClaw — sandboxed tool runtime for chat agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $SANDCLAW_CONFIG or ~/.sandclaw/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a single task
    Run {
        /// Task text; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,

        /// Agent id the task is addressed to
        #[arg(long, default_value = "default")]
        agent: String,

        /// Originating channel name
        #[arg(long, default_value = "cli")]
        channel: String,

        /// Override `agent.mode` (loop or single)
        #[arg(long)]
        mode: Option<OrchestratorMode>,
    },

    /// List tools
    Tools,

    /// Print assembled memory context
    Context,

    /// Configuration helpers (prints a starter file by default)
    Config {
        /// Print the effective configuration instead
        #[arg(long, conflicts_with = "path")]
        show: bool,

        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run {
            message,
            agent,
            channel,
            mode,
        } => {
            let args = commands::run::RunArgs {
                message,
                agent,
                channel,
                mode,
            };
            commands::run::run(commands::load_config(config_path)?, args).await?
        }
        Commands::Tools => commands::tools::run(&commands::load_config(config_path)?)?,
        Commands::Context => commands::context::run(&commands::load_config(config_path)?).await?,
        Commands::Config { show, path } => {
            if path {
                commands::config_cmd::path(config_path);
            } else if show {
                commands::config_cmd::show(&commands::load_config(config_path)?)?;
            } else {
                commands::config_cmd::starter();
            }
        }
    }

    Ok(())
}

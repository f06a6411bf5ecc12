//! Waypoint CLI - the main entry point.
//!
//! Commands:
//! - `run`     - Interactive session (sign in, navigate, dismiss content)
//! - `fetch`   - One-shot content request for a user and view
//! - `hash`    - Print the verification token for a user id
//! - `status`  - Show the effective configuration
//! - `init`    - Write a default config file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use waypoint_config::Binding;

mod commands;
mod render;
mod repl;

#[derive(Parser)]
#[command(
    name = "waypoint",
    about = "Waypoint - trigger-point targeted content client",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.waypoint/config.toml)
    #[arg(short, long, global = true, env = "WAYPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Overrides for how content is obtained.
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Content source binding (http, sdk, static)
    #[arg(long)]
    pub binding: Option<Binding>,

    /// Static catalog JSON file (implies --binding static)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Run {
        /// Sign this user in on start
        #[arg(short, long)]
        user: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Request the content of one view and print it
    Fetch {
        /// User id to request content for
        #[arg(short, long)]
        user: String,

        /// View to navigate to (defaults to the first trigger point)
        #[arg(long)]
        view: Option<String>,

        /// Print the raw items as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the verification token for a user id
    Hash {
        user: String,

        /// Secret to hash with (defaults to the configured hash_secret)
        #[arg(long)]
        secret: Option<String>,
    },

    /// Show the effective configuration
    Status,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(|| waypoint_config::AppConfig::config_dir().join("config.toml"));

    match cli.command {
        Commands::Run { user, source } => commands::run::run(&config_path, &source, user).await?,
        Commands::Fetch { user, view, json, source } => {
            commands::fetch::run(&config_path, &source, &user, view.as_deref(), json).await?
        }
        Commands::Hash { user, secret } => commands::hash::run(&config_path, &user, secret)?,
        Commands::Status => commands::status::run(&config_path)?,
        Commands::Init { force } => commands::init::run(&config_path, force)?,
    }

    Ok(())
}

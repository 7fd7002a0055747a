//! pr-autogen binary

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::{ReconcileOptions, ServeOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pr-autogen")]
#[command(version, about = "Open a pull request for every new branch and enable auto-merge")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Address to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Reconcile one branch now, as if it had just been created
    Reconcile {
        /// Repository as owner/name
        repo: String,
        /// Branch to open the pull request from
        branch: String,
        /// Base branch (defaults to the repository's default branch)
        #[arg(long)]
        base: Option<String>,
        /// GitHub App installation ID (required with GitHub App auth)
        #[arg(long)]
        installation: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let config = pr_autogen::config::Config::load(args.config.as_deref())
        .context("failed to load configuration")?;
    // Held until exit so pending events are flushed
    let _sentry = config
        .sentry_dsn
        .as_deref()
        .map(pr_autogen::report::init_sentry)
        .transpose()?;
    pr_autogen::logging::init(config.log_format);

    match args.command {
        Commands::Serve { host, port } => {
            cli::run_serve(&config, ServeOptions { host, port }).await?;
        }
        Commands::Reconcile {
            repo,
            branch,
            base,
            installation,
        } => {
            let options = ReconcileOptions {
                repo,
                branch,
                base,
                installation,
            };
            cli::run_reconcile(&config, options).await?;
        }
    }

    Ok(())
}

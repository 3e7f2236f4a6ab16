use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "eep")]
#[command(about = "EEP - manage the active project context", long_about = None)]
struct Cli {
    /// Directory holding config.toml and the persisted snapshot
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active project
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a project the active one
    Select {
        project_id: String,
        workspace_id: String,
    },
    /// Revalidate the active project against the platform
    Refresh,
    /// Forget the active project
    Clear,
    /// Keep running and drop the active project once it expires
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let context = commands::AppContext::load(cli.config_dir).await?;

    match cli.command {
        Commands::Status { json } => commands::status::run(&context, json).await?,
        Commands::Select {
            project_id,
            workspace_id,
        } => commands::select::run(&context, &project_id, &workspace_id).await?,
        Commands::Refresh => commands::refresh::run(&context).await?,
        Commands::Clear => commands::clear::run(&context).await?,
        Commands::Watch => commands::watch::run(&context).await?,
    }

    Ok(())
}

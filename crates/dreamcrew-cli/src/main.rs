use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dreamcrew")]
#[command(about = "DreamCrew CLI - multi-persona video planning workflow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved projects, most recently updated first
    List,
    /// Show a project's brief, discussion history, and deliverables
    Show {
        /// Project id
        id: String,
    },
    /// Create a new empty project
    New,
    /// Delete a saved project
    Delete {
        /// Project id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => commands::project::list().await?,
        Commands::Show { id } => commands::project::show(&id).await?,
        Commands::New => commands::project::create().await?,
        Commands::Delete { id, yes } => commands::project::delete(&id, yes).await?,
    }

    Ok(())
}

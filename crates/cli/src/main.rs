//! Storyloom CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Initialize config & a project file
//! - `outline`  — Generate an outline from a story idea
//! - `chapter`  — Generate the next chapter
//! - `context`  — Show the composed context for a chapter
//! - `status`   — Show project status
//! - `doctor`   — Diagnose setup health

use clap::{Parser, Subcommand};

mod commands;
mod project;

#[derive(Parser)]
#[command(
    name = "storyloom",
    about = "Storyloom — AI-assisted novel writing from the terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the project file
    #[arg(short, long, global = true, default_value = "storyloom.json")]
    project: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and a new project file
    Init,

    /// Generate an outline from a story idea
    Outline {
        /// The story idea, in free text
        description: String,

        /// Writing style or genre
        #[arg(short, long, default_value = "literary fiction")]
        style: String,
    },

    /// Generate the next chapter
    Chapter {
        /// Task instruction for this chapter (first line becomes the title)
        instruction: String,

        /// Write the chapter body to this file instead of stdout
        #[arg(short, long)]
        out: Option<String>,

        /// Skip feeding a summary of the result back into the project
        #[arg(long)]
        no_summary: bool,
    },

    /// Show the composed context for a chapter
    Context {
        /// Chapter index to compose for (defaults to the next chapter)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Show project status
    Status,

    /// Diagnose setup health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run(&cli.project).await?,
        Commands::Outline { description, style } => {
            commands::outline::run(&cli.project, &description, &style).await?
        }
        Commands::Chapter {
            instruction,
            out,
            no_summary,
        } => commands::chapter::run(&cli.project, &instruction, out.as_deref(), no_summary).await?,
        Commands::Context { index } => commands::context::run(&cli.project, index).await?,
        Commands::Status => commands::status::run(&cli.project).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}

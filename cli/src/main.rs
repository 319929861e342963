#![deny(missing_docs)]

//! # Operator Forge CLI
//!
//! Command Line Interface for the operator source transformation engine.
//!
//! Supported Commands:
//! - `apply`: Rewrites a scaffolded project tree according to a request.
//! - `plan`: Shows the layout and synthesized structure without touching files.

use clap::{Parser, Subcommand};
use forge_core::AppResult;
use tracing_subscriber::EnvFilter;

mod apply;
mod plan;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Kubernetes operator source transformer")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a request to a scaffolded project tree.
    Apply(apply::ApplyArgs),
    /// Print the resolved layout and synthesized markers for a request.
    Plan(plan::PlanArgs),
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("operator_forge=info,forge_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Apply(args) => apply::execute(args)?,
        Commands::Plan(args) => plan::execute(args)?,
    }

    Ok(())
}

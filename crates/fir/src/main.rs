//! Fir CLI - declarative DOM templating.
//!
//! Provides commands for:
//! - `templates`: List the templates of the library
//! - `render`: Render one template against a JSON record
//! - `list`: Render the restaurant list from a change log
//! - `restaurant`: Render one restaurant page from a change log

mod commands;
mod error;
mod events;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, RenderArgs, RestaurantArgs, TemplatesArgs};
use output::Output;

/// Fir - declarative DOM templating.
#[derive(Parser)]
#[command(name = "fir", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the templates of the library.
    Templates(TemplatesArgs),
    /// Render one template against a JSON record.
    Render(RenderArgs),
    /// Render the restaurant list from a change log.
    List(ListArgs),
    /// Render a restaurant page from a change log.
    Restaurant(RestaurantArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Templates(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::List(args) => args.execute(),
        Commands::Restaurant(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

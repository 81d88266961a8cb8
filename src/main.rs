mod catalog;
mod commands;
mod config;
mod dartpad;
mod error;
mod renderer;
mod resolver;
mod scanner;
mod sitepath;
mod watch;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apilink", about = "Auto-link API references in markdown documentation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all pages to HTML, linking API symbol mentions
    Build,
    /// List every symbol in the reference catalog
    Symbols {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild whenever pages or reference files change
    Watch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build => commands::build(),
        Commands::Symbols { json } => commands::symbols(json),
        Commands::Watch => watch::run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

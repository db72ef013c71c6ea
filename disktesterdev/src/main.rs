mod application;
mod presentation;

use clap::Parser;

use application::handlers;
use presentation::cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Test {
            folder,
            size,
            chunksize,
        } => handlers::handle_test(folder, size, chunksize),
        Commands::Validate { folder } => handlers::handle_validate(folder),
        Commands::Clean { folder } => handlers::handle_clean(folder),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

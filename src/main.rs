//! Pokedex CLI - explore PokeAPI location areas and catch Pokemon
//!
//! An interactive REPL that pages through location areas, lists the Pokemon
//! found in each, and keeps the ones you catch for the rest of the session.

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use pokedex::api::PokeApiClient;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::repl::{run_repl, Session};

/// Sends log output to stderr so it never interleaves with REPL output on stdout
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(config.log_filter());
    tracing::debug!(?config, "starting pokedex");

    let client = PokeApiClient::new(config.client)?;
    tracing::debug!(interval = ?client.cache().interval(), "response cache started");
    let mut session = Session::new(client);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let result = run_repl(&mut session, stdin, &mut stdout).await;

    session.close().await;
    result?;

    Ok(())
}

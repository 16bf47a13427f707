//! Reel application binary - composition root.
//!
//! Wires the crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the movie catalog (bundled sample or a JSON file)
//! 3. Construct the dialog manager
//! 4. Replay a demo conversation, printing each decision as JSON
//!
//! The binary speaks structured signals, not text: natural-language
//! understanding and generation live outside this system.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use reel_core::config::ReelConfig;
use reel_core::{Slot, UserSignal};
use reel_dialog::DialogManager;
use reel_domain::MovieCatalog;

#[derive(Parser, Debug)]
#[command(name = "reel", about = "Slot-filling movie dialog manager", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a JSON movie catalog; the bundled sample is used when
    /// omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Resolve the config file path (REEL_CONFIG env, then ~/.reel/config.toml).
fn config_path(cli: &Cli) -> PathBuf {
    if let Some(path) = &cli.config {
        return path.clone();
    }
    if let Ok(p) = std::env::var("REEL_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".reel").join("config.toml");
    }
    PathBuf::from("config.toml")
}

fn load_catalog(cli: &Cli) -> Result<MovieCatalog, Box<dyn std::error::Error>> {
    match &cli.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let catalog = MovieCatalog::from_json(&json)?;
            tracing::info!(path = %path.display(), movies = catalog.len(), "Catalog loaded");
            Ok(catalog)
        }
        None => {
            let catalog = MovieCatalog::sample();
            tracing::info!(movies = catalog.len(), "Bundled sample catalog in use");
            Ok(catalog)
        }
    }
}

/// A short scripted conversation exercising the main dialog paths.
fn demo_script() -> Vec<(&'static str, Vec<UserSignal>)> {
    vec![
        ("(user opens the app)", vec![]),
        (
            "an action movie with Bruce Willis from 1998",
            vec![
                UserSignal::inform(Slot::Genres, "action"),
                UserSignal::inform(Slot::Cast, "Bruce Willis"),
                UserSignal::inform(Slot::ReleaseYear, "1998"),
            ],
        ),
        (
            "the one about the asteroid",
            vec![UserSignal::inform(Slot::Id, "95")],
        ),
        (
            "what's it about?",
            vec![UserSignal::request(Slot::Overview)],
        ),
        (
            "something else please",
            vec![UserSignal::request_alternatives()],
        ),
        ("thanks!", vec![UserSignal::thanks()]),
        ("no, that's all", vec![UserSignal::deny()]),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config first: its log level is the tracing fallback.
    let config_file = config_path(&cli);
    let config = ReelConfig::load_or_default(&config_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.general.log_level)
            }),
        )
        .init();

    tracing::info!("Starting Reel v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Catalog + dialog manager.
    let catalog = load_catalog(&cli)?;
    let manager = DialogManager::new(config, Arc::new(catalog));

    // Demo conversation.
    let session = manager.start_session()?;
    println!("session: {session}");
    for (utterance, signals) in demo_script() {
        let decision = manager.handle_turn(session, &signals)?;
        println!("user  > {utterance}");
        println!("system> {}", serde_json::to_string(&decision)?);
    }

    Ok(())
}

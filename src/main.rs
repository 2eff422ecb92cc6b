use crate::{
    config::{load_config, Config, VERSION},
    database::DatabaseConnection,
    services::{
        analyzer::MatchAnalyzer,
        backfill,
        provider::{OpenDotaClient, SharedProvider},
    },
};
use axum::Extension;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};

mod config;
mod database;
mod logging;
mod middleware;
mod routes;
mod services;
mod utils;

#[derive(Parser)]
#[command(version, about = "Dota 2 hero counters, builds and match analysis server")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Runs the HTTP server (default)
    Serve,
    /// Recreates the database tables and seeds the heroes from the
    /// stats provider
    InitDb,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load configuration
    let config = load_config().unwrap_or_default();

    // Initialize logging
    logging::setup(config.logging);

    info!("Starting Dota Counters v{}", VERSION);

    let db = match database::init(&config.database).await {
        Ok(value) => value,
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    let provider: SharedProvider = Arc::new(OpenDotaClient::new(&config.provider.base_url));

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db, provider).await,
        Command::InitDb => init_db(db, provider).await,
    }
}

/// Wipes the database and seeds the heroes, the empty schema is left
/// in place when the heroes could not be retrieved
async fn init_db(db: DatabaseConnection, provider: SharedProvider) {
    if let Err(err) = database::reset(&db).await {
        error!("Failed to reset database: {}", err);
        return;
    }

    match backfill::seed_heroes(&db, provider.as_ref()).await {
        Ok(Some(_)) => info!("Database initialized"),
        Ok(None) => error!("Failed to fetch heroes data"),
        Err(err) => error!("Failed to store heroes: {}", err),
    }
}

/// Starts the HTTP server running until CTRL+C is pressed
async fn serve(config: Config, db: DatabaseConnection, provider: SharedProvider) {
    let addr = SocketAddr::new(config.host, config.port);

    let router = routes::router()
        .layer(Extension(db))
        .layer(Extension(provider))
        .layer(Extension(Arc::new(MatchAnalyzer::default())));

    let listener = match TcpListener::bind(addr).await {
        Ok(value) => value,
        Err(err) => {
            error!("Failed to bind HTTP server on {}: {:?}", addr, err);
            return;
        }
    };

    info!("Started HTTP server on {}", addr);

    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(async {
            _ = signal::ctrl_c().await;
        })
        .await
    {
        error!("Error within HTTP server: {:?}", err);
    }

    info!("Server stopped");
}

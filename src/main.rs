mod catalog;
mod config;
mod dashboard;
mod db;
mod error;
mod export;
mod feed;
mod handlers;
mod models;
mod postcodes;
mod tasks;
mod thai_time;
mod voting;
mod wizard;

use catalog::Catalog;
use config::Config;
use db::{Database, VoteStore};
use feed::VoteFeed;
use handlers::AppState;
use log::{error, info, warn};
use postcodes::PostcodeTable;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // Initialize database
    let store: Arc<dyn VoteStore> = match Database::connect(&config.database_url, 5).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    let postcodes = match PostcodeTable::load(config.postcode_table.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load postcode table: {}", e);
            return;
        }
    };

    let feed = Arc::new(VoteFeed::new(Arc::clone(&store), config.snapshot_limit));
    if let Err(e) = feed.refresh().await {
        // Dashboards report "loading" until the background task gets through
        warn!("Initial snapshot failed: {}", e);
    }

    // --- Start Background Task for Snapshot Refresh ---
    let feed_clone = Arc::clone(&feed);
    let every = config.feed_interval;
    tokio::spawn(async move {
        tasks::snapshot_refresher::refresh_snapshots_task(feed_clone, every).await;
    });

    let state = Arc::new(AppState::new(Catalog::builtin(), postcodes, store, feed));

    let state_clone = Arc::clone(&state);
    let idle = config.session_idle;
    tokio::spawn(async move {
        tasks::session_sweeper::sweep_idle_sessions_task(state_clone, idle).await;
    });

    let app = handlers::router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind, e);
            return;
        }
    };
    info!("Policy survey listening on http://{}", config.bind);

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutting down"),
            Err(e) => {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    if let Err(why) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        error!("Server error: {:?}", why);
    }
}

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use school_activities::config::AppConfig;
use school_activities::database::ActivityStore;
use school_activities::web::build_router;

#[tokio::main]
async fn main() {
    // Optional .env file
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_activities=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // 2. Activity registry
    let store = match ActivityStore::seeded() {
        Ok(store) => store,
        Err(e) => {
            error!("Invalid activity seed data: {e}");
            std::process::exit(1);
        }
    };
    let activity_count = store.len().await;
    info!(activities = activity_count, "activity registry ready");

    // 3. Router
    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; /static will return 404",
            config.static_dir.display()
        );
    }
    let app = build_router(store, &config.static_dir);

    // 4. Listener (with fallback port)
    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Cannot parse {}:{}: {e}", config.host, config.port);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let Some(fallback) = config.fallback_addr() else {
                error!("Failed to bind {addr}: {e}");
                std::process::exit(1);
            };
            warn!("Failed to bind {addr}: {e}. Trying fallback {fallback}");
            match TcpListener::bind(fallback).await {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to bind fallback {fallback}: {e}");
                    std::process::exit(1);
                }
            }
        }
    };

    match listener.local_addr() {
        Ok(bound) => info!("Server running on http://{bound}"),
        Err(e) => warn!("Server running, local address unavailable: {e}"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
    }
}

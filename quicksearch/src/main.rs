#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use quicksearch::app::{self, AppState, seed::generate_users};
use quicksearch::config::ServerConfig;
use quicksearch::mapping::PropertyMapRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quicksearch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: listen_port={}, seed_users={}, seed={}, prefixes={}/{}/{}",
        config.listen_port,
        config.seed_users,
        config.seed,
        config.prefixes.page,
        config.prefixes.filter,
        config.prefixes.sort
    );

    // Property maps are registered once, before any request can remap.
    let registry = Arc::new(PropertyMapRegistry::new());
    if let Err(e) = registry.initialize(app::configure_maps) {
        tracing::error!("Failed to initialize property maps: {e}");
        std::process::exit(1);
    }

    let users = generate_users(config.seed, config.seed_users);
    tracing::info!("Generated {} users", users.len());

    let state = AppState::new(users, registry);
    let app = app::router(state, config.prefixes);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}

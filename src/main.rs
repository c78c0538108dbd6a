use std::net::SocketAddr;
use std::sync::Arc;

use inventory_api::clerk_auth::ClerkTokenVerifier;
use inventory_api::config::Config;
use inventory_api::server::router;
use inventory_api::services::ItemsService;
use inventory_api::store::NotionClient;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting inventory-api server...");
    tracing::info!(
        "Notion database {} via {}",
        config.notion_database_id,
        config.notion_api_url
    );

    let store = Arc::new(NotionClient::new(config.notion_api_url.clone())?);
    let items = ItemsService::new(store, &config);

    let verifier = ClerkTokenVerifier::new(config.clerk_jwks_url.clone())?
        .with_issuer(config.clerk_issuer.clone())
        .with_authorized_parties(vec![config.frontend_url.clone()]);

    let app = router(items, Arc::new(verifier), &config.frontend_url)?;

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

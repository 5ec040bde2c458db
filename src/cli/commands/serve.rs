use clap::Args;
use tracing::info;

use crate::config::{config, AppConfig};
use crate::database::DatabaseManager;
use crate::router::app;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides CITYINFO_API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Database URL, or `memory` for the in-process store (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        config
    }
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(config().clone());
    info!("Starting CityInfo API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    let store = DatabaseManager::build_store(&config.database).await?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    info!("CityInfo API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

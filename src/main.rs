use anyhow::Context;
use local_library::config::Config;
use local_library::database::Sqlite;
use local_library::http::{AppState, HttpServer, HttpServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_new(config.log_filter())
        .with_context(|| format!("Invalid log filter {}", config.log_filter()))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(Sqlite::new(config.database_url()).await?);
    tracing::info!(database = config.database_url(), "opened catalog store");

    let state = AppState::new(Arc::clone(&store));
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    tracing::info!(addr = %http_server.local_addr()?, "listening");

    let result = http_server.run().await;
    store.close().await;
    tracing::info!("catalog store closed");
    result
}

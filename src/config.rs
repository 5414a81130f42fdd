use anyhow::Context;
use std::str::FromStr;

const DEFAULT_LOG_FILTER: &str = "local_library=info,tower_http=debug";

#[derive(Debug)]
pub struct Config {
    database_url: String,
    server_port: u16,
    log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = load_env("DATABASE_URL")?;
        let server_port = load_env("SERVER_PORT")?;
        let log_filter = match std::env::var("RUST_LOG") {
            Ok(filter) => filter,
            Err(_) => DEFAULT_LOG_FILTER.to_string(),
        };
        Ok(Self {
            database_url,
            server_port,
            log_filter,
        })
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }

    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn load_env<T>(key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let val =
        std::env::var(key).with_context(|| format!("Failed to load environment variable {key}"))?;
    val.parse::<T>()
        .with_context(|| format!("Failed to parse environment variable {key}"))
}

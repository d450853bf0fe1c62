use anyhow::Context;
use folio_db::DEFAULT_MAX_CONNECTIONS;

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled connections (default: `20`).
    pub database_max_connections: u32,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `HOST`                     | `0.0.0.0`  |
    /// | `PORT`                     | `3000`     |
    /// | `DATABASE_URL`             | (required) |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`       |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`       |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections: u32 = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            request_timeout_secs,
        })
    }
}

//! Server configuration read from the environment.

use eyre::WrapErr;
use std::{net::SocketAddr, path::PathBuf};

pub const DEFAULT_SEARCH_LIMIT_MAX: usize = 100;
pub const DEFAULT_RUNTIME_NAME: &str = "axum";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: SocketAddr,
    pub store: StoreSource,
    pub search_limit_max: usize,
    pub runtime_name: String,
}

/// Where the server reads its data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSource {
    Postgres { database_url: String },
    Fixture { path: PathBuf },
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let server_url = lookup("SERVER_URL")
            .ok_or_else(|| eyre::eyre!("Missing SERVER_URL"))?
            .parse::<SocketAddr>()
            .wrap_err("Invalid SERVER_URL")?;

        let store = match (lookup("DATABASE_URL"), lookup("FIXTURE_PATH")) {
            (Some(database_url), None) => StoreSource::Postgres { database_url },
            (None, Some(path)) => StoreSource::Fixture { path: path.into() },
            (Some(_), Some(_)) => {
                eyre::bail!("Only one of DATABASE_URL and FIXTURE_PATH may be set")
            }
            (None, None) => eyre::bail!("Missing DATABASE_URL or FIXTURE_PATH"),
        };

        let search_limit_max = match lookup("SEARCH_LIMIT_MAX") {
            Some(max) => max
                .parse::<usize>()
                .ok()
                .filter(|max| *max > 0)
                .ok_or_else(|| eyre::eyre!("Invalid SEARCH_LIMIT_MAX '{max}'"))?,
            None => DEFAULT_SEARCH_LIMIT_MAX,
        };

        let runtime_name =
            lookup("RUNTIME_NAME").unwrap_or_else(|| DEFAULT_RUNTIME_NAME.to_string());

        Ok(Self {
            server_url,
            store,
            search_limit_max,
            runtime_name,
        })
    }
}

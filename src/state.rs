use thiserror::Error;
use tracing::info;

use crate::backend::OllamaClient;
use crate::cache::{CacheError, RedisStore};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::health::{Reachability, probe};

/// Preconditions that must hold before anything is dispatched.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("ollama is not running at {0}")]
    BackendUnreachable(String),
    #[error("ollama at {url} answered with status {status}")]
    BackendUnhealthy { url: String, status: u16 },
    #[error("can not connect to redis at {addr}: {source}")]
    CacheStore {
        addr: String,
        #[source]
        source: CacheError,
    },
}

// Probe ollama first, then open the one redis connection for this process
pub async fn start(config: &Config) -> Result<Dispatcher<RedisStore>, StartupError> {
    let client = reqwest::Client::new();
    let base_url = &config.backend.base_url;

    match probe(&client, base_url).await {
        Reachability::Reachable { banner } => {
            info!(url = %base_url, banner = %banner.trim(), "ollama reachable");
        }
        Reachability::Unhealthy { status } => {
            return Err(StartupError::BackendUnhealthy {
                url: base_url.clone(),
                status,
            });
        }
        Reachability::Unreachable => {
            return Err(StartupError::BackendUnreachable(base_url.clone()));
        }
    }

    let store = RedisStore::connect(&config.redis)
        .await
        .map_err(|source| StartupError::CacheStore {
            addr: config.redis.addr(),
            source,
        })?;
    info!(addr = %config.redis.addr(), db = store.db(), "redis connected");

    let backend = OllamaClient::new(client, config.backend.clone());
    Ok(Dispatcher::new(store, backend))
}

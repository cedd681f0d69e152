use std::fmt;

use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tracing::debug;

use crate::config::RedisConfig;

/// Cache key for a (model, prompt) pair.
///
/// Both parts are lowercased so prompts differing only in case share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(model: &str, prompt: &str) -> Self {
        Self(format!(
            "{}:prompt:{}",
            model.to_lowercase(),
            prompt.to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    /// Store could not be reached or the command did not complete
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Unavailable(e.to_string())
    }
}

/// Key-value storage for response text. Entries never expire.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` is a miss, `Err` means the store itself failed.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Store or overwrite, no TTL attached.
    async fn set(&self, key: &CacheKey, value: &str) -> Result<(), CacheError>;
}

// Redis-backed store, one connection per process
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    db: u8,
}

impl RedisStore {
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url().as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        debug!(addr = %config.addr(), db = config.db, "redis connection opened");
        Ok(Self {
            conn,
            db: config.db,
        })
    }

    pub fn db(&self) -> u8 {
        self.db
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        // multiplexed handles are cheap to clone and share the socket
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key.as_str()).await?;
        Ok(value)
    }

    async fn set(&self, key: &CacheKey, value: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key.as_str(), value).await?;
        Ok(())
    }
}

// In-process store with the same semantics as redis
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn peek(&self, key: &CacheKey) -> Option<String> {
        self.entries.get(key.as_str()).map(|v| v.value().clone())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &CacheKey, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }
}

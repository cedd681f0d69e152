//! Cache-or-compute path for a single prompt.
//!
//! With the cache enabled a stored response is returned as-is, without touching the
//! backend. On a miss, or when the cache is bypassed, Ollama is called once and its
//! response overwrites whatever was stored under the key.

use thiserror::Error;
use tracing::{debug, info};

use crate::backend::{BackendError, OllamaClient};
use crate::cache::{CacheError, CacheKey, CacheStore};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_WRITE_FAILURES, DISPATCH_TOTAL};
use crate::models::{Dispatched, GenerateResponse, Source};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("can not read from cache: {0}")]
    CacheRead(#[source] CacheError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Ollama answered but the response could not be stored.
    /// The response is kept so the caller can still use it.
    #[error("can not set value in cache for {key}: {source}")]
    CacheWrite {
        key: CacheKey,
        response: GenerateResponse,
        #[source]
        source: CacheError,
    },
}

pub struct Dispatcher<S> {
    store: S,
    backend: OllamaClient,
}

impl<S: CacheStore> Dispatcher<S> {
    pub fn new(store: S, backend: OllamaClient) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn dispatch(
        &self,
        prompt: &str,
        model: &str,
        use_cache: bool,
    ) -> Result<Dispatched, DispatchError> {
        DISPATCH_TOTAL.inc();
        let key = CacheKey::new(model, prompt);

        if use_cache {
            match self.store.get(&key).await.map_err(DispatchError::CacheRead)? {
                Some(text) => {
                    CACHE_HITS.inc();
                    debug!(%key, "cache hit");
                    return Ok(Dispatched {
                        response: GenerateResponse::from_cached(model, text),
                        source: Source::Cache,
                    });
                }
                None => {
                    CACHE_MISSES.inc();
                    debug!(%key, "cache miss, calling ollama");
                }
            }
        } else {
            debug!(%key, "cache bypassed, calling ollama");
        }

        let response = self.backend.generate(model, prompt).await?;

        if let Err(source) = self.store.set(&key, &response.response).await {
            CACHE_WRITE_FAILURES.inc();
            return Err(DispatchError::CacheWrite {
                key,
                response,
                source,
            });
        }
        info!(%key, bytes = response.response.len(), "cached ollama response");

        Ok(Dispatched {
            response,
            source: Source::Backend,
        })
    }
}

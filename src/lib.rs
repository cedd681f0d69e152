pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod health;
pub mod metrics;
pub mod models;
pub mod state;

pub use cache::{CacheError, CacheKey, CacheStore, MemoryStore, RedisStore};
pub use config::{Args, Config};
pub use dispatcher::{DispatchError, Dispatcher};
pub use models::{Dispatched, GenerateResponse, Source};

//! Session history backends for chatrelay.
//!
//! The in-memory map is always available; the Redis backend (feature
//! `redis`, on by default) adds cross-restart persistence with a 24-hour
//! expiry. Backend unavailability never surfaces to callers — history
//! degrades to the in-memory map instead.

pub mod in_memory;

#[cfg(feature = "redis")]
pub mod redis_backend;

pub use in_memory::InMemoryHistory;

#[cfg(feature = "redis")]
pub use redis_backend::RedisHistory;

use chatrelay_core::HistoryStore;
use std::sync::Arc;

/// Build the history backend selected by configuration.
///
/// A configured Redis URL that cannot be reached at startup logs a warning
/// and degrades to the in-memory backend; it never fails the boot.
pub async fn build_from_config(config: &chatrelay_config::AppConfig) -> Arc<dyn HistoryStore> {
    #[cfg(feature = "redis")]
    if let Some(url) = &config.redis_url {
        match RedisHistory::connect(url).await {
            Ok(store) => {
                tracing::info!("Session history persisted to Redis");
                return Arc::new(store);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable — falling back to in-memory history");
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    if config.redis_url.is_some() {
        tracing::warn!("redis_url set but the redis feature is disabled — using in-memory history");
    }

    Arc::new(InMemoryHistory::new())
}

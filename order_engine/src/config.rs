use std::time::Duration;

use log::*;
use order_common::helpers::{parse_boolean_flag, parse_env_var};

use crate::cache::CacheConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/orders.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;

/// Engine settings, normally read from `ORD_*` environment variables.
#[derive(Clone, Debug)]
pub struct OrdersConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Capacity of each event hook channel. Publishers wait when a channel is full.
    pub event_buffer_size: usize,
    pub cache: CacheConfig,
    /// Create the SQLite database and apply migrations on connect
    pub auto_migrate: bool,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            cache: CacheConfig::default(),
            auto_migrate: false,
        }
    }
}

impl OrdersConfig {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let database_url = std::env::var("ORD_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ORD_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            defaults.database_url.clone()
        });
        let max_connections = env_or("ORD_MAX_CONNECTIONS", defaults.max_connections);
        let event_buffer_size = env_or("ORD_EVENT_BUFFER_SIZE", defaults.event_buffer_size);
        let stale_secs = env_or("ORD_CACHE_STALE_SECS", defaults.cache.stale_time.as_secs());
        let cache = defaults.cache.clone().with_stale_time(Duration::from_secs(stale_secs));
        let auto_migrate = parse_boolean_flag(std::env::var("ORD_AUTO_MIGRATE").ok(), defaults.auto_migrate);
        Self { database_url, max_connections, event_buffer_size, cache, auto_migrate }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match parse_env_var::<T>(key) {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(e) => {
            error!("🪛️ {e} Using the default, {default}, instead.");
            default
        },
    }
}

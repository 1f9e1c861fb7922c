//! # Client-side query cache
//!
//! A small, process-wide cache of query results, addressed by a logical [`QueryKey`]. It exists to coordinate UI
//! refreshes: reads within the freshness window are served from memory, and mutations mark entries stale with
//! [`QueryCache::invalidate`], which also tells every subscriber that the key needs a refetch.
//!
//! The cache is an explicit object. Create it once, wrap it in an `Arc`, and hand it to everything that reads or
//! invalidates queries.
mod query_cache;
mod query_state;

pub use query_cache::{CacheConfig, QueryCache};
pub use query_state::{QueryKey, QueryState, ORDERS_QUERY_KEY};

//! Main storekit crate: thin typed wrappers over document and key-value stores.
//!
//! This crate is the entry point for users of storekit. It re-exports the core types
//! from the sub-crates, gives access to the storage backends and ships the pieces an
//! application needs around them:
//!
//! - **Document store** - insert, find (as a lazy stream) and `$set`-style updates
//! - **School helpers** ([`schools`]) - list, insert, filter by topic and retag schools
//! - **Cache** - values stored under random keys, every store counted and recorded
//! - **Instrumentation** - call counters, call history and replay
//! - **Configuration** ([`config`]) and **logging** ([`telemetry`]) for binaries
//!
//! # Quick Start
//!
//! ```ignore
//! use storekit::{prelude::*, memory::{InMemoryDocumentStore, InMemoryKv}, schools::*};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> StoreResult<()> {
//!     let store = DocumentStore::new(InMemoryDocumentStore::builder().build().await?);
//!     let schools = store.collection(School::collection_name());
//!
//!     insert_document(&schools, bson::doc! { "name": "Holberton school", "topics": [] }).await?;
//!     update_topics(&schools, "Holberton school", ["Sys admin", "AI"]).await?;
//!
//!     let ai: Vec<_> = find_by_topic(&schools, "AI").await?.try_collect().await?;
//!     println!("{:?}", ai);
//!
//!     let cache = Cache::new(InMemoryKv::builder().build().await?);
//!     let key = cache.store(b"bar".as_slice()).await?;
//!     replay(&cache.store_operation(), &mut std::io::stdout()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory document and key-value stores for development and testing
//! - [`mongodb`] - MongoDB document store (requires the `mongodb` feature)
//! - [`redis`] - Redis key-value store (requires the `redis` feature)

pub mod config;
pub mod prelude;
pub mod schools;
pub mod telemetry;

pub use storekit_core::{backend, cache, collection, document, error, instrument, query, store, value};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use storekit_memory::{InMemoryDocumentStore, InMemoryDocumentStoreBuilder, InMemoryKv, InMemoryKvBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use storekit_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}

/// Redis key-value backend implementations.
///
/// This module is only available when the `redis` feature is enabled.
#[cfg(feature = "redis")]
pub mod redis {
    pub use storekit_redis::{RedisKv, RedisKvBuilder};
}

//! Redis backend for storekit.
//!
//! [`RedisKv`] implements `KvBackend` on top of a Redis connection manager, so the cache
//! and the call instrumentation can run against a real server. Enable it with the `redis`
//! feature of the `storekit` crate.
//!
//! # Example
//!
//! ```ignore
//! use storekit::{backend::BackendBuilder, cache::Cache, redis::RedisKv};
//!
//! let kv = RedisKv::builder("redis://localhost:6379").build().await?;
//! let cache = Cache::fresh(kv).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as storekit_redis;

mod error;
pub mod kv;

pub use error::map_redis_error;
pub use kv::{RedisKv, RedisKvBuilder};

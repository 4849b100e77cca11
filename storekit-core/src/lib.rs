//! Thin typed wrappers over document and key-value stores.
//!
//! This crate is the core of the storekit project and provides:
//!
//! - **Errors** ([`error`]) - One error type and result alias for every store operation
//! - **Documents** ([`document`]) - Identifiers, the typed [`document::Document`] trait and field-map conversion
//! - **Queries** ([`query`]) - Filter expressions, queries and field updates
//! - **Backends** ([`backend`]) - Traits for document and key-value storage backends
//! - **Collections and stores** ([`collection`], [`store`]) - Handles for working with documents
//! - **Cache** ([`cache`], [`value`]) - Values stored under random keys, with typed reads
//! - **Instrumentation** ([`instrument`]) - Call counting, call history and replay
//!
//! # Example
//!
//! ```ignore
//! use storekit::{cache::Cache, memory::InMemoryKv};
//!
//! let cache = Cache::new(InMemoryKv::new());
//! let key = cache.store(42).await?;
//! assert_eq!(cache.get_int(&key).await?, Some(42));
//! ```

#[allow(unused_extern_crates)]
extern crate self as storekit_core;

pub mod backend;
pub mod cache;
pub mod collection;
pub mod document;
pub mod error;
pub mod instrument;
pub mod query;
pub mod store;
pub mod value;

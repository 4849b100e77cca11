//! In-memory storage backends for storekit.
//!
//! This crate provides thread-safe, in-memory implementations of both backend traits:
//!
//! - [`InMemoryDocumentStore`] implements `DocumentBackend` with filtering in insertion order
//! - [`InMemoryKv`] implements `KvBackend` with values, lists and atomic increments
//!
//! Both use async-aware read-write locks and are meant for development and tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use storekit::{prelude::*, memory::{InMemoryDocumentStore, InMemoryKv}};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryDocumentStore::builder().build().await?);
//!     store.collection("school").insert_one(doc! { "name": "Holberton school" }).await?;
//!
//!     let cache = Cache::new(InMemoryKv::builder().build().await?);
//!     let key = cache.store("hello").await?;
//!     assert_eq!(cache.get_str(&key).await?, Some("hello".to_string()));
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as storekit_memory;

pub mod evaluator;
pub mod kv;
pub mod store;

pub use kv::{InMemoryKv, InMemoryKvBuilder};
pub use store::{InMemoryDocumentStore, InMemoryDocumentStoreBuilder};

//! MongoDB backend for storekit.
//!
//! This crate provides [`MongoDbStore`], a `DocumentBackend` that delegates to a MongoDB
//! database through the official async driver. Filters are translated into MongoDB query
//! documents, and updates are sent as `$set` operations.
//!
//! To use this backend, enable the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! storekit = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use storekit::{backend::BackendBuilder, mongodb::MongoDbStore, store::DocumentStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MongoDbStore::builder("mongodb://localhost:27017", "my_db")
//!         .build()
//!         .await?;
//!     let store = DocumentStore::new(backend);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as storekit_mongodb;

pub(crate) mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};

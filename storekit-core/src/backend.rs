//! Storage backend abstractions.
//!
//! Two families of backends are supported:
//!
//! - [`DocumentBackend`]: schema-less documents grouped into named collections
//! - [`KvBackend`]: opaque byte values and byte lists under string keys, with atomic increment
//!
//! Implementations only delegate to their store; persistence, querying and consistency
//! semantics are the store's own. Every backend is built through a [`BackendBuilder`].
//!
//! # Example
//!
//! ```ignore
//! use storekit::backend::{BackendBuilder, DocumentBackend};
//! use storekit::memory::InMemoryDocumentStore;
//! use bson::doc;
//!
//! let backend = InMemoryDocumentStore::builder().build().await?;
//! let id = backend
//!     .insert_document("school", doc! { "name": "Holberton school", "topics": [] })
//!     .await?;
//! ```

use async_trait::async_trait;
use bson::Document as Fields;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{
    document::DocumentId,
    error::StoreResult,
    query::{Expr, Query, Update, UpdateOutcome},
};

/// A lazy sequence of documents produced by a find operation.
///
/// Documents are pulled from the backend as the stream is polled; order is defined by
/// the store.
pub type DocumentStream = BoxStream<'static, StoreResult<Fields>>;

/// Abstract interface for document storage backends.
///
/// All implementations must be `Send + Sync` so a single backend can be shared between tasks.
#[async_trait]
pub trait DocumentBackend: Send + Sync + Debug {
    /// Inserts one document into a collection and returns its identifier.
    ///
    /// If `fields` carries an `_id` it is used as the identifier; otherwise the store
    /// assigns one. The collection is created on first insert. No validation of field
    /// contents is performed.
    async fn insert_document(&self, collection: &str, fields: Fields)
    -> StoreResult<DocumentId>;

    /// Finds the documents of a collection matching a query.
    ///
    /// A missing collection yields an empty stream. Returned documents include `_id`.
    async fn find_documents(&self, collection: &str, query: Query)
    -> StoreResult<DocumentStream>;

    /// Overwrites fields on every document matching `filter`.
    ///
    /// `None` as filter matches every document. Returns how many documents matched and
    /// how many were actually changed.
    async fn update_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
        update: Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> DocumentBackend for &B
where
    B: DocumentBackend,
{
    async fn insert_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> StoreResult<DocumentId> {
        (*self).insert_document(collection, fields).await
    }

    async fn find_documents(
        &self,
        collection: &str,
        query: Query,
    ) -> StoreResult<DocumentStream> {
        (*self).find_documents(collection, query).await
    }

    async fn update_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
        update: Update,
    ) -> StoreResult<UpdateOutcome> {
        (*self)
            .update_documents(collection, filter, update)
            .await
    }
}

/// Abstract interface for key-value storage backends.
///
/// The operations mirror the Redis primitives the cache and the instrumentation need.
/// A key holds either a byte value or a list of byte values; using a key with an
/// operation of the other kind fails with [`StoreError::WrongType`](crate::error::StoreError::WrongType).
#[async_trait]
pub trait KvBackend: Send + Sync + Debug {
    /// Reads the value stored under `key`, or `None` if the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Atomically increments the integer stored under `key` and returns the new value.
    ///
    /// A missing key counts as `0`.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Appends `value` to the list under `key` and returns the new list length.
    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<usize>;

    /// Returns the list elements between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end (`-1` is the last element). A missing key
    /// yields an empty list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<Vec<u8>>>;

    /// Appends `input` to the list under `inputs_key` and `output` to the list under
    /// `outputs_key` as one atomic step, and returns the new length of the inputs list.
    ///
    /// Either both lists grow or neither does. Fails with `WrongType` if either key holds
    /// a plain value.
    async fn record_call(
        &self,
        inputs_key: &str,
        outputs_key: &str,
        input: &[u8],
        output: &[u8],
    ) -> StoreResult<usize>;

    /// Removes every key of the active namespace.
    async fn flush_db(&self) -> StoreResult<()>;

    /// Cleanly shuts down the backend. The default implementation is a no-op.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> KvBackend for &B
where
    B: KvBackend,
{
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (*self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (*self).set(key, value).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        (*self).incr(key).await
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<usize> {
        (*self).rpush(key, value).await
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<Vec<u8>>> {
        (*self).lrange(key, start, stop).await
    }

    async fn record_call(
        &self,
        inputs_key: &str,
        outputs_key: &str,
        input: &[u8],
        output: &[u8],
    ) -> StoreResult<usize> {
        (*self)
            .record_call(inputs_key, outputs_key, input, output)
            .await
    }

    async fn flush_db(&self) -> StoreResult<()> {
        (*self).flush_db().await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait BackendBuilder {
    type Backend;

    async fn build(self) -> StoreResult<Self::Backend>;
}

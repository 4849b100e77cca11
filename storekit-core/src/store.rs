//! Main document store interface.
//!
//! [`DocumentStore`] owns a [`DocumentBackend`] and hands out collection handles borrowing it.
//!
//! ```ignore
//! use storekit::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let schools = store.typed_collection::<School>();
//! ```

use tracing::info;

use crate::{
    backend::DocumentBackend,
    collection::{Collection, TypedCollection},
    document::Document,
    error::StoreResult,
};

/// A document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: DocumentBackend> {
    backend: B,
}

impl<B: DocumentBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Gets an untyped collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown().await?;
        info!("document store shut down");

        Ok(())
    }
}

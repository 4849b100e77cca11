//! Collection handles for document store operations.
//!
//! - [`Collection`] works with raw BSON field maps
//! - [`TypedCollection`] works with a concrete [`Document`] type
//!
//! Both borrow the store's backend and carry only the collection name.
//!
//! # Example
//!
//! ```ignore
//! use storekit::{prelude::*, memory::InMemoryDocumentStore};
//! use futures::TryStreamExt;
//! use bson::doc;
//!
//! let store = DocumentStore::new(InMemoryDocumentStore::new());
//! let schools = store.collection("school");
//!
//! schools.insert_one(doc! { "name": "Holberton school", "topics": [] }).await?;
//! let all: Vec<_> = schools.find_all().await?.try_collect().await?;
//! ```

use bson::Document as Fields;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use std::marker::PhantomData;

use crate::{
    backend::{DocumentBackend, DocumentStream},
    document::{Document, DocumentExt, DocumentId},
    error::StoreResult,
    query::{Expr, Query, Update, UpdateOutcome},
};

/// An untyped collection with a reference to a storage backend.
#[derive(Debug)]
pub struct Collection<'a, B: DocumentBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: DocumentBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts one document and returns its store-assigned identifier.
    pub async fn insert_one(&self, fields: Fields) -> StoreResult<DocumentId> {
        self.backend
            .insert_document(&self.name, fields)
            .await
    }

    /// Finds the documents matching a query.
    pub async fn find(&self, query: Query) -> StoreResult<DocumentStream> {
        self.backend
            .find_documents(&self.name, query)
            .await
    }

    /// Finds every document in the collection, in store-defined order.
    pub async fn find_all(&self) -> StoreResult<DocumentStream> {
        self.find(Query::new()).await
    }

    /// Overwrites fields on every document matching `filter`.
    pub async fn update_many(&self, filter: Expr, update: Update) -> StoreResult<UpdateOutcome> {
        self.backend
            .update_documents(&self.name, Some(filter), update)
            .await
    }
}

/// A lazy sequence of typed documents.
pub type TypedDocumentStream<D> = BoxStream<'static, StoreResult<D>>;

#[derive(Debug)]
pub struct TypedCollection<'a, B: DocumentBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: DocumentBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an untyped view of the same collection.
    pub fn untyped(&self) -> Collection<'a, B> {
        Collection::new(self.name.clone(), self.backend)
    }

    /// Inserts one document and returns its store-assigned identifier.
    pub async fn insert_one(&self, document: &D) -> StoreResult<DocumentId> {
        self.backend
            .insert_document(&self.name, document.to_fields()?)
            .await
    }

    /// Finds the documents matching a query, deserialized as `D`.
    pub async fn find(&self, query: Query) -> StoreResult<TypedDocumentStream<D>> {
        Ok(self
            .backend
            .find_documents(&self.name, query)
            .await?
            .and_then(|fields| async move { D::from_fields(fields) })
            .boxed())
    }

    /// Finds every document in the collection.
    pub async fn find_all(&self) -> StoreResult<TypedDocumentStream<D>> {
        self.find(Query::new()).await
    }

    /// Finds the documents matching a query and collects them.
    pub async fn find_vec(&self, query: Query) -> StoreResult<Vec<D>> {
        self.find(query)
            .await?
            .try_collect()
            .await
    }

    /// Overwrites fields on every document matching `filter`.
    pub async fn update_many(&self, filter: Expr, update: Update) -> StoreResult<UpdateOutcome> {
        self.backend
            .update_documents(&self.name, Some(filter), update)
            .await
    }
}

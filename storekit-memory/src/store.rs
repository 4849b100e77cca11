//! In-memory document storage.
//!
//! Documents are kept as BSON field maps in insertion order, per collection, behind an
//! async-aware read-write lock.

use async_trait::async_trait;
use bson::{Bson, Document as Fields, oid::ObjectId};
use futures::{StreamExt, stream};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use storekit_core::{
    backend::{BackendBuilder, DocumentBackend, DocumentStream},
    document::{DocumentId, ID_FIELD},
    error::{StoreError, StoreResult},
    query::{Expr, Query, Update, UpdateOutcome},
};

use crate::evaluator::DocumentEvaluator;

type CollectionDocs = Vec<Fields>;
type StoreMap = HashMap<String, CollectionDocs>;

/// Thread-safe in-memory document storage backend.
///
/// Cloning an `InMemoryDocumentStore` shares the underlying data. Queries scan the whole
/// collection; there is no indexing. Documents are returned in insertion order.
///
/// # Example
///
/// ```ignore
/// use storekit_memory::InMemoryDocumentStore;
/// use storekit::backend::DocumentBackend;
/// use bson::doc;
///
/// let store = InMemoryDocumentStore::new();
/// let id = store
///     .insert_document("school", doc! { "name": "Holberton school" })
///     .await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryDocumentStore {
    /// collection name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self { store: Arc::new(RwLock::new(StoreMap::new())) }
    }

    /// Creates a builder for an `InMemoryDocumentStore`.
    pub fn builder() -> InMemoryDocumentStoreBuilder {
        InMemoryDocumentStoreBuilder
    }
}

#[async_trait]
impl DocumentBackend for InMemoryDocumentStore {
    async fn insert_document(&self, collection: &str, mut fields: Fields) -> StoreResult<DocumentId> {
        let mut store = self.store.write().await;
        let docs = store
            .entry(collection.to_string())
            .or_default();

        let id = match fields.get(ID_FIELD).cloned() {
            Some(id) => id,
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                // _id leads the document, as MongoDB stores it
                let mut with_id = Fields::new();
                with_id.insert(ID_FIELD, id.clone());
                for (field, value) in fields {
                    with_id.insert(field, value);
                }
                fields = with_id;
                id
            }
        };

        if docs.iter().any(|doc| doc.get(ID_FIELD) == Some(&id)) {
            return Err(StoreError::DocumentAlreadyExists(
                DocumentId::new(id).to_string(),
                collection.to_string(),
            ));
        }

        docs.push(fields);
        debug!(collection, id = %id, "document inserted");

        Ok(DocumentId::new(id))
    }

    async fn find_documents(&self, collection: &str, query: Query) -> StoreResult<DocumentStream> {
        let store = self.store.read().await;
        let Some(docs) = store.get(collection) else {
            return Ok(stream::empty().boxed());
        };

        let mut matched = Vec::new();
        for doc in docs {
            if DocumentEvaluator::matches(doc, query.filter.as_ref())? {
                matched.push(Ok(doc.clone()));
            }
        }

        Ok(stream::iter(matched).boxed())
    }

    async fn update_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
        update: Update,
    ) -> StoreResult<UpdateOutcome> {
        if update.fields().contains_key(ID_FIELD) {
            return Err(StoreError::InvalidDocument("_id cannot be updated".to_string()));
        }

        let mut store = self.store.write().await;
        let Some(docs) = store.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };

        let mut outcome = UpdateOutcome::default();
        for doc in docs.iter_mut() {
            if !DocumentEvaluator::matches(doc, filter.as_ref())? {
                continue;
            }
            outcome.matched += 1;

            let mut changed = false;
            for (field, value) in update.fields() {
                if doc.get(field) != Some(value) {
                    doc.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                outcome.modified += 1;
            }
        }

        debug!(collection, matched = outcome.matched, modified = outcome.modified, "documents updated");

        Ok(outcome)
    }
}

/// Builder for [`InMemoryDocumentStore`]. Building always succeeds.
#[derive(Default)]
pub struct InMemoryDocumentStoreBuilder;

#[async_trait]
impl BackendBuilder for InMemoryDocumentStoreBuilder {
    type Backend = InMemoryDocumentStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryDocumentStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::TryStreamExt;
    use storekit_core::query::Filter;

    async fn collect(stream: DocumentStream) -> Vec<Fields> {
        stream.try_collect().await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_object_id_first() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_document("school", doc! { "name": "Holberton school" })
            .await
            .unwrap();

        let docs = collect(store.find_documents("school", Query::new()).await.unwrap()).await;
        assert_eq!(docs.len(), 1);
        assert!(id.as_object_id().is_some());
        assert_eq!(docs[0].keys().next().map(String::as_str), Some("_id"));
        assert_eq!(docs[0].get("_id"), Some(id.as_bson()));
    }

    #[tokio::test]
    async fn test_insert_keeps_caller_id_and_rejects_duplicates() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_document("school", doc! { "_id": "hbtn", "name": "Holberton" })
            .await
            .unwrap();
        assert_eq!(id.to_string(), "hbtn");

        let again = store
            .insert_document("school", doc! { "_id": "hbtn", "name": "Other" })
            .await;
        assert!(matches!(again, Err(StoreError::DocumentAlreadyExists(_, _))));
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        let docs = collect(store.find_documents("nope", Query::new()).await.unwrap()).await;
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_update_counts_matched_and_modified() {
        let store = InMemoryDocumentStore::new();
        store.insert_document("school", doc! { "name": "A", "topics": ["x"] }).await.unwrap();
        store.insert_document("school", doc! { "name": "A", "topics": [] }).await.unwrap();
        store.insert_document("school", doc! { "name": "B", "topics": [] }).await.unwrap();

        let outcome = store
            .update_documents(
                "school",
                Some(Filter::eq("name", "A")),
                Update::set("topics", vec!["x"]),
            )
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome { matched: 2, modified: 1 });
    }

    #[tokio::test]
    async fn test_update_rejects_id() {
        let store = InMemoryDocumentStore::new();
        let result = store
            .update_documents("school", None, Update::set("_id", 1))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn test_find_filters_in_insertion_order() {
        let store = InMemoryDocumentStore::builder().build().await.unwrap();
        store.insert_document("school", doc! { "name": "B", "topics": ["AI"] }).await.unwrap();
        store.insert_document("school", doc! { "name": "C", "topics": ["C"] }).await.unwrap();
        store.insert_document("school", doc! { "name": "A", "topics": ["AI", "C"] }).await.unwrap();

        let names: Vec<_> = collect(
            store
                .find_documents("school", Query::filtered(Filter::includes("topics", "AI")))
                .await
                .unwrap(),
        )
        .await
        .into_iter()
        .map(|doc| doc.get_str("name").unwrap().to_string())
        .collect();

        assert_eq!(names, vec!["B", "A"]);
    }
}

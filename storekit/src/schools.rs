//! Helpers over a collection of schools.
//!
//! A school is a document with a `name` and a `topics` array. The helpers work on any
//! collection handle, so they apply unchanged to the in-memory store and to MongoDB.

use bson::{Document as Fields, oid::ObjectId};
use serde::{Deserialize, Serialize};

use storekit_core::{
    backend::{DocumentBackend, DocumentStream},
    collection::{Collection, TypedCollection},
    document::{Document, DocumentId},
    error::StoreResult,
    query::{Filter, Query, Update},
};

/// A school and the topics it teaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl School {
    pub fn new(name: impl Into<String>, topics: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: None,
            name: name.into(),
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }
}

impl Document for School {
    fn collection_name() -> &'static str {
        "school"
    }
}

/// Inserts one document as given and returns its identifier.
pub async fn insert_document<B: DocumentBackend>(
    collection: &Collection<'_, B>,
    fields: Fields,
) -> StoreResult<DocumentId> {
    collection.insert_one(fields).await
}

/// Inserts a school and returns its identifier.
pub async fn insert_school<B: DocumentBackend>(
    collection: &TypedCollection<'_, B, School>,
    school: &School,
) -> StoreResult<DocumentId> {
    collection.insert_one(school).await
}

/// Lists every document of the collection.
pub async fn list_all<B: DocumentBackend>(collection: &Collection<'_, B>) -> StoreResult<DocumentStream> {
    collection.find_all().await
}

/// Finds the documents whose `topics` array contains `topic` exactly.
pub async fn find_by_topic<B: DocumentBackend>(
    collection: &Collection<'_, B>,
    topic: &str,
) -> StoreResult<DocumentStream> {
    collection
        .find(Query::filtered(Filter::includes("topics", topic)))
        .await
}

/// Replaces the topics of every document named `name`.
pub async fn update_topics<B, T>(
    collection: &Collection<'_, B>,
    name: &str,
    topics: impl IntoIterator<Item = T>,
) -> StoreResult<()>
where
    B: DocumentBackend,
    T: Into<String>,
{
    let topics: Vec<String> = topics.into_iter().map(Into::into).collect();
    collection
        .update_many(Filter::eq("name", name), Update::set("topics", topics))
        .await?;

    Ok(())
}

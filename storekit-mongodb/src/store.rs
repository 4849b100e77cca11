use async_trait::async_trait;
use bson::{Document, doc};
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind},
    options::ClientOptions,
};
use tracing::{debug, info};

use storekit_core::{
    backend::{BackendBuilder, DocumentBackend, DocumentStream},
    document::DocumentId,
    error::{StoreError, StoreResult},
    query::{Expr, Query, Update, UpdateOutcome},
};

use crate::query::MongoQueryTranslator;

/// Maps driver errors, separating connectivity problems from operation failures.
pub(crate) fn map_mongo_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
            StoreError::Connection(err.to_string())
        }
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            StoreError::Serialization(err.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;
        info!(database = %self.database, "mongodb client shut down");

        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for MongoDbStore {
    async fn insert_document(&self, collection: &str, fields: Document) -> StoreResult<DocumentId> {
        let result = self
            .get_collection(collection)
            .insert_one(fields)
            .await
            .map_err(map_mongo_error)?;
        debug!(collection, id = %result.inserted_id, "document inserted");

        Ok(DocumentId::new(result.inserted_id))
    }

    async fn find_documents(&self, collection: &str, query: Query) -> StoreResult<DocumentStream> {
        let cursor = self
            .get_collection(collection)
            .find(MongoQueryTranslator::translate(query.filter.as_ref())?)
            .await
            .map_err(map_mongo_error)?;

        Ok(cursor.map_err(map_mongo_error).boxed())
    }

    async fn update_documents(
        &self,
        collection: &str,
        filter: Option<Expr>,
        update: Update,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .get_collection(collection)
            .update_many(
                MongoQueryTranslator::translate(filter.as_ref())?,
                doc! { "$set": update.fields().clone() },
            )
            .await
            .map_err(map_mongo_error)?;
        debug!(
            collection,
            matched = result.matched_count,
            modified = result.modified_count,
            "documents updated"
        );

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl BackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| StoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| StoreError::Initialization(e.to_string()))?;
        info!(database = %self.database, "mongodb client created");

        Ok(MongoDbStore::new(client, self.database))
    }
}

//! Core traits and types for document representation and serialization.
//!
//! Documents travel through the backends as plain [`bson::Document`] field maps. Typed
//! documents implement [`Document`] and convert to and from field maps with [`DocumentExt`].

use bson::{
    Bson, Document as Fields, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson,
};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

use crate::error::{StoreError, StoreResult};

/// Name of the field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// The store-assigned identifier of a document.
///
/// MongoDB assigns an [`ObjectId`] unless the inserted fields already carry an `_id`,
/// in which case that value is kept as is. The identifier is therefore kept as raw BSON.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentId(Bson);

impl DocumentId {
    /// Wraps a raw BSON identifier.
    pub fn new(id: impl Into<Bson>) -> Self {
        Self(id.into())
    }

    /// Returns the raw BSON identifier.
    pub fn as_bson(&self) -> &Bson {
        &self.0
    }

    /// Returns the identifier as an [`ObjectId`], if it is one.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        self.0.as_object_id()
    }

    /// Consumes the identifier, returning the raw BSON value.
    pub fn into_bson(self) -> Bson {
        self.0
    }
}

impl From<ObjectId> for DocumentId {
    fn from(id: ObjectId) -> Self {
        Self(Bson::ObjectId(id))
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Bson::ObjectId(oid) => write!(f, "{}", oid.to_hex()),
            Bson::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Trait for typed documents stored in a named collection.
///
/// # Example
///
/// ```ignore
/// use storekit::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct School {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub name: String,
///     pub topics: Vec<String>,
/// }
///
/// impl Document for School {
///     fn collection_name() -> &'static str {
///         "school"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Conversion between typed documents and raw field maps.
///
/// Automatically implemented for every [`Document`].
pub trait DocumentExt: Document {
    /// Serializes this document into a field map.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the type does not serialize to a map.
    fn to_fields(&self) -> StoreResult<Fields>;

    /// Deserializes a document from a field map.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the document's structure.
    fn from_fields(fields: Fields) -> StoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_fields(&self) -> StoreResult<Fields> {
        match serialize_to_bson(self)? {
            Bson::Document(fields) => Ok(fields),
            other => Err(StoreError::InvalidDocument(format!(
                "expected a document, found {:?}",
                other.element_type()
            ))),
        }
    }

    fn from_fields(fields: Fields) -> StoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(fields))?)
    }
}

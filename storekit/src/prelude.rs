//! Convenient re-exports of commonly used types from storekit.
//!
//! ```ignore
//! use storekit::prelude::*;
//! ```

pub use storekit_core::{
    backend::{BackendBuilder, DocumentBackend, DocumentStream, KvBackend},
    cache::Cache,
    collection::{Collection, TypedCollection},
    document::{Document, DocumentExt, DocumentId},
    error::{StoreError, StoreResult},
    instrument::{CallHistory, CountCalls, Instrumented, Operation, replay, replay_lines},
    query::{Expr, Filter, Query, Update, UpdateOutcome},
    store::DocumentStore,
    value::CacheValue,
};

//! Key-value cache storing values under random keys.
//!
//! [`Cache::store`] always runs through an instrumented operation chain (call history around
//! a call counter around the raw write), so every store is counted and recorded under
//! [`STORE_OPERATION`] in the same backend that holds the values.

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    backend::KvBackend,
    error::StoreResult,
    instrument::{CallHistory, CountCalls, Operation},
    value::{CacheValue, to_float, to_integer, to_text},
};

/// Qualified name the store operation is counted and recorded under.
pub const STORE_OPERATION: &str = "Cache.store";

/// The instrumented store operation of a [`Cache`].
pub type InstrumentedStore<B> = CallHistory<CountCalls<StoreValue<B>, B>, B>;

/// A cache over a key-value backend.
///
/// Cloning a `Cache` clones the backend handle, not the data.
#[derive(Debug, Clone)]
pub struct Cache<B: KvBackend + Clone> {
    backend: B,
}

impl<B: KvBackend + Clone> Cache<B> {
    /// Creates a cache over `backend`, leaving existing keys untouched.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Creates a cache over `backend` after clearing the whole active namespace.
    ///
    /// Every key in the namespace is removed, including keys written by other caches.
    pub async fn fresh(backend: B) -> StoreResult<Self> {
        backend.flush_db().await?;
        warn!("cache namespace flushed");

        Ok(Self { backend })
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the instrumented store operation, e.g. to replay its history.
    pub fn store_operation(&self) -> InstrumentedStore<B> {
        CallHistory::new(
            CountCalls::new(
                StoreValue { backend: self.backend.clone() },
                self.backend.clone(),
            ),
            self.backend.clone(),
        )
    }

    /// Stores `value` under a fresh random key and returns the key.
    pub async fn store(&self, value: impl Into<CacheValue>) -> StoreResult<String> {
        let value = value.into();
        self.store_operation().call((value,)).await
    }

    /// Reads the raw value stored under `key`, or `None` if the key does not exist.
    pub async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Reads the value stored under `key` and converts it with `convert`.
    ///
    /// `convert` is only applied when a value exists.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> StoreResult<T>,
    {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(convert(raw)?)),
            None => Ok(None),
        }
    }

    /// Reads the value stored under `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> StoreResult<Option<String>> {
        self.get_with(key, to_text).await
    }

    /// Reads the value stored under `key` as an integer.
    pub async fn get_int(&self, key: &str) -> StoreResult<Option<i64>> {
        self.get_with(key, to_integer).await
    }

    /// Reads the value stored under `key` as a floating-point number.
    pub async fn get_float(&self, key: &str) -> StoreResult<Option<f64>> {
        self.get_with(key, to_float).await
    }
}

/// The raw store operation: writes a value under a new UUID v4 key.
#[derive(Debug, Clone)]
pub struct StoreValue<B> {
    backend: B,
}

#[async_trait]
impl<B: KvBackend> Operation for StoreValue<B> {
    type Args = (CacheValue,);
    type Output = String;

    fn qualified_name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, args: Self::Args) -> StoreResult<String> {
        let (value,) = args;
        let key = Uuid::new_v4().to_string();
        self.backend
            .set(&key, &value.to_bytes())
            .await?;
        debug!(%key, "value stored");

        Ok(key)
    }
}

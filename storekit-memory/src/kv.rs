//! In-memory key-value storage mirroring the Redis primitives the cache relies on.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use storekit_core::{
    backend::{BackendBuilder, KvBackend},
    error::{StoreError, StoreResult},
};

#[derive(Debug, Clone)]
enum Entry {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
}

const WRONG_TYPE: &str = "operation against a key holding the wrong kind of value";

/// Thread-safe in-memory key-value backend.
///
/// Cloning an `InMemoryKv` shares the underlying data, so a cache and its instrumentation
/// see the same keys.
#[derive(Default, Clone, Debug)]
pub struct InMemoryKv {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryKv {
    /// Creates a new empty in-memory key-value store.
    pub fn new() -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Creates a builder for an `InMemoryKv`.
    pub fn builder() -> InMemoryKvBuilder {
        InMemoryKvBuilder
    }

    /// Returns the number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no key is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Resolves a Redis-style inclusive index range against a list of `len` elements.
fn list_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}

/// Appends to the list under `key`, creating it if needed. The key must not hold a value.
fn push(entries: &mut HashMap<String, Entry>, key: &str, value: &[u8]) -> usize {
    match entries
        .entry(key.to_string())
        .or_insert_with(|| Entry::List(Vec::new()))
    {
        Entry::List(list) => {
            list.push(value.to_vec());
            list.len()
        }
        Entry::Value(_) => 0,
    }
}

#[async_trait]
impl KvBackend for InMemoryKv {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match self.entries.read().await.get(key) {
            Some(Entry::Value(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(StoreError::WrongType(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry::Value(value.to_vec()));

        Ok(())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;

        let current = match entries.get(key) {
            Some(Entry::Value(raw)) => std::str::from_utf8(raw)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| {
                    StoreError::Backend("value is not an integer or out of range".to_string())
                })?,
            Some(Entry::List(_)) => return Err(StoreError::WrongType(WRONG_TYPE.to_string())),
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("increment would overflow".to_string()))?;
        entries.insert(key.to_string(), Entry::Value(next.to_string().into_bytes()));

        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<usize> {
        let mut entries = self.entries.write().await;

        if let Some(Entry::Value(_)) = entries.get(key) {
            return Err(StoreError::WrongType(WRONG_TYPE.to_string()));
        }

        Ok(push(&mut entries, key, value))
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<Vec<u8>>> {
        match self.entries.read().await.get(key) {
            Some(Entry::List(list)) => Ok(match list_bounds(list.len(), start, stop) {
                Some((from, to)) => list[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(Entry::Value(_)) => Err(StoreError::WrongType(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn record_call(
        &self,
        inputs_key: &str,
        outputs_key: &str,
        input: &[u8],
        output: &[u8],
    ) -> StoreResult<usize> {
        let mut entries = self.entries.write().await;

        // both keys are checked before either list is touched
        for key in [inputs_key, outputs_key] {
            if let Some(Entry::Value(_)) = entries.get(key) {
                return Err(StoreError::WrongType(WRONG_TYPE.to_string()));
            }
        }

        let recorded = push(&mut entries, inputs_key, input);
        push(&mut entries, outputs_key, output);

        Ok(recorded)
    }

    async fn flush_db(&self) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!(removed, "namespace flushed");

        Ok(())
    }
}

/// Builder for [`InMemoryKv`]. Building always succeeds.
#[derive(Default)]
pub struct InMemoryKvBuilder;

#[async_trait]
impl BackendBuilder for InMemoryKvBuilder {
    type Backend = InMemoryKv;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryKv::new())
    }
}

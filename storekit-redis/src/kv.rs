//! Redis key-value backend.
//!
//! Every operation maps to one Redis command, except `record_call`, which runs as a script.
//! The connection manager is cheap to clone and reconnects on its own, so each call works
//! on a clone of it.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::fmt;
use tracing::{debug, info};

use storekit_core::{
    backend::{BackendBuilder, KvBackend},
    error::StoreResult,
};

use crate::error::map_redis_error;

/// Appends one entry to each of two lists, atomically.
///
/// Both key types are checked before either list is written, so a key holding a plain
/// value leaves both lists untouched.
const RECORD_CALL_SCRIPT: &str = r#"
for _, key in ipairs(KEYS) do
    local kind = redis.call('TYPE', key).ok
    if kind ~= 'none' and kind ~= 'list' then
        return redis.error_reply('WRONGTYPE Operation against a key holding the wrong kind of value')
    end
end
local recorded = redis.call('RPUSH', KEYS[1], ARGV[1])
redis.call('RPUSH', KEYS[2], ARGV[2])
return recorded
"#;

/// Redis key-value backend using a connection manager.
///
/// Clones share the same connection and therefore the same Redis database.
#[derive(Clone)]
pub struct RedisKv {
    url: String,
    conn: redis::aio::ConnectionManager,
}

impl fmt::Debug for RedisKv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKv")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl RedisKv {
    /// Connects to the Redis server at `url` (e.g. "redis://localhost:6379").
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the server cannot be reached.
    pub async fn new(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        info!(url, "connected to redis");

        Ok(Self { url: url.to_string(), conn })
    }

    pub fn builder(url: &str) -> RedisKvBuilder {
        RedisKvBuilder::new(url)
    }
}

#[async_trait]
impl KvBackend for RedisKv {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(map_redis_error)
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(key, 1)
            .await
            .map_err(map_redis_error)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<usize> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, usize>(key, value)
            .await
            .map_err(map_redis_error)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.lrange::<_, Vec<Vec<u8>>>(key, start, stop)
            .await
            .map_err(map_redis_error)
    }

    async fn record_call(
        &self,
        inputs_key: &str,
        outputs_key: &str,
        input: &[u8],
        output: &[u8],
    ) -> StoreResult<usize> {
        let mut conn = self.conn.clone();
        let recorded: usize = redis::Script::new(RECORD_CALL_SCRIPT)
            .key(inputs_key)
            .key(outputs_key)
            .arg(input)
            .arg(output)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(recorded)
    }

    async fn flush_db(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        debug!(url = %self.url, "redis database flushed");

        Ok(())
    }
}

pub struct RedisKvBuilder {
    url: String,
}

impl RedisKvBuilder {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string() }
    }
}

#[async_trait]
impl BackendBuilder for RedisKvBuilder {
    type Backend = RedisKv;

    async fn build(self) -> StoreResult<Self::Backend> {
        RedisKv::new(&self.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekit_core::{
        cache::{Cache, STORE_OPERATION},
        error::StoreError,
        instrument::{call_count, inputs_key, outputs_key},
    };
    use uuid::Uuid;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_kv() -> Option<RedisKv> {
        RedisKv::new(&redis_url()).await.ok()
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        format!("test:redis_kv:{}:{}", Uuid::new_v4(), suffix)
    }

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set_get");
        kv.set(&key, b"hello").await.unwrap();
        assert_eq!(kv.get(&key).await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(kv.get(&test_key("missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_incr() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("counter");
        assert_eq!(kv.incr(&key).await.unwrap(), 1);
        assert_eq!(kv.incr(&key).await.unwrap(), 2);
        assert_eq!(kv.get(&key).await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_redis_rpush_and_lrange() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("list");
        assert_eq!(kv.rpush(&key, b"a").await.unwrap(), 1);
        assert_eq!(kv.rpush(&key, b"b").await.unwrap(), 2);
        assert_eq!(
            kv.lrange(&key, 0, -1).await.unwrap(),
            vec![b"a".to_vec(), b"b".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_redis_wrong_type() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("wrong_type");
        kv.rpush(&key, b"a").await.unwrap();
        assert!(matches!(kv.get(&key).await, Err(StoreError::WrongType(_))));
    }

    #[tokio::test]
    async fn test_redis_record_call_is_all_or_nothing() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let inputs = test_key("inputs");
        let outputs = test_key("outputs");
        assert_eq!(kv.record_call(&inputs, &outputs, b"(1,)", b"2").await.unwrap(), 1);

        let plain = test_key("plain");
        kv.set(&plain, b"value").await.unwrap();
        assert!(matches!(
            kv.record_call(&inputs, &plain, b"(2,)", b"4").await,
            Err(StoreError::WrongType(_))
        ));
        assert_eq!(kv.lrange(&inputs, 0, -1).await.unwrap(), vec![b"(1,)".to_vec()]);
        assert_eq!(kv.lrange(&outputs, 0, -1).await.unwrap(), vec![b"2".to_vec()]);
    }

    #[tokio::test]
    async fn test_redis_cache_round_trip_and_history() {
        let Some(kv) = get_test_kv().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        // the shared counter and lists may already hold earlier calls
        let cache = Cache::new(kv.clone());
        let operation = cache.store_operation();
        let count_before = call_count(&operation).await.unwrap().unwrap_or(0);
        let inputs_before = kv.lrange(&inputs_key(STORE_OPERATION), 0, -1).await.unwrap().len();
        let outputs_before = kv.lrange(&outputs_key(STORE_OPERATION), 0, -1).await.unwrap().len();

        let text = cache.store("foo").await.unwrap();
        let raw = cache.store(b"\x00bar".as_slice()).await.unwrap();
        let integer = cache.store(42_i64).await.unwrap();
        let float = cache.store(2.0_f64).await.unwrap();

        assert_eq!(cache.get_str(&text).await.unwrap(), Some("foo".to_string()));
        assert_eq!(cache.get(&raw).await.unwrap(), Some(b"\x00bar".to_vec()));
        assert_eq!(cache.get_int(&integer).await.unwrap(), Some(42));
        assert_eq!(cache.get_float(&float).await.unwrap(), Some(2.0));
        assert_eq!(kv.get(&float).await.unwrap(), Some(b"2.0".to_vec()));
        assert_eq!(cache.get(&test_key("missing")).await.unwrap(), None);

        assert_eq!(call_count(&operation).await.unwrap(), Some(count_before + 4));

        let inputs = kv.lrange(&inputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        let outputs = kv.lrange(&outputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        assert_eq!(inputs.len(), inputs_before + 4);
        assert_eq!(outputs.len(), outputs_before + 4);
        assert_eq!(
            inputs[inputs_before..].to_vec(),
            vec![
                b"(\"foo\",)".to_vec(),
                b"(b\"\\x00bar\",)".to_vec(),
                b"(42,)".to_vec(),
                b"(2.0,)".to_vec(),
            ]
        );
        assert_eq!(
            outputs[outputs_before..].to_vec(),
            vec![
                text.into_bytes(),
                raw.into_bytes(),
                integer.into_bytes(),
                float.into_bytes(),
            ]
        );
    }
}

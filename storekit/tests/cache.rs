use storekit::{
    backend::KvBackend,
    cache::{Cache, STORE_OPERATION},
    error::StoreError,
    instrument::{call_count, call_history, replay_lines},
    memory::InMemoryKv,
    value::{CacheValue, to_text},
};

#[tokio::test]
async fn test_store_returns_uuid_keys() {
    let cache = Cache::new(InMemoryKv::new());

    let first = cache.store("hello").await.unwrap();
    let second = cache.store("hello").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(first.len(), 36);
    assert_eq!(first.matches('-').count(), 4);
}

#[tokio::test]
async fn test_round_trip_per_type() {
    let cache = Cache::new(InMemoryKv::new());

    let text = cache.store("foo").await.unwrap();
    let owned = cache.store(String::from("bar")).await.unwrap();
    let raw = cache.store(b"\x00\xffbytes".as_slice()).await.unwrap();
    let integer = cache.store(123_i64).await.unwrap();
    let small = cache.store(-7_i32).await.unwrap();
    let float = cache.store(3.5_f64).await.unwrap();
    let whole = cache.store(2.0_f64).await.unwrap();

    assert_eq!(cache.get_str(&text).await.unwrap(), Some("foo".to_string()));
    assert_eq!(cache.get_str(&owned).await.unwrap(), Some("bar".to_string()));
    assert_eq!(cache.get(&raw).await.unwrap(), Some(b"\x00\xffbytes".to_vec()));
    assert_eq!(cache.get_int(&integer).await.unwrap(), Some(123));
    assert_eq!(cache.get_int(&small).await.unwrap(), Some(-7));
    assert_eq!(cache.get_float(&float).await.unwrap(), Some(3.5));
    assert_eq!(cache.get_float(&whole).await.unwrap(), Some(2.0));
    assert_eq!(cache.get(&whole).await.unwrap(), Some(b"2.0".to_vec()));
}

#[tokio::test]
async fn test_unknown_key_is_none() {
    let cache = Cache::new(InMemoryKv::new());

    assert_eq!(cache.get("missing").await.unwrap(), None);
    assert_eq!(cache.get_str("missing").await.unwrap(), None);
    assert_eq!(cache.get_int("missing").await.unwrap(), None);
    assert_eq!(cache.get_float("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_with_only_converts_existing_values() {
    let cache = Cache::new(InMemoryKv::new());
    let key = cache.store("payload").await.unwrap();

    let missing: Option<String> = cache
        .get_with("missing", |_| panic!("converter must not run"))
        .await
        .unwrap();
    assert_eq!(missing, None);

    let upper = cache
        .get_with(&key, |raw| Ok(to_text(raw)?.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(upper, Some("PAYLOAD".to_string()));
}

#[tokio::test]
async fn test_conversion_failure_is_an_error() {
    let cache = Cache::new(InMemoryKv::new());
    let key = cache.store("not a number").await.unwrap();

    assert!(matches!(cache.get_int(&key).await, Err(StoreError::Conversion(_))));
    assert!(matches!(cache.get_float(&key).await, Err(StoreError::Conversion(_))));

    let raw = cache.store(vec![0xff_u8, 0xfe]).await.unwrap();
    assert!(matches!(cache.get_str(&raw).await, Err(StoreError::Conversion(_))));
}

#[tokio::test]
async fn test_every_store_is_counted_and_recorded() {
    let cache = Cache::new(InMemoryKv::new());

    let first = cache.store("foo").await.unwrap();
    let second = cache.store(42_i64).await.unwrap();
    let third = cache.store(b"bar".as_slice()).await.unwrap();

    let operation = cache.store_operation();
    assert_eq!(call_count(&operation).await.unwrap(), Some(3));

    let history = call_history(&operation).await.unwrap();
    let inputs: Vec<_> = history.iter().map(|record| record.input.as_str()).collect();
    let outputs: Vec<_> = history.iter().map(|record| record.output.clone()).collect();

    assert_eq!(
        inputs,
        vec![
            format!("{:?}", (CacheValue::from("foo"),)),
            format!("{:?}", (CacheValue::from(42_i64),)),
            format!("{:?}", (CacheValue::from(b"bar".as_slice()),)),
        ]
    );
    assert_eq!(inputs[0], "(\"foo\",)");
    assert_eq!(inputs[2], "(b\"bar\",)");
    assert_eq!(outputs, vec![first.clone(), second, third]);

    let lines = replay_lines(&operation).await.unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Cache.store was called 3 times:");
    assert_eq!(lines[1], format!("Cache.store(\"foo\",) -> {}", first));
}

#[tokio::test]
async fn test_counter_lives_in_the_cache_backend() {
    let kv = InMemoryKv::new();
    let cache = Cache::new(kv.clone());

    cache.store("a").await.unwrap();
    cache.store("b").await.unwrap();

    assert_eq!(kv.get(STORE_OPERATION).await.unwrap(), Some(b"2".to_vec()));
    assert_eq!(kv.lrange("Cache.store:inputs", 0, -1).await.unwrap().len(), 2);
    assert_eq!(kv.lrange("Cache.store:outputs", 0, -1).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_new_keeps_existing_keys() {
    let kv = InMemoryKv::new();
    kv.set("existing", b"value").await.unwrap();

    let cache = Cache::new(kv.clone());
    assert_eq!(cache.get_str("existing").await.unwrap(), Some("value".to_string()));
}

#[tokio::test]
async fn test_fresh_clears_the_namespace() {
    let kv = InMemoryKv::new();
    kv.set("existing", b"value").await.unwrap();
    Cache::new(kv.clone()).store("counted").await.unwrap();

    let cache = Cache::fresh(kv.clone()).await.unwrap();

    assert_eq!(cache.get("existing").await.unwrap(), None);
    assert_eq!(call_count(&cache.store_operation()).await.unwrap(), None);
    assert!(kv.is_empty().await);
}

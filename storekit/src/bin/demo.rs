//! storekit demo: the school walkthrough followed by the cache walkthrough.
//!
//! Runs against MongoDB and Redis when the `mongodb` and `redis` features are enabled,
//! and against the in-memory backends otherwise. See `storekit::config::Config` for the
//! environment variables it reads.

use futures::TryStreamExt;
use tracing::info;

use storekit::{
    config::Config,
    prelude::*,
    schools::{School, find_by_topic, insert_school, list_all, update_topics},
    telemetry,
};

#[cfg(feature = "mongodb")]
use storekit::mongodb::MongoDbStore;
#[cfg(not(feature = "mongodb"))]
use storekit::memory::InMemoryDocumentStore;
#[cfg(feature = "redis")]
use storekit::redis::RedisKv;
#[cfg(not(feature = "redis"))]
use storekit::memory::InMemoryKv;

fn print_school(school: &School) {
    let id = school
        .id
        .map(|id| id.to_hex())
        .unwrap_or_default();
    println!("[{}] {} {:?}", id, school.name, school.topics);
}

async fn print_schools<B: DocumentBackend>(schools: &Collection<'_, B>) -> StoreResult<()> {
    let mut stream = list_all(schools).await?;

    while let Some(fields) = stream.try_next().await? {
        print_school(&School::from_fields(fields)?);
    }

    Ok(())
}

async fn schools_walkthrough<B: DocumentBackend>(store: &DocumentStore<B>) -> StoreResult<()> {
    let typed = store.typed_collection::<School>();
    let schools = typed.untyped();

    if list_all(&schools).await?.try_next().await?.is_none() {
        insert_school(&typed, &School::new("Holberton school", Vec::<String>::new())).await?;
        insert_school(&typed, &School::new("UCSF", ["Algorithm", "MongoDB"])).await?;
        insert_school(&typed, &School::new("UCLA", ["C", "Python"])).await?;
    }

    update_topics(&schools, "Holberton school", ["Sys admin", "AI", "Algorithm"]).await?;
    print_schools(&schools).await?;

    update_topics(&schools, "Holberton school", ["iOS"]).await?;
    print_schools(&schools).await?;

    let matches: Vec<School> = find_by_topic(&schools, "Python")
        .await?
        .and_then(|fields| async move { School::from_fields(fields) })
        .try_collect()
        .await?;
    matches.iter().for_each(print_school);

    Ok(())
}

async fn cache_walkthrough<B: KvBackend + Clone>(cache: &Cache<B>) -> StoreResult<()> {
    let text = cache.store("foo").await?;
    let integer = cache.store(42).await?;
    let raw = cache.store(b"bar".as_slice()).await?;

    println!("{:?}", cache.get_str(&text).await?);
    println!("{:?}", cache.get_int(&integer).await?);
    println!("{:?}", cache.get(&raw).await?);

    replay(&cache.store_operation(), &mut std::io::stdout()).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();
    let config = Config::from_env();

    #[cfg(feature = "mongodb")]
    let backend = MongoDbStore::builder(&config.mongo_url, &config.mongo_database)
        .build()
        .await?;
    #[cfg(not(feature = "mongodb"))]
    let backend = InMemoryDocumentStore::builder().build().await?;

    let store = DocumentStore::new(backend);
    info!(database = %config.mongo_database, "running school walkthrough");
    schools_walkthrough(&store).await?;
    store.shutdown().await?;

    #[cfg(feature = "redis")]
    let kv = RedisKv::builder(&config.redis_url).build().await?;
    #[cfg(not(feature = "redis"))]
    let kv = InMemoryKv::builder().build().await?;

    let cache = if config.cache_flush_on_init {
        Cache::fresh(kv).await?
    } else {
        Cache::new(kv)
    };
    info!(flushed = config.cache_flush_on_init, "running cache walkthrough");
    cache_walkthrough(&cache).await?;

    Ok(())
}

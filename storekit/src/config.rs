use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// MongoDB connection URL (default: "mongodb://localhost:27017")
    /// Note: Only used when the `mongodb` feature is enabled.
    pub mongo_url: String,
    /// MongoDB database name (default: "my_db")
    pub mongo_database: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    pub redis_url: String,
    /// Clear the cache namespace when the cache is created (default: false)
    pub cache_flush_on_init: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MONGO_URL` - MongoDB connection URL (default: "mongodb://localhost:27017")
    /// - `MONGO_DATABASE` - MongoDB database name (default: "my_db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_FLUSH_ON_INIT` - "true"/"1" to flush the cache namespace on start (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            mongo_url: lookup("MONGO_URL")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            mongo_database: lookup("MONGO_DATABASE").unwrap_or_else(|| "my_db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_flush_on_init: lookup("CACHE_FLUSH_ON_INIT")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// src/config/mod.rs
//
// Runtime configuration
//
// PRINCIPLES:
// - Everything comes from the environment (optionally a .env file)
// - No credentials in source
// - Parsing is separated from the environment so it can be tested

use std::path::PathBuf;

use crate::db::get_database_path;
use crate::error::{AppError, AppResult};
use crate::repositories::RecordKeys;

pub const STORE_URL_VAR: &str = "MOVIE_STORE_URL";
pub const STORE_POOL_SIZE_VAR: &str = "MOVIE_STORE_POOL_SIZE";
pub const RECORD_PREFIX_VAR: &str = "MOVIE_RECORD_PREFIX";
pub const CHART_DIR_VAR: &str = "MOVIE_CHART_DIR";

pub const API_KEY_VAR: &str = "OTT_API_KEY";
pub const API_HOST_VAR: &str = "OTT_API_HOST";
pub const API_URL_VAR: &str = "OTT_API_URL";

pub const DEFAULT_API_HOST: &str = "ott-details.p.rapidapi.com";
pub const DEFAULT_API_URL: &str = "https://ott-details.p.rapidapi.com/advancedsearch";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_CHART_DIR: &str = "charts";

/// Where the cached documents live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// RedisJSON-enabled Redis server
    Redis { url: String, pool_size: u32 },
    /// SQLite file holding a documents table
    Sqlite { path: PathBuf, pool_size: u32 },
}

/// Settings shared by every entry point
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub record_prefix: String,
    pub chart_dir: PathBuf,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pool_size = match non_empty(&lookup, STORE_POOL_SIZE_VAR) {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        let store = match non_empty(&lookup, STORE_URL_VAR) {
            Some(url) => parse_store_url(&url, pool_size)?,
            None => StoreConfig::Sqlite {
                path: get_database_path()?,
                pool_size,
            },
        };

        let record_prefix = non_empty(&lookup, RECORD_PREFIX_VAR)
            .unwrap_or_else(|| RecordKeys::DEFAULT_PREFIX.to_string());

        let chart_dir = non_empty(&lookup, CHART_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_DIR));

        Ok(Self {
            store,
            record_prefix,
            chart_dir,
        })
    }

    pub fn record_keys(&self) -> RecordKeys {
        RecordKeys::new(self.record_prefix.clone())
    }
}

/// Credentials and endpoint for the search API. Only ingestion needs these.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub api_host: String,
    pub endpoint: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(&lookup, API_KEY_VAR)
            .ok_or_else(|| AppError::Config(format!("{} is not set", API_KEY_VAR)))?;

        Ok(Self {
            api_key,
            api_host: non_empty(&lookup, API_HOST_VAR)
                .unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            endpoint: non_empty(&lookup, API_URL_VAR)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_pool_size(raw: &str) -> AppResult<u32> {
    match raw.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(AppError::Config(format!(
            "{} must be a positive integer, got '{}'",
            STORE_POOL_SIZE_VAR, raw
        ))),
    }
}

/// `redis://` and `rediss://` select Redis; `sqlite://path` or a bare path selects SQLite
fn parse_store_url(url: &str, pool_size: u32) -> AppResult<StoreConfig> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        return Ok(StoreConfig::Redis {
            url: url.to_string(),
            pool_size,
        });
    }

    let path = url.strip_prefix("sqlite://").unwrap_or(url);
    if path.is_empty() {
        return Err(AppError::Config(format!(
            "{} has no SQLite path: '{}'",
            STORE_URL_VAR, url
        )));
    }
    if path.contains("://") {
        return Err(AppError::Config(format!(
            "Unsupported store scheme in {}: '{}'",
            STORE_URL_VAR, url
        )));
    }

    Ok(StoreConfig::Sqlite {
        path: PathBuf::from(path),
        pool_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_redis_store_url() {
        let config = AppConfig::from_lookup(lookup(&[
            (STORE_URL_VAR, "redis://127.0.0.1:6379/0"),
            (STORE_POOL_SIZE_VAR, "2"),
        ]))
        .unwrap();

        assert_eq!(
            config.store,
            StoreConfig::Redis {
                url: "redis://127.0.0.1:6379/0".to_string(),
                pool_size: 2
            }
        );
        assert_eq!(config.record_prefix, "data:movies");
        assert_eq!(config.chart_dir, PathBuf::from("charts"));
    }

    #[test]
    fn test_sqlite_store_url() {
        let config = AppConfig::from_lookup(lookup(&[
            (STORE_URL_VAR, "sqlite:///tmp/movies.db"),
            (CHART_DIR_VAR, "out"),
            (RECORD_PREFIX_VAR, "cache:films"),
        ]))
        .unwrap();

        assert_eq!(
            config.store,
            StoreConfig::Sqlite {
                path: PathBuf::from("/tmp/movies.db"),
                pool_size: DEFAULT_POOL_SIZE
            }
        );
        assert_eq!(config.chart_dir, PathBuf::from("out"));
        assert_eq!(config.record_keys().record_key(3), "cache:films:3");
    }

    #[test]
    fn test_bare_path_is_sqlite() {
        let config =
            AppConfig::from_lookup(lookup(&[(STORE_URL_VAR, "movies.db")])).unwrap();
        assert!(matches!(config.store, StoreConfig::Sqlite { .. }));
    }

    #[test]
    fn test_unknown_scheme_fails() {
        let result = AppConfig::from_lookup(lookup(&[(STORE_URL_VAR, "mongodb://localhost")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_pool_size_fails() {
        let result = AppConfig::from_lookup(lookup(&[
            (STORE_URL_VAR, "redis://localhost"),
            (STORE_POOL_SIZE_VAR, "0"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_api_config_requires_key() {
        let result = ApiConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_host, DEFAULT_API_HOST);
        assert_eq!(config.endpoint, DEFAULT_API_URL);
        assert!(!format!("{:?}", config).contains("secret"));
    }
}

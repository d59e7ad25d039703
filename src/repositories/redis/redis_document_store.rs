// src/repositories/redis/redis_document_store.rs
//
// Document store over Redis with the RedisJSON module.
//
// Commands used: JSON.SET, JSON.GET, JSON.ARRLEN, EXISTS, SCAN, DEL.
// Paths go out in JSONPath form (`$.genre[0]`), so replies come back as
// arrays of matches that are unwrapped here.

use r2d2::{Pool, PooledConnection};
use serde_json::Value;

use crate::error::AppResult;
use crate::repositories::document_store::{DocumentStore, JsonPath, ScanPage, SCAN_PAGE_SIZE};

pub struct RedisDocumentStore {
    pool: Pool<redis::Client>,
}

impl RedisDocumentStore {
    /// Connect to `url` (redis:// or rediss://). Fails if the server is unreachable.
    pub fn connect(url: &str, pool_size: u32) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        let pool = Pool::builder().max_size(pool_size).build(client)?;
        Ok(Self { pool })
    }

    fn connection(&self) -> AppResult<PooledConnection<redis::Client>> {
        Ok(self.pool.get()?)
    }

    fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection()?;
        let count: u32 = redis::cmd("EXISTS").arg(key).query(&mut *conn)?;
        Ok(count > 0)
    }
}

impl DocumentStore for RedisDocumentStore {
    fn set_document(&self, key: &str, document: &Value) -> AppResult<()> {
        let mut conn = self.connection()?;
        let body = serde_json::to_string(document)?;

        redis::cmd("JSON.SET")
            .arg(key)
            .arg("$")
            .arg(body)
            .query::<()>(&mut *conn)?;
        Ok(())
    }

    fn get_document(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection()?;
        let body: Option<String> = redis::cmd("JSON.GET").arg(key).query(&mut *conn)?;
        Ok(body)
    }

    fn get_path(&self, key: &str, path: &JsonPath) -> AppResult<Option<String>> {
        let mut conn = self.connection()?;
        let reply: Option<String> = redis::cmd("JSON.GET")
            .arg(key)
            .arg(path.to_string())
            .query(&mut *conn)?;

        let Some(reply) = reply else {
            return Ok(None);
        };
        Ok(first_match(&reply)?.map(|value| value.to_string()))
    }

    fn array_len(&self, key: &str, path: &JsonPath) -> AppResult<Option<usize>> {
        if !self.exists(key)? {
            return Ok(None);
        }

        let mut conn = self.connection()?;
        let lengths: Vec<Option<usize>> = redis::cmd("JSON.ARRLEN")
            .arg(key)
            .arg(path.to_string())
            .query(&mut *conn)?;

        Ok(lengths.into_iter().next().flatten())
    }

    fn delete_by_prefix(&self, prefix: &str) -> AppResult<usize> {
        let keys = self.scan_keys(prefix)?;
        let mut conn = self.connection()?;

        let mut removed = 0;
        for chunk in keys.chunks(SCAN_PAGE_SIZE) {
            removed += redis::cmd("DEL").arg(chunk).query::<usize>(&mut *conn)?;
        }
        Ok(removed)
    }

    fn scan_page(&self, prefix: &str, cursor: u64) -> AppResult<ScanPage> {
        let mut conn = self.connection()?;
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(prefix_pattern(prefix))
            .arg("COUNT")
            .arg(SCAN_PAGE_SIZE)
            .query(&mut *conn)?;

        Ok(ScanPage { cursor: next, keys })
    }
}

/// First value of a JSONPath reply such as `["Drama"]`; `None` for `[]`
fn first_match(reply: &str) -> AppResult<Option<Value>> {
    let matches: Vec<Value> = serde_json::from_str(reply)?;
    Ok(matches.into_iter().next())
}

/// Glob pattern matching keys that start with `prefix` literally
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

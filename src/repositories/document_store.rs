// src/repositories/document_store.rs
//
// JSON document store contract
//
// CRITICAL RULES:
// - Stores are DUMB key/document mappers
// - NO knowledge of movies or aggregation
// - NO atomicity across keys: callers accept that a scan may see a
//   half-written generation

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{AppError, AppResult, StoreError};

/// Keys requested per cursor round trip
pub const SCAN_PAGE_SIZE: usize = 100;

/// One step of a cursor scan. A cursor of 0 means the scan is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    pub cursor: u64,
    pub keys: Vec<String>,
}

impl ScanPage {
    pub fn is_last(&self) -> bool {
        self.cursor == 0
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    /// Store `document` under `key`, replacing whatever was there
    fn set_document(&self, key: &str, document: &Value) -> AppResult<()>;

    /// Whole document, serialized. `None` if the key does not exist.
    fn get_document(&self, key: &str) -> AppResult<Option<String>>;

    /// Raw serialized value at `path` (strings keep their quotes).
    /// `None` if the key or the path does not exist.
    fn get_path(&self, key: &str, path: &JsonPath) -> AppResult<Option<String>>;

    /// Length of the array at `path`. `None` if the key or the path does not exist.
    fn array_len(&self, key: &str, path: &JsonPath) -> AppResult<Option<usize>>;

    /// Delete every key starting with `prefix`; returns how many were removed
    fn delete_by_prefix(&self, prefix: &str) -> AppResult<usize>;

    /// One page of keys starting with `prefix`. Start with cursor 0.
    fn scan_page(&self, prefix: &str, cursor: u64) -> AppResult<ScanPage>;

    /// Every key starting with `prefix`, following the cursor until it returns to 0.
    /// A key reported twice by the backend is listed once.
    fn scan_keys(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        let mut cursor = 0;

        loop {
            let page = self.scan_page(prefix, cursor)?;
            for key in page.keys.iter() {
                if seen.insert(key.clone()) {
                    keys.push(key.clone());
                }
            }
            if page.is_last() {
                break;
            }
            cursor = page.cursor;
        }

        Ok(keys)
    }
}

/// Key naming convention for movie records: `<prefix>:<index>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    prefix: String,
}

impl RecordKeys {
    pub const DEFAULT_PREFIX: &'static str = "data:movies";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn record_key(&self, index: usize) -> String {
        format!("{}:{}", self.prefix, index)
    }

    /// Prefix shared by every record key, used for scans and deletes
    pub fn member_prefix(&self) -> String {
        format!("{}:", self.prefix)
    }

    /// Positional index encoded in a record key, if `key` is one
    pub fn index_of(&self, key: &str) -> Option<usize> {
        key.strip_prefix(self.prefix.as_str())?
            .strip_prefix(':')?
            .parse()
            .ok()
    }
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location inside a JSON document, rendered as `$.genre[0]`.
///
/// Accepts `$`, `.`, `$.title`, `.genre[1]`, `genre[1]` and the `.genre.[1]`
/// spelling. Field names are ASCII alphanumerics and underscores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        let invalid = || AppError::Store(StoreError::InvalidPath(raw.to_string()));

        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let mut segments = Vec::new();
        let mut chars = body.chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                '.' => {
                    chars.next();
                    if chars.peek() == Some(&'.') {
                        return Err(invalid());
                    }
                }
                '[' => {
                    chars.next();
                    let mut digits = String::new();
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        digits.push(d);
                        chars.next();
                    }
                    if digits.is_empty() || chars.next() != Some(']') {
                        return Err(invalid());
                    }
                    let index = digits.parse().map_err(|_| invalid())?;
                    segments.push(PathSegment::Index(index));
                }
                c if is_field_char(c) => {
                    let mut name = String::new();
                    while let Some(&d) = chars.peek() {
                        if !is_field_char(d) {
                            break;
                        }
                        name.push(d);
                        chars.next();
                    }
                    segments.push(PathSegment::Field(name));
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self { segments })
    }
}

fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keys() {
        let keys = RecordKeys::default();
        assert_eq!(keys.record_key(0), "data:movies:0");
        assert_eq!(keys.member_prefix(), "data:movies:");
        assert_eq!(keys.index_of("data:movies:12"), Some(12));
        assert_eq!(keys.index_of("data:movies:abc"), None);
        assert_eq!(keys.index_of("data:moviesx:1"), None);
        assert_eq!(keys.index_of("other:1"), None);
    }

    #[test]
    fn test_path_builder_renders() {
        let path = JsonPath::root().field("genre").index(0);
        assert_eq!(path.to_string(), "$.genre[0]");
        assert_eq!(JsonPath::root().to_string(), "$");
    }

    #[test]
    fn test_path_parse_spellings() {
        let expected = JsonPath::root().field("genre").index(1);
        for raw in ["$.genre[1]", ".genre[1]", "genre[1]", ".genre.[1]"] {
            assert_eq!(JsonPath::parse(raw).unwrap(), expected, "{}", raw);
        }
        assert!(JsonPath::parse("$").unwrap().is_root());
        assert!(JsonPath::parse(".").unwrap().is_root());
        assert_eq!(
            "imdbrating".parse::<JsonPath>().unwrap(),
            JsonPath::root().field("imdbrating")
        );
    }

    #[test]
    fn test_path_parse_rejects_garbage() {
        for raw in ["$..genre", "genre[", "genre[x]", "genre[]", "gen re", "$.a-b"] {
            assert!(JsonPath::parse(raw).is_err(), "{}", raw);
        }
    }

    struct PagedStore {
        pages: Vec<ScanPage>,
    }

    impl DocumentStore for PagedStore {
        fn set_document(&self, _key: &str, _document: &Value) -> AppResult<()> {
            Ok(())
        }
        fn get_document(&self, _key: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
        fn get_path(&self, _key: &str, _path: &JsonPath) -> AppResult<Option<String>> {
            Ok(None)
        }
        fn array_len(&self, _key: &str, _path: &JsonPath) -> AppResult<Option<usize>> {
            Ok(None)
        }
        fn delete_by_prefix(&self, _prefix: &str) -> AppResult<usize> {
            Ok(0)
        }
        fn scan_page(&self, _prefix: &str, cursor: u64) -> AppResult<ScanPage> {
            Ok(self.pages[cursor as usize].clone())
        }
    }

    #[test]
    fn test_scan_keys_follows_cursor_and_dedups() {
        let store = PagedStore {
            pages: vec![
                ScanPage {
                    cursor: 2,
                    keys: vec!["k:0".to_string(), "k:1".to_string()],
                },
                ScanPage {
                    cursor: 0,
                    keys: vec!["k:3".to_string()],
                },
                ScanPage {
                    cursor: 1,
                    keys: vec!["k:1".to_string(), "k:2".to_string()],
                },
            ],
        };

        let keys = store.scan_keys("k:").unwrap();
        assert_eq!(keys, vec!["k:0", "k:1", "k:2", "k:3"]);
    }
}

//! Sled-based Parsed Book Cache Implementation

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{BookRecord, BookStoreError, BookStorePort, CachedBook};

const BOOK_PREFIX: &str = "book:";

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InternalBookEntry {
    content_hash: String,
    cached_at: i64,
    /// BookRecord 的 JSON
    book_json: String,
}

/// Sled 书籍缓存
///
/// key 为 `book:{title}`
pub struct SledBookCache {
    db: Db,
}

impl SledBookCache {
    /// 打开（或创建）缓存数据库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BookStoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BookStoreError::IoError(e.to_string()))?;
            }
        }

        let db = sled::open(path.as_ref())
            .map_err(|e| BookStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            entries = db.scan_prefix(BOOK_PREFIX).count(),
            "SledBookCache initialized"
        );

        Ok(Self { db })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), BookStoreError> {
        self.db
            .flush()
            .map_err(|e| BookStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn key(title: &str) -> String {
        format!("{}{}", BOOK_PREFIX, title)
    }

    fn decode(data: &[u8]) -> Result<CachedBook, BookStoreError> {
        let entry: InternalBookEntry = bincode::deserialize(data)
            .map_err(|e| BookStoreError::SerializationError(e.to_string()))?;
        let record: BookRecord = serde_json::from_str(&entry.book_json)
            .map_err(|e| BookStoreError::SerializationError(e.to_string()))?;
        let cached_at: DateTime<Utc> = Utc
            .timestamp_opt(entry.cached_at, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(CachedBook {
            record,
            content_hash: entry.content_hash,
            cached_at,
        })
    }
}

#[async_trait]
impl BookStorePort for SledBookCache {
    async fn load(&self, title: &str) -> Result<Option<CachedBook>, BookStoreError> {
        match self.db.get(Self::key(title)) {
            Ok(Some(data)) => Self::decode(&data).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(BookStoreError::DatabaseError(e.to_string())),
        }
    }

    async fn store(&self, record: &BookRecord, content_hash: &str) -> Result<(), BookStoreError> {
        let book_json = serde_json::to_string(record)
            .map_err(|e| BookStoreError::SerializationError(e.to_string()))?;

        let entry = InternalBookEntry {
            content_hash: content_hash.to_string(),
            cached_at: Utc::now().timestamp(),
            book_json,
        };

        let entry_bytes = bincode::serialize(&entry)
            .map_err(|e| BookStoreError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::key(&record.title), entry_bytes)
            .map_err(|e| BookStoreError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            book = %record.title,
            content_hash = %content_hash,
            chapters = record.chapters.len(),
            "Book cached"
        );

        Ok(())
    }

    async fn titles(&self) -> Result<Vec<String>, BookStoreError> {
        let mut titles = Vec::new();
        for item in self.db.scan_prefix(BOOK_PREFIX) {
            let (key, _) = item.map_err(|e| BookStoreError::DatabaseError(e.to_string()))?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| BookStoreError::SerializationError(e.to_string()))?;
            if let Some(title) = key.strip_prefix(BOOK_PREFIX) {
                titles.push(title.to_string());
            }
        }
        Ok(titles)
    }

    async fn remove(&self, title: &str) -> Result<bool, BookStoreError> {
        let removed = self
            .db
            .remove(Self::key(title))
            .map_err(|e| BookStoreError::DatabaseError(e.to_string()))?;
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ChapterRecord, SegmentRecord};
    use tempfile::tempdir;

    fn record(title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            number: 1.0,
            chapters: vec![ChapterRecord {
                ordinal: 0,
                pov: "holden".to_string(),
                chapter_type: "Chapter".to_string(),
                segments: vec![SegmentRecord {
                    ordinal: 0,
                    lines: vec!["Holden woke.".to_string()],
                    characters: vec![],
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_store_load() {
        let dir = tempdir().unwrap();
        let cache = SledBookCache::open(dir.path().join("books.sled")).unwrap();

        assert!(cache.load("Leviathan Wakes").await.unwrap().is_none());

        cache.store(&record("Leviathan Wakes"), "abc").await.unwrap();
        let cached = cache.load("Leviathan Wakes").await.unwrap().unwrap();
        assert_eq!(cached.record, record("Leviathan Wakes"));
        assert_eq!(cached.content_hash, "abc");

        // 覆盖同名条目
        cache.store(&record("Leviathan Wakes"), "def").await.unwrap();
        let cached = cache.load("Leviathan Wakes").await.unwrap().unwrap();
        assert_eq!(cached.content_hash, "def");
    }

    #[tokio::test]
    async fn test_titles_and_remove() {
        let dir = tempdir().unwrap();
        let cache = SledBookCache::open(dir.path().join("nested/books.sled")).unwrap();

        cache.store(&record("Caliban's War"), "a").await.unwrap();
        cache.store(&record("Abaddon's Gate"), "b").await.unwrap();

        let mut titles = cache.titles().await.unwrap();
        titles.sort();
        assert_eq!(titles, vec!["Abaddon's Gate", "Caliban's War"]);

        assert!(cache.remove("Caliban's War").await.unwrap());
        assert!(!cache.remove("Caliban's War").await.unwrap());
        assert_eq!(cache.titles().await.unwrap(), vec!["Abaddon's Gate"]);
    }

    #[tokio::test]
    async fn test_reopen_keeps_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.sled");
        {
            let cache = SledBookCache::open(&path).unwrap();
            cache.store(&record("Leviathan Wakes"), "abc").await.unwrap();
            cache.flush().unwrap();
        }
        let cache = SledBookCache::open(&path).unwrap();
        assert!(cache.load("Leviathan Wakes").await.unwrap().is_some());
    }
}

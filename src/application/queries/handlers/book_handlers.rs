//! Book Query Handlers

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    content_hash, BookRecord, BookStorePort, CharacterSourcePort, RawBookEntry,
    RawBookSourcePort, RawSourceError,
};
use crate::application::queries::{LoadBooks, LoadCharacters};
use crate::domain::book::{Book, BookParser};
use crate::domain::character::CharacterRegistry;

// ============================================================================
// Response DTOs
// ============================================================================

/// 加载失败的书籍
#[derive(Debug, Clone)]
pub struct SkippedBook {
    pub title: String,
    pub reason: String,
}

/// LoadBooks 响应
#[derive(Debug, Clone, Default)]
pub struct LoadBooksResponse {
    /// 按出版序号排序
    pub books: Vec<Arc<Book>>,
    pub skipped: Vec<SkippedBook>,
}

// ============================================================================
// Handlers
// ============================================================================

/// LoadBooks Handler
pub struct LoadBooksHandler {
    raw_source: Arc<dyn RawBookSourcePort>,
    store: Arc<dyn BookStorePort>,
    registry: Arc<CharacterRegistry>,
}

impl LoadBooksHandler {
    pub fn new(
        raw_source: Arc<dyn RawBookSourcePort>,
        store: Arc<dyn BookStorePort>,
        registry: Arc<CharacterRegistry>,
    ) -> Self {
        Self {
            raw_source,
            store,
            registry,
        }
    }

    /// 单本书失败只记录并跳过，不影响其他书
    pub async fn handle(&self, query: LoadBooks) -> Result<LoadBooksResponse, ApplicationError> {
        let entries = match self.raw_source.list().await {
            Ok(entries) => entries,
            Err(RawSourceError::MissingDirectory(path)) => {
                tracing::warn!(path = ?path, "Raw data directory not found, using cached books only");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut response = LoadBooksResponse::default();
        let mut seen = HashSet::new();

        for entry in entries {
            if query.novels_only && entry.is_novella() {
                tracing::debug!(book = %entry.title, "Novella skipped");
                continue;
            }
            seen.insert(entry.title.clone());

            match self.load_entry(&entry, query.overwrite_interim).await {
                Ok(book) => response.books.push(Arc::new(book)),
                Err(e) => {
                    tracing::error!(book = %entry.title, error = %e, "Failed to load book");
                    response.skipped.push(SkippedBook {
                        title: entry.title.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // 只存在于缓存中的书
        for title in self.store.titles().await? {
            if seen.contains(&title) {
                continue;
            }
            let Some(cached) = self.store.load(&title).await? else {
                continue;
            };
            if query.novels_only && cached.record.is_novella() {
                continue;
            }
            match cached.record.into_book(&self.registry) {
                Ok(book) => {
                    tracing::debug!(book = %title, "Book loaded from cache only");
                    response.books.push(Arc::new(book));
                }
                Err(e) => {
                    tracing::error!(book = %title, error = %e, "Cached book is invalid");
                    response.skipped.push(SkippedBook {
                        title,
                        reason: e.to_string(),
                    });
                }
            }
        }

        response
            .books
            .sort_by(|a, b| a.number().total_cmp(&b.number()));

        tracing::info!(
            books = response.books.len(),
            skipped = response.skipped.len(),
            "Books loaded"
        );

        Ok(response)
    }

    async fn load_entry(
        &self,
        entry: &RawBookEntry,
        overwrite_interim: bool,
    ) -> Result<Book, ApplicationError> {
        let raw = self.raw_source.read(entry).await?;
        let hash = content_hash(&raw.lines);

        if !overwrite_interim {
            if let Some(cached) = self.store.load(&raw.title).await? {
                if cached.content_hash == hash {
                    tracing::debug!(book = %raw.title, "Cache hit");
                    return Ok(cached.record.into_book(&self.registry)?);
                }
                // 解析失败时不能留下旧内容供仅缓存模式读取
                self.store.remove(&raw.title).await?;
                tracing::debug!(book = %raw.title, "Stale cache entry evicted");
            }
        }

        let book = BookParser::new(&self.registry).parse(&raw.title, raw.number, &raw.lines)?;
        tracing::info!(
            book = %book.title(),
            chapters = book.chapters().len(),
            words = book.count_words(),
            "Book parsed"
        );

        self.store
            .store(&BookRecord::from_book(&book), &hash)
            .await?;

        Ok(book)
    }
}

/// LoadCharacters Handler
pub struct LoadCharactersHandler {
    source: Arc<dyn CharacterSourcePort>,
}

impl LoadCharactersHandler {
    pub fn new(source: Arc<dyn CharacterSourcePort>) -> Self {
        Self { source }
    }

    /// 目录缺失或不可读时返回配置错误
    pub async fn handle(
        &self,
        query: LoadCharacters,
    ) -> Result<Arc<CharacterRegistry>, ApplicationError> {
        let registry = match &query.book {
            Some(title) => self.source.load_for_book(title).await?,
            None => self.source.load_global().await?,
        };

        tracing::debug!(
            book = ?query.book,
            characters = registry.len(),
            "Characters loaded"
        );

        Ok(Arc::new(registry))
    }
}

//! Book Store Port - 解析结果缓存
//!
//! 定义已解析书籍的持久化接口，具体实现使用 Sled

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::book::{Book, Chapter, ChapterKind, ParseError, Segment};
use crate::domain::character::CharacterRegistry;

/// Book Store 错误
#[derive(Debug, Error)]
pub enum BookStoreError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 场景记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub ordinal: usize,
    pub lines: Vec<String>,
    pub characters: Vec<String>,
}

/// 章节记录
///
/// 视角角色只保存标识，反序列化时通过注册表重新解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub ordinal: usize,
    pub pov: String,
    pub chapter_type: String,
    pub segments: Vec<SegmentRecord>,
}

/// 书籍记录（用于持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub number: f64,
    pub chapters: Vec<ChapterRecord>,
}

impl BookRecord {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title().to_string(),
            number: book.number(),
            chapters: book.chapters().iter().map(chapter_record).collect(),
        }
    }

    /// 还原为 Book，视角角色按标识在注册表中解析
    pub fn into_book(self, registry: &CharacterRegistry) -> Result<Book, ParseError> {
        let mut chapters = Vec::with_capacity(self.chapters.len());
        for chapter in self.chapters {
            let kind = ChapterKind::parse(&chapter.chapter_type)?;
            let pov = registry.resolve_id(&chapter.pov);
            let segments = chapter
                .segments
                .into_iter()
                .map(|s| Segment::with_characters(s.ordinal, s.lines, s.characters))
                .collect();
            chapters.push(Chapter::new(chapter.ordinal, kind, pov, segments));
        }
        Ok(Book::new(self.title, self.number, chapters))
    }

    pub fn is_novella(&self) -> bool {
        self.number.fract() != 0.0
    }
}

fn chapter_record(chapter: &Chapter) -> ChapterRecord {
    ChapterRecord {
        ordinal: chapter.ordinal(),
        pov: chapter.pov().ref_name().to_string(),
        chapter_type: chapter.kind().as_str().to_string(),
        segments: chapter
            .segments()
            .iter()
            .map(|s| SegmentRecord {
                ordinal: s.ordinal(),
                lines: s.lines().to_vec(),
                characters: s.characters().to_vec(),
            })
            .collect(),
    }
}

/// 缓存的书籍
#[derive(Debug, Clone)]
pub struct CachedBook {
    pub record: BookRecord,
    /// 原始文本的 md5
    pub content_hash: String,
    pub cached_at: DateTime<Utc>,
}

/// Book Store Port
///
/// 以书名为 key；content_hash 用于判断原始文本是否已变化
#[async_trait]
pub trait BookStorePort: Send + Sync {
    /// 按书名读取
    async fn load(&self, title: &str) -> Result<Option<CachedBook>, BookStoreError>;

    /// 写入（覆盖同名条目）
    async fn store(&self, record: &BookRecord, content_hash: &str) -> Result<(), BookStoreError>;

    /// 所有已缓存的书名
    async fn titles(&self) -> Result<Vec<String>, BookStoreError>;

    /// 删除条目，返回是否存在
    async fn remove(&self, title: &str) -> Result<bool, BookStoreError>;
}

/// 计算原始文本的内容 hash
pub fn content_hash<S: AsRef<str>>(lines: &[S]) -> String {
    let mut context = md5::Context::new();
    for line in lines {
        context.consume(line.as_ref().as_bytes());
        context.consume(b"\n");
    }
    format!("{:x}", context.compute())
}

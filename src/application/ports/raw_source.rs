//! Raw Book Source Port - 原始文本来源
//!
//! 原始目录中每本书一个 `NN_标题` 子目录，NN 为出版序号的十倍

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::book::ParseError;

static BOOK_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})_(.+)$").expect("book directory pattern is valid"));

/// 原始文本来源错误
#[derive(Debug, Error)]
pub enum RawSourceError {
    #[error("Raw data directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("No book file in {0}")]
    BookFileNotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// 原始目录中的一本书
#[derive(Debug, Clone, PartialEq)]
pub struct RawBookEntry {
    pub title: String,
    pub number: f64,
    pub dir: PathBuf,
}

impl RawBookEntry {
    pub fn is_novella(&self) -> bool {
        self.number.fract() != 0.0
    }
}

/// 原始文本（按行）
#[derive(Debug, Clone)]
pub struct RawBook {
    pub title: String,
    pub number: f64,
    pub lines: Vec<String>,
}

/// Raw Book Source Port
#[async_trait]
pub trait RawBookSourcePort: Send + Sync {
    /// 列出所有书籍目录
    async fn list(&self) -> Result<Vec<RawBookEntry>, RawSourceError>;

    /// 读取一本书的原始文本；没有任何行时返回 `ParseError::EmptyInput`
    async fn read(&self, entry: &RawBookEntry) -> Result<RawBook, RawSourceError>;
}

/// 由目录名 `NN_标题` 得到书名
pub fn book_title_from_dir(name: &str) -> Result<String, ParseError> {
    BOOK_DIR
        .captures(name)
        .map(|c| c[2].to_string())
        .ok_or_else(|| ParseError::InvalidBookDirectory(name.to_string()))
}

/// 由目录名 `NN_标题` 得到出版序号（NN / 10）
pub fn book_number_from_dir(name: &str) -> Result<f64, ParseError> {
    let captures = BOOK_DIR
        .captures(name)
        .ok_or_else(|| ParseError::InvalidBookDirectory(name.to_string()))?;
    let number: u32 = captures[1]
        .parse()
        .map_err(|_| ParseError::InvalidBookDirectory(name.to_string()))?;
    Ok(number as f64 / 10.0)
}

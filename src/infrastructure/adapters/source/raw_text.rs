//! Raw Text Source - 原始书籍目录实现
//!
//! 实现 RawBookSourcePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{
    book_number_from_dir, book_title_from_dir, RawBook, RawBookEntry, RawBookSourcePort,
    RawSourceError,
};
use crate::domain::book::ParseError;

/// 书籍文件名前缀
const BOOK_FILE_PREFIX: &str = "book";

/// 原始书籍目录
pub struct DirectoryRawBookSource {
    /// 原始数据根目录
    raw_dir: PathBuf,
}

impl DirectoryRawBookSource {
    pub fn new(raw_dir: impl AsRef<Path>) -> Self {
        Self {
            raw_dir: raw_dir.as_ref().to_path_buf(),
        }
    }

    /// 获取原始数据根目录
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    async fn book_file(&self, dir: &Path) -> Result<PathBuf, RawSourceError> {
        let mut entries = fs::read_dir(dir).await.map_err(|e| io_error(dir, e))?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(BOOK_FILE_PREFIX) && entry.path().is_file() {
                candidates.push(entry.path());
            }
        }

        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| RawSourceError::BookFileNotFound(dir.to_path_buf()))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> RawSourceError {
    RawSourceError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[async_trait]
impl RawBookSourcePort for DirectoryRawBookSource {
    async fn list(&self) -> Result<Vec<RawBookEntry>, RawSourceError> {
        if !self.raw_dir.is_dir() {
            return Err(RawSourceError::MissingDirectory(self.raw_dir.clone()));
        }

        let mut entries = fs::read_dir(&self.raw_dir)
            .await
            .map_err(|e| io_error(&self.raw_dir, e))?;
        let mut books = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.raw_dir, e))?
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            match (book_title_from_dir(&name), book_number_from_dir(&name)) {
                (Ok(title), Ok(number)) => books.push(RawBookEntry {
                    title,
                    number,
                    dir: path,
                }),
                _ => {
                    tracing::debug!(dir = %name, "Not a book directory, skipping");
                }
            }
        }

        books.sort_by(|a, b| a.number.total_cmp(&b.number));

        tracing::debug!(
            raw_dir = %self.raw_dir.display(),
            books = books.len(),
            "Raw books listed"
        );

        Ok(books)
    }

    async fn read(&self, entry: &RawBookEntry) -> Result<RawBook, RawSourceError> {
        let path = self.book_file(&entry.dir).await?;
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        if lines.is_empty() {
            return Err(ParseError::EmptyInput(entry.title.clone()).into());
        }

        tracing::debug!(
            book = %entry.title,
            path = %path.display(),
            lines = lines.len(),
            "Raw book read"
        );

        Ok(RawBook {
            title: entry.title.clone(),
            number: entry.number,
            lines,
        })
    }
}

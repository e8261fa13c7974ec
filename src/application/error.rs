//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::{
    BookStoreError, CharacterSourceError, RawSourceError, RunError, TableError,
};
use crate::domain::book::ParseError;
use crate::domain::centrality::CentralityError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 原始文本无法解析（单本书失败）
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// 中心性计算失败（单本书失败）
    #[error("Centrality error: {0}")]
    Centrality(#[from] CentralityError),

    /// 配置或参考数据缺失（启动时致命）
    #[error("Configuration error at {}: {message}", .path.display())]
    Configuration { path: PathBuf, message: String },

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建配置错误
    pub fn configuration(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 创建存储错误
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 是否为启动时致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl From<CharacterSourceError> for ApplicationError {
    fn from(err: CharacterSourceError) -> Self {
        Self::configuration(err.path().clone(), err.to_string())
    }
}

impl From<RawSourceError> for ApplicationError {
    fn from(err: RawSourceError) -> Self {
        match err {
            RawSourceError::Parse(parse) => Self::Parse(parse),
            RawSourceError::MissingDirectory(path) => {
                Self::configuration(path, "raw data directory not found")
            }
            other => Self::StorageError(other.to_string()),
        }
    }
}

impl From<BookStoreError> for ApplicationError {
    fn from(err: BookStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<TableError> for ApplicationError {
    fn from(err: TableError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<RunError> for ApplicationError {
    fn from(err: RunError) -> Self {
        Self::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_source_error_is_fatal() {
        let err: ApplicationError =
            CharacterSourceError::MissingDirectory(PathBuf::from("references/characters")).into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("references/characters"));
    }

    #[test]
    fn test_raw_parse_error_is_not_fatal() {
        let err: ApplicationError =
            RawSourceError::Parse(ParseError::EmptyInput("Empty".to_string())).into();
        assert!(matches!(err, ApplicationError::Parse(_)));
        assert!(!err.is_fatal());
    }
}

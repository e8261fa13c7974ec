//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty book input: {0}")]
    EmptyInput(String),

    #[error("Unknown chapter kind: {0}")]
    UnknownChapterKind(String),

    #[error("Invalid book directory name: {0}")]
    InvalidBookDirectory(String),
}

//! Run Tracker Port - 批处理运行状态
//!
//! 记录每本书在一次运行中的处理状态，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run Tracker 错误
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Book not tracked: {0}")]
    NotFound(String),

    #[error("Book already tracked: {0}")]
    AlreadyExists(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// 单本书的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookRunState {
    /// 等待处理
    Pending,
    /// 正在统计角色关系
    Extracting,
    /// 正在计算中心性
    Ranking,
    /// 完成
    Done,
    /// 失败
    Failed,
}

impl BookRunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookRunState::Pending => "pending",
            BookRunState::Extracting => "extracting",
            BookRunState::Ranking => "ranking",
            BookRunState::Done => "done",
            BookRunState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookRunState::Done | BookRunState::Failed)
    }

    /// 关系已从表格读入时可以跳过 Extracting
    pub fn can_transition_to(&self, next: BookRunState) -> bool {
        use BookRunState::*;
        match (self, next) {
            (Pending, Extracting) | (Pending, Ranking) => true,
            (Extracting, Ranking) => true,
            (Ranking, Done) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

/// 单本书的运行记录
#[derive(Debug, Clone)]
pub struct BookRun {
    pub title: String,
    pub state: BookRunState,
    pub relationships: usize,
    pub characters: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    /// 失败时所处的阶段
    pub failed_in: Option<BookRunState>,
}

impl BookRun {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: BookRunState::Pending,
            relationships: 0,
            characters: 0,
            started_at: Utc::now(),
            finished_at: None,
            error_message: None,
            failed_in: None,
        }
    }
}

/// 运行汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
    pub unfinished: usize,
}

/// Run Tracker Port
///
/// 所有状态存储在内存中，只在一次运行内有效
pub trait RunTrackerPort: Send + Sync {
    /// 登记一本书（状态 Pending）
    fn register(&self, title: &str) -> Result<(), RunError>;

    fn get(&self, title: &str) -> Option<BookRun>;

    /// 设置状态，非法转换返回错误
    fn set_state(&self, title: &str, state: BookRunState) -> Result<(), RunError>;

    /// 设置失败并记录错误与失败时的阶段
    fn set_failed(&self, title: &str, error: String) -> Result<(), RunError>;

    /// 记录关系行数和中心性节点数
    fn record_counts(&self, title: &str, relationships: usize, characters: usize)
        -> Result<(), RunError>;

    /// 按登记顺序返回所有记录
    fn all(&self) -> Vec<BookRun>;

    fn summary(&self) -> RunSummary;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use BookRunState::*;
        assert!(Pending.can_transition_to(Extracting));
        assert!(Pending.can_transition_to(Ranking));
        assert!(Extracting.can_transition_to(Ranking));
        assert!(Ranking.can_transition_to(Done));
        assert!(Extracting.can_transition_to(Failed));
        assert!(!Done.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Ranking));
        assert!(!Pending.can_transition_to(Done));
    }
}

//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（RawBookSource、CharacterSource、BookStore、TableStore、RunTracker）
//! - commands: 关系统计与中心性计算命令及处理器
//! - queries: 书籍与角色加载查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        aggregate_relationships, AggregatedRelationships, ComputeCentralitiesHandler,
        ExtractRelationshipsHandler, ExtractRelationshipsResponse,
    },
    ComputeCentralities, ExtractRelationships,
};

pub use error::ApplicationError;

pub use ports::{
    // Book store
    content_hash,
    BookRecord,
    BookStoreError,
    BookStorePort,
    CachedBook,
    // Character source
    CharacterSourceError,
    CharacterSourcePort,
    // Raw source
    RawBook,
    RawBookEntry,
    RawBookSourcePort,
    RawSourceError,
    // Run tracker
    BookRun,
    BookRunState,
    RunError,
    RunSummary,
    RunTrackerPort,
    // Table store
    CentralityRow,
    RelationshipRow,
    TableError,
    TableStorePort,
};

pub use queries::{
    handlers::{LoadBooksHandler, LoadBooksResponse, LoadCharactersHandler, SkippedBook},
    LoadBooks, LoadCharacters,
};

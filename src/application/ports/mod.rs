//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod book_store;
mod character_source;
mod raw_source;
mod run_tracker;
mod table_store;

pub use book_store::{
    content_hash, BookRecord, BookStoreError, BookStorePort, CachedBook, ChapterRecord,
    SegmentRecord,
};
pub use character_source::{character_from_aliases, CharacterSourceError, CharacterSourcePort};
pub use raw_source::{
    book_number_from_dir, book_title_from_dir, RawBook, RawBookEntry, RawBookSourcePort,
    RawSourceError,
};
pub use run_tracker::{BookRun, BookRunState, RunError, RunSummary, RunTrackerPort};
pub use table_store::{
    centrality_table_name, CentralityRow, RelationshipRow, TableError, TableStorePort,
    RELATIONSHIP_TABLE,
};

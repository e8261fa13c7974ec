//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod memory;
pub mod persistence;
pub mod pipeline;
pub mod worker;

pub use adapters::{CsvTableStore, DirectoryRawBookSource, FileCharacterSource};
pub use memory::InMemoryRunTracker;
pub use persistence::sled::SledBookCache;
pub use pipeline::{Pipeline, PipelineReport};
pub use worker::{AnalysisOutcome, AnalysisWorker, AnalysisWorkerConfig};

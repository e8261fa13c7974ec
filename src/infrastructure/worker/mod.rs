//! Worker Layer - Background Book Processing
//!
//! 实现 AnalysisWorker，按书并发执行关系统计与中心性计算

mod analysis_worker;

pub use analysis_worker::{AnalysisOutcome, AnalysisWorker, AnalysisWorkerConfig};

//! Memory Layer - In-Memory State Management
//!
//! 实现 RunTracker，记录一次批处理运行中每本书的状态

mod run_tracker;

pub use run_tracker::InMemoryRunTracker;

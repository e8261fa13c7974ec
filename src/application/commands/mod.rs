//! 应用层 - 命令
//!
//! CQRS 命令侧：关系统计与中心性计算

mod analysis_commands;

pub mod handlers;

pub use analysis_commands::*;

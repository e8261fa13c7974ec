//! Chargraph - 小说角色共现关系与中心性分析
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 原始文本解析（章节、场景）
//! - Character Context: 角色别名与提及定位
//! - Relationship: 窗口共现统计
//! - Centrality: 关系图与中心性算法
//!
//! 应用层 (application/):
//! - Ports: 端口定义（RawBookSource, CharacterSource, BookStore, TableStore, RunTracker）
//! - Commands: 关系统计与中心性计算
//! - Queries: 书籍与角色加载
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 原始目录、别名文件、CSV 表格
//! - Persistence: Sled 解析结果缓存
//! - Memory: RunTracker 内存实现
//! - Worker: AnalysisWorker 按书并发处理
//! - Pipeline: 批处理组装

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：书籍与角色加载

mod book_queries;

pub mod handlers;

pub use book_queries::*;

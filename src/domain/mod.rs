//! Domain Layer - 领域层
//!
//! 包含四个限界上下文:
//! - Character Context: 角色与别名注册表
//! - Book Context: 书籍结构与原始文本解析
//! - Relationship Context: 角色共现关系
//! - Centrality Context: 关系图中心性
//!
//! 领域层全部为同步纯计算，不做 I/O

pub mod book;
pub mod centrality;
pub mod character;
pub mod relationship;

// 共享的分词器
pub mod tokenizer;

pub use tokenizer::{normalize_phrase, tokenize};

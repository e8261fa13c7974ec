//! Relationship Context - 角色关系限界上下文
//!
//! 职责:
//! - 基于窗口共现统计角色对的命中与提及次数

mod extractor;

pub use extractor::{
    dist, find_in_book, CharacterRelationship, RelationshipConfig, DEFAULT_THRESHOLD,
    DEFAULT_WINDOW,
};

//! Analysis Commands

use std::sync::Arc;

use crate::application::ports::RelationshipRow;
use crate::domain::book::Book;
use crate::domain::character::CharacterRegistry;

/// 统计一本书中所有角色对的共现关系
#[derive(Debug, Clone)]
pub struct ExtractRelationships {
    pub book: Arc<Book>,
    /// 该书的角色集合
    pub characters: Arc<CharacterRegistry>,
}

/// 由一本书的关系行计算中心性
#[derive(Debug, Clone)]
pub struct ComputeCentralities {
    pub title: String,
    pub rows: Vec<RelationshipRow>,
}

//! Table Store Port - 结果表格输出
//!
//! 关系表（所有书一个文件）与中心性表（每本书一个文件）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::centrality::CharacterCentrality;
use crate::domain::relationship::CharacterRelationship;

/// 关系表文件名
pub const RELATIONSHIP_TABLE: &str = "character_relationships.csv";

/// 中心性表文件名
pub fn centrality_table_name(title: &str) -> String {
    format!("Centralities {}.csv", title)
}

/// Table 错误
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("CSV error: {0}")]
    CsvError(String),
}

/// 关系表的一行（有序角色对）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub book: String,
    pub source: String,
    pub target: String,
    pub hits: usize,
    /// source 的提及次数
    pub mentions: usize,
    /// hits / mentions
    pub importance: f64,
}

impl RelationshipRow {
    pub fn from_relationship(book: &str, relationship: &CharacterRelationship) -> Self {
        Self {
            book: book.to_string(),
            source: relationship.source().ref_name().to_string(),
            target: relationship.target().ref_name().to_string(),
            hits: relationship.hits(),
            mentions: relationship.source_mentions(),
            importance: relationship.importance(),
        }
    }
}

/// 中心性表的一行（单个角色）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityRow {
    pub label: String,
    pub mentions: usize,
    pub text_rank: f64,
    pub own_text_rank: f64,
    pub eigenvector: f64,
    pub own_eigenvector: f64,
    pub katz: f64,
    pub own_katz: f64,
    pub degree: f64,
    pub harmonic: f64,
    pub closeness: f64,
    pub betweenness: f64,
}

impl CentralityRow {
    pub fn new(centrality: CharacterCentrality, mentions: usize) -> Self {
        Self {
            label: centrality.label,
            mentions,
            text_rank: centrality.text_rank,
            own_text_rank: centrality.own_text_rank,
            eigenvector: centrality.eigenvector,
            own_eigenvector: centrality.own_eigenvector,
            katz: centrality.katz,
            own_katz: centrality.own_katz,
            degree: centrality.degree,
            harmonic: centrality.harmonic,
            closeness: centrality.closeness,
            betweenness: centrality.betweenness,
        }
    }
}

/// Table Store Port
#[async_trait]
pub trait TableStorePort: Send + Sync {
    async fn relationships_exist(&self) -> bool;

    async fn read_relationships(&self) -> Result<Vec<RelationshipRow>, TableError>;

    async fn write_relationships(&self, rows: &[RelationshipRow]) -> Result<(), TableError>;

    async fn centralities_exist(&self, title: &str) -> bool;

    async fn write_centralities(&self, title: &str, rows: &[CentralityRow]) -> Result<(), TableError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centrality_table_name() {
        assert_eq!(
            centrality_table_name("Leviathan Wakes"),
            "Centralities Leviathan Wakes.csv"
        );
    }
}

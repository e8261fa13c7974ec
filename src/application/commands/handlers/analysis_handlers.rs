//! Analysis Command Handlers
//!
//! 关系统计与中心性计算都是同步的纯计算，调用方负责放到阻塞线程池执行

use std::collections::BTreeMap;

use crate::application::commands::{ComputeCentralities, ExtractRelationships};
use crate::application::error::ApplicationError;
use crate::application::ports::{CentralityRow, RelationshipRow};
use crate::domain::centrality::{
    compute_centralities, CentralitySettings, EdgeWeights, RelationshipGraph,
};
use crate::domain::relationship::{CharacterRelationship, RelationshipConfig};

// ============================================================================
// ExtractRelationships
// ============================================================================

/// 关系统计结果
#[derive(Debug, Clone)]
pub struct ExtractRelationshipsResponse {
    pub title: String,
    /// 每个成立的角色对产生两行（A -> B 与 B -> A）
    pub rows: Vec<RelationshipRow>,
    pub pairs_evaluated: usize,
}

/// ExtractRelationships Handler
pub struct ExtractRelationshipsHandler {
    config: RelationshipConfig,
}

impl ExtractRelationshipsHandler {
    pub fn new(config: RelationshipConfig) -> Self {
        Self { config }
    }

    /// 每个无序角色对只统计一次
    pub fn handle(&self, command: ExtractRelationships) -> ExtractRelationshipsResponse {
        let title = command.book.title().to_string();
        let pairs = command.characters.pairs();
        let pairs_evaluated = pairs.len();
        let mut rows = Vec::new();

        for (first, second) in pairs {
            let mut relationship = CharacterRelationship::new(first, second, self.config);
            relationship.find_in_book(&command.book);

            if relationship.have_relationship() {
                tracing::info!(
                    book = %title,
                    source = %relationship.source(),
                    target = %relationship.target(),
                    hits = relationship.hits(),
                    "Found pairing"
                );
                rows.push(RelationshipRow::from_relationship(&title, &relationship));
                rows.push(RelationshipRow::from_relationship(
                    &title,
                    &relationship.reversed(),
                ));
            }
        }

        tracing::debug!(
            book = %title,
            pairs = pairs_evaluated,
            rows = rows.len(),
            "Relationships extracted"
        );

        ExtractRelationshipsResponse {
            title,
            rows,
            pairs_evaluated,
        }
    }
}

// ============================================================================
// ComputeCentralities
// ============================================================================

/// 一本书的关系图与各角色的提及次数
#[derive(Debug, Clone)]
pub struct AggregatedRelationships {
    pub graph: RelationshipGraph,
    pub mentions: BTreeMap<String, usize>,
}

/// 汇总一本书的关系行
///
/// 节点为不同的 source，边为 `source -> { target: importance }`
pub fn aggregate_relationships(title: &str, rows: &[RelationshipRow]) -> AggregatedRelationships {
    let mut edges = EdgeWeights::new();
    let mut mentions = BTreeMap::new();

    for row in rows.iter().filter(|r| r.book == title) {
        edges
            .entry(row.source.clone())
            .or_default()
            .insert(row.target.clone(), Some(row.importance));
        mentions.insert(row.source.clone(), row.mentions);
    }

    let graph = RelationshipGraph::new(edges.keys().cloned(), &edges);
    AggregatedRelationships { graph, mentions }
}

/// ComputeCentralities Handler
pub struct ComputeCentralitiesHandler {
    settings: CentralitySettings,
}

impl ComputeCentralitiesHandler {
    pub fn new(settings: CentralitySettings) -> Self {
        Self { settings }
    }

    /// 返回按提及次数降序排列的中心性行
    pub fn handle(
        &self,
        command: ComputeCentralities,
    ) -> Result<Vec<CentralityRow>, ApplicationError> {
        let aggregated = aggregate_relationships(&command.title, &command.rows);

        tracing::info!(
            book = %command.title,
            characters = aggregated.graph.len(),
            edges = aggregated.graph.edge_count(),
            "Calculate centralities"
        );

        let centralities = compute_centralities(&aggregated.graph, self.settings)?;

        let mut rows: Vec<CentralityRow> = centralities
            .into_iter()
            .map(|c| {
                let mentions = aggregated.mentions.get(&c.label).copied().unwrap_or(0);
                CentralityRow::new(c, mentions)
            })
            .collect();
        rows.sort_by(|a, b| b.mentions.cmp(&a.mentions));

        Ok(rows)
    }
}

//! Centrality Report
//!
//! 汇总参考结果与自实现结果，每个角色一行

use super::{
    CentralityCalculator, CentralityError, CentralitySettings, ReferenceCentrality,
    RelationshipGraph,
};

/// 单个角色的全部中心性指标
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterCentrality {
    pub label: String,
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

/// 计算关系图中每个节点的全部指标，按节点排序返回
///
/// 任何一个指标失败都使整本书的计算失败
pub fn compute_centralities(
    graph: &RelationshipGraph,
    settings: CentralitySettings,
) -> Result<Vec<CharacterCentrality>, CentralityError> {
    let own = CentralityCalculator::new(graph, settings);
    let reference = ReferenceCentrality::new(graph, settings);

    let text_rank = reference.page_rank();
    let own_text_rank = own.text_rank();
    let eigenvector = reference.eigenvector()?;
    let own_eigenvector = own.eigenvector();
    let katz = reference.katz()?;
    let own_katz = own.katz()?;
    let degree = own.degree();
    let harmonic = own.harmonic();
    let closeness = own.closeness();
    let betweenness = reference.betweenness();

    let value = |scores: &super::NodeScores, node: &str| scores.get(node).copied().unwrap_or(0.0);

    Ok(graph
        .nodes()
        .iter()
        .map(|node| CharacterCentrality {
            label: node.clone(),
            text_rank: value(&text_rank, node),
            own_text_rank: value(&own_text_rank, node),
            eigenvector: value(&eigenvector, node),
            own_eigenvector: value(&own_eigenvector, node),
            katz: value(&katz, node),
            own_katz: value(&own_katz, node),
            degree: value(&degree, node),
            harmonic: value(&harmonic, node),
            closeness: value(&closeness, node),
            betweenness: value(&betweenness, node),
        })
        .collect())
}

//! Reference Centralities
//!
//! 图算法库给出的参考结果，用于交叉验证自实现的算法。
//! 计算在对称化（无向）的非加权图上进行，结果按最大值归一

use std::convert::Infallible;

use rustworkx_core::centrality::{betweenness_centrality, eigenvector_centrality, katz_centrality};
use rustworkx_core::petgraph::algo::page_rank;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};

use super::calculator::{norm_to_one, CentralitySettings, NodeScores};
use super::{CentralityError, RelationshipGraph};

/// 节点数超过该值时并行计算介数中心性
const BETWEENNESS_PARALLEL_THRESHOLD: usize = 50;

pub struct ReferenceCentrality<'a> {
    graph: &'a RelationshipGraph,
    settings: CentralitySettings,
    undirected: DiGraph<(), f64>,
}

impl<'a> ReferenceCentrality<'a> {
    pub fn new(graph: &'a RelationshipGraph, settings: CentralitySettings) -> Self {
        let undirected = symmetric_digraph(graph);
        Self {
            graph,
            settings,
            undirected,
        }
    }

    pub fn page_rank(&self) -> NodeScores {
        if self.graph.is_empty() {
            return NodeScores::new();
        }
        let ranks = page_rank(
            &self.undirected,
            self.settings.damping,
            self.settings.max_iterations,
        );
        self.scores(norm_to_one(ranks))
    }

    pub fn eigenvector(&self) -> Result<NodeScores, CentralityError> {
        if self.graph.is_empty() {
            return Ok(NodeScores::new());
        }
        let result = eigenvector_centrality(
            &self.undirected,
            |_| Ok::<f64, Infallible>(1.0),
            Some(self.settings.max_iterations),
            Some(self.settings.tolerance),
        )
        .unwrap_or_else(|never| match never {});

        let vector = result.ok_or_else(|| CentralityError::NotConverged {
            metric: "eigenvector".to_string(),
        })?;
        Ok(self.scores(norm_to_one(vector)))
    }

    pub fn katz(&self) -> Result<NodeScores, CentralityError> {
        if self.graph.is_empty() {
            return Ok(NodeScores::new());
        }
        let result = katz_centrality(
            &self.undirected,
            |_| Ok::<f64, Infallible>(1.0),
            Some(self.settings.katz_alpha),
            None,
            Some(1.0),
            Some(self.settings.max_iterations),
            Some(self.settings.tolerance),
        )
        .unwrap_or_else(|never| match never {});

        let vector = result.ok_or_else(|| CentralityError::NotConverged {
            metric: "katz".to_string(),
        })?;
        Ok(self.scores(norm_to_one(vector)))
    }

    /// 介数中心性（无自实现版本）
    pub fn betweenness(&self) -> NodeScores {
        if self.graph.is_empty() {
            return NodeScores::new();
        }
        let values: Vec<f64> = betweenness_centrality(
            &self.undirected,
            false,
            true,
            BETWEENNESS_PARALLEL_THRESHOLD,
        )
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
        self.scores(norm_to_one(values))
    }

    fn scores(&self, vector: Vec<f64>) -> NodeScores {
        self.graph.nodes().iter().cloned().zip(vector).collect()
    }
}

/// 节点下标与关系图一致；每条无向边以两个方向的有向边表示
fn symmetric_digraph(graph: &RelationshipGraph) -> DiGraph<(), f64> {
    let edges = graph.undirected_edges();
    let mut digraph = DiGraph::with_capacity(graph.len(), edges.len() * 2);
    let indices: Vec<NodeIndex> = (0..graph.len()).map(|_| digraph.add_node(())).collect();

    for (a, b) in edges {
        digraph.add_edge(indices[a], indices[b], 1.0);
        digraph.add_edge(indices[b], indices[a], 1.0);
    }
    digraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::centrality::{CentralityCalculator, EdgeWeights};

    fn symmetric(nodes: &[&str], pairs: &[(&str, &str)]) -> RelationshipGraph {
        let mut weights = EdgeWeights::new();
        for &(a, b) in pairs {
            weights.entry(a.to_string()).or_default().insert(b.to_string(), None);
            weights.entry(b.to_string()).or_default().insert(a.to_string(), None);
        }
        RelationshipGraph::new(nodes.iter().copied(), &weights)
    }

    fn crew() -> RelationshipGraph {
        symmetric(
            &["alex", "amos", "holden", "miller", "naomi"],
            &[
                ("holden", "naomi"),
                ("holden", "amos"),
                ("holden", "alex"),
                ("holden", "miller"),
                ("naomi", "amos"),
                ("alex", "naomi"),
            ],
        )
    }

    #[test]
    fn test_katz_matches_direct_solve() {
        let graph = crew();
        let settings = CentralitySettings::default();
        let own = CentralityCalculator::new(&graph, settings).katz().unwrap();
        let reference = ReferenceCentrality::new(&graph, settings).katz().unwrap();

        for node in graph.nodes() {
            assert!(
                (own[node] - reference[node]).abs() < 1e-5,
                "{}: own {} vs reference {}",
                node,
                own[node],
                reference[node]
            );
        }
    }

    #[test]
    fn test_hub_ranks_first_in_every_metric() {
        let graph = crew();
        let reference = ReferenceCentrality::new(&graph, CentralitySettings::default());

        assert_eq!(reference.page_rank()["holden"], 1.0);
        assert_eq!(reference.eigenvector().unwrap()["holden"], 1.0);
        assert_eq!(reference.katz().unwrap()["holden"], 1.0);
        assert_eq!(reference.betweenness()["holden"], 1.0);
    }

    #[test]
    fn test_leaf_has_no_betweenness() {
        let graph = crew();
        let reference = ReferenceCentrality::new(&graph, CentralitySettings::default());
        assert_eq!(reference.betweenness()["miller"], 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let graph = RelationshipGraph::default();
        let reference = ReferenceCentrality::new(&graph, CentralitySettings::default());
        assert!(reference.page_rank().is_empty());
        assert!(reference.eigenvector().unwrap().is_empty());
        assert!(reference.katz().unwrap().is_empty());
        assert!(reference.betweenness().is_empty());
    }
}

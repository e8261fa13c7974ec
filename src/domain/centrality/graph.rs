//! Relationship Graph
//!
//! 由不可变的节点列表与边权映射构建邻接矩阵

use std::collections::{BTreeMap, HashMap};

use super::DenseMatrix;

/// `source -> { target: weight }`，weight 缺省时按单位权重处理
pub type EdgeWeights = BTreeMap<String, BTreeMap<String, Option<f64>>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub weight: Option<f64>,
}

/// 单本书的角色关系图（每次运行重新构建，不持久化）
///
/// 不变量:
/// - 节点按标识排序且唯一，行列下标即排序后的位置
/// - 边的两端都在节点集合中
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
}

impl RelationshipGraph {
    pub fn new<I, S>(nodes: I, edge_weights: &EdgeWeights) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut nodes: Vec<String> = nodes.into_iter().map(Into::into).collect();
        nodes.sort();
        nodes.dedup();

        let index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.clone(), i))
            .collect();

        let mut edges = Vec::new();
        for (source, targets) in edge_weights {
            let Some(&i) = index.get(source) else {
                tracing::debug!(source = %source, "Edge source is not a node, skipped");
                continue;
            };
            for (target, weight) in targets {
                let Some(&j) = index.get(target) else {
                    tracing::debug!(source = %source, target = %target, "Edge target is not a node, skipped");
                    continue;
                };
                edges.push(GraphEdge {
                    source: i,
                    target: j,
                    weight: *weight,
                });
            }
        }

        Self {
            nodes,
            index,
            edges,
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// 邻接矩阵：边 `i -> j` 对应 `[i][j]`
    ///
    /// 非加权时为 1；加权时使用边权，缺省权重为 1
    pub fn adjacency(&self, weighted: bool) -> DenseMatrix {
        let mut matrix = DenseMatrix::zeros(self.nodes.len());
        for edge in &self.edges {
            let value = if weighted {
                edge.weight.unwrap_or(1.0)
            } else {
                1.0
            };
            matrix.set(edge.source, edge.target, value);
        }
        matrix
    }

    /// 按列归一化的邻接矩阵（列随机矩阵，全零列除外）
    pub fn normalized_adjacency(&self, weighted: bool) -> DenseMatrix {
        self.adjacency(weighted).normalized_by_columns()
    }

    /// 对称化后的无向边（去掉自环，每对只出现一次）
    pub fn undirected_edges(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .edges
            .iter()
            .filter(|e| e.source != e.target)
            .map(|e| (e.source.min(e.target), e.source.max(e.target)))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(items: &[(&str, &str, Option<f64>)]) -> EdgeWeights {
        let mut map = EdgeWeights::new();
        for (source, target, weight) in items {
            map.entry(source.to_string())
                .or_default()
                .insert(target.to_string(), *weight);
        }
        map
    }

    #[test]
    fn test_nodes_sorted_and_unique() {
        let graph = RelationshipGraph::new(["naomi", "amos", "naomi", "holden"], &EdgeWeights::new());
        assert_eq!(graph.nodes(), &["amos", "holden", "naomi"]);
        assert_eq!(graph.index_of("holden"), Some(1));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_adjacency_orientation_and_weights() {
        let graph = RelationshipGraph::new(
            ["a", "b", "c"],
            &weights(&[("a", "b", Some(0.5)), ("b", "c", None), ("c", "zed", Some(1.0))]),
        );
        // 指向未知节点的边被丢弃
        assert_eq!(graph.edge_count(), 2);

        let plain = graph.adjacency(false);
        assert_eq!(plain.get(0, 1), 1.0);
        assert_eq!(plain.get(1, 0), 0.0);

        let weighted = graph.adjacency(true);
        assert_eq!(weighted.get(0, 1), 0.5);
        assert_eq!(weighted.get(1, 2), 1.0);
    }

    #[test]
    fn test_undirected_edges() {
        let graph = RelationshipGraph::new(
            ["a", "b", "c"],
            &weights(&[("a", "b", None), ("b", "a", None), ("c", "c", None), ("c", "a", None)]),
        );
        assert_eq!(graph.undirected_edges(), vec![(0, 1), (0, 2)]);
    }
}

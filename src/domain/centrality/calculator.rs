//! Centrality Calculator
//!
//! 各中心性算法的独立数值实现，输入为关系图的邻接矩阵

use std::collections::BTreeMap;

use super::{CentralityError, DenseMatrix, RelationshipGraph};

pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_KATZ_ALPHA: f64 = 0.1;

/// 节点标识 -> 中心性数值
pub type NodeScores = BTreeMap<String, f64>;

/// 数值参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralitySettings {
    /// 阻尼系数
    pub damping: f64,
    /// 迭代值之和的变化量低于该值时停止
    pub tolerance: f64,
    pub max_iterations: usize,
    pub katz_alpha: f64,
    /// 使用边权代替 1
    pub weighted: bool,
}

impl Default for CentralitySettings {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            katz_alpha: DEFAULT_KATZ_ALPHA,
            weighted: false,
        }
    }
}

/// 将向量按最大值缩放到 1；最大值不为正时原样返回
pub fn norm_to_one(mut vector: Vec<f64>) -> Vec<f64> {
    let max = vector.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        for value in vector.iter_mut() {
            *value /= max;
        }
    }
    vector
}

pub struct CentralityCalculator<'a> {
    graph: &'a RelationshipGraph,
    settings: CentralitySettings,
}

impl<'a> CentralityCalculator<'a> {
    pub fn new(graph: &'a RelationshipGraph, settings: CentralitySettings) -> Self {
        Self { graph, settings }
    }

    pub fn graph(&self) -> &RelationshipGraph {
        self.graph
    }

    pub fn settings(&self) -> &CentralitySettings {
        &self.settings
    }

    /// TextRank（PageRank 类）：`v <- (1 - d) + d · g · v`，最后按最大值归一
    pub fn text_rank(&self) -> NodeScores {
        if self.graph.is_empty() {
            return NodeScores::new();
        }
        let g = self.graph.normalized_adjacency(self.settings.weighted);
        let offset = 1.0 - self.settings.damping;
        let damping = self.settings.damping;

        let vector = self.power_iteration(&g, |product| {
            product.into_iter().map(|p| offset + damping * p).collect()
        });
        self.scores(norm_to_one(vector))
    }

    /// 特征向量中心性：`v <- g · v`，最后按最大值归一
    pub fn eigenvector(&self) -> NodeScores {
        if self.graph.is_empty() {
            return NodeScores::new();
        }
        let g = self.graph.normalized_adjacency(self.settings.weighted);

        let vector = self.power_iteration(&g, |product| product);
        self.scores(norm_to_one(vector))
    }

    /// 从全 1 向量开始迭代，直到迭代值之和的变化低于阈值或达到迭代上限
    fn power_iteration<F>(&self, g: &DenseMatrix, update: F) -> Vec<f64>
    where
        F: Fn(Vec<f64>) -> Vec<f64>,
    {
        let mut vector = vec![1.0; g.size()];
        let mut previous_sum = 0.0;

        for _ in 0..self.settings.max_iterations {
            vector = update(g.mul_vec(&vector));
            let sum: f64 = vector.iter().sum();
            if (previous_sum - sum).abs() < self.settings.tolerance {
                break;
            }
            previous_sum = sum;
        }

        vector
    }

    /// 使用配置中的衰减系数计算 Katz 中心性
    pub fn katz(&self) -> Result<NodeScores, CentralityError> {
        self.katz_with_alpha(self.settings.katz_alpha)
    }

    /// Katz 中心性：直接求解 `(I - α·Aᵀ) · x = 1`，没有迭代回退
    pub fn katz_with_alpha(&self, alpha: f64) -> Result<NodeScores, CentralityError> {
        let size = self.graph.len();
        if size == 0 {
            return Ok(NodeScores::new());
        }
        let transposed = self.graph.adjacency(self.settings.weighted).transpose();
        let system = DenseMatrix::identity(size).subtract(&transposed.scaled(alpha));
        let centrality = system.solve(&vec![1.0; size])?;
        Ok(self.scores(norm_to_one(centrality)))
    }

    /// 度中心性：列和 / (n - 1)
    pub fn degree(&self) -> NodeScores {
        let Some(divisor) = self.others() else {
            return self.zeros();
        };
        let sums = self.graph.adjacency(self.settings.weighted).column_sums();
        self.scores(sums.into_iter().map(|s| s / divisor).collect())
    }

    /// 调和中心性：到达该节点的距离倒数之和 / (n - 1)
    pub fn harmonic(&self) -> NodeScores {
        let Some(divisor) = self.others() else {
            return self.zeros();
        };
        let dist = self.distances();
        let n = dist.size();

        let result = (0..n)
            .map(|j| {
                let reciprocal: f64 = (0..n)
                    .map(|i| dist.get(i, j))
                    .filter(|d| *d != 0.0 && d.is_finite())
                    .map(|d| 1.0 / d)
                    .sum();
                reciprocal / divisor
            })
            .collect();
        self.scores(result)
    }

    /// 接近中心性：(n - 1) / 到达该节点的距离之和；存在不可达节点时为 0
    pub fn closeness(&self) -> NodeScores {
        let Some(divisor) = self.others() else {
            return self.zeros();
        };
        let dist = self.distances();
        let n = dist.size();

        let result = (0..n)
            .map(|j| {
                let total: f64 = (0..n).map(|i| dist.get(i, j)).sum();
                if total > 0.0 {
                    divisor / total
                } else {
                    0.0
                }
            })
            .collect();
        self.scores(result)
    }

    fn distances(&self) -> DenseMatrix {
        self.graph.adjacency(self.settings.weighted).shortest_paths()
    }

    /// `n - 1`；n 为 0 或 1 时没有定义
    fn others(&self) -> Option<f64> {
        match self.graph.len() {
            0 | 1 => None,
            n => Some((n - 1) as f64),
        }
    }

    fn zeros(&self) -> NodeScores {
        self.scores(vec![0.0; self.graph.len()])
    }

    fn scores(&self, vector: Vec<f64>) -> NodeScores {
        self.graph.nodes().iter().cloned().zip(vector).collect()
    }
}

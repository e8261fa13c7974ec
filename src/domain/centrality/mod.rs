//! Centrality Context - 中心性限界上下文
//!
//! 职责:
//! - 由角色关系构建邻接矩阵
//! - 自实现的中心性算法（TextRank、特征向量、Katz、度、调和、接近）
//! - 图算法库参考结果（交叉验证及介数中心性）

mod calculator;
mod errors;
mod graph;
mod matrix;
mod reference;
mod report;

pub use calculator::{
    norm_to_one, CentralityCalculator, CentralitySettings, NodeScores, DEFAULT_DAMPING,
    DEFAULT_KATZ_ALPHA, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
pub use errors::CentralityError;
pub use graph::{EdgeWeights, GraphEdge, RelationshipGraph};
pub use matrix::DenseMatrix;
pub use reference::ReferenceCentrality;
pub use report::{compute_centralities, CharacterCentrality};

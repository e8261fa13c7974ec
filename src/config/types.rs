//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::centrality::{
    CentralitySettings, DEFAULT_DAMPING, DEFAULT_KATZ_ALPHA, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};
use crate::domain::relationship::{self, DEFAULT_THRESHOLD, DEFAULT_WINDOW};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 数据目录配置
    #[serde(default)]
    pub data: DataConfig,

    /// 共现关系配置
    #[serde(default)]
    pub relationship: RelationshipConfig,

    /// 中心性配置
    #[serde(default)]
    pub centrality: CentralityConfig,

    /// 批处理配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 数据目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// 原始文本目录，每本书一个 `NN_标题` 子目录
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,

    /// 参考数据目录（角色别名文件位于 `characters/` 下）
    #[serde(default = "default_references_dir")]
    pub references_dir: PathBuf,

    /// CSV 输出目录
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// 解析结果缓存（sled 数据库）路径
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_references_dir() -> PathBuf {
    PathBuf::from("references")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/interim/books.sled")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            references_dir: default_references_dir(),
            processed_dir: default_processed_dir(),
            cache_path: default_cache_path(),
        }
    }
}

impl DataConfig {
    /// 全局角色别名目录
    pub fn characters_dir(&self) -> PathBuf {
        self.references_dir.join("characters")
    }
}

/// 共现关系配置
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipConfig {
    /// 查找窗口（单词数）
    #[serde(default = "default_window")]
    pub window: usize,

    /// 命中数需严格大于该值才算有关系
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            threshold: default_threshold(),
        }
    }
}

impl From<&RelationshipConfig> for relationship::RelationshipConfig {
    fn from(config: &RelationshipConfig) -> Self {
        Self {
            window: config.window,
            threshold: config.threshold,
        }
    }
}

/// 中心性配置
#[derive(Debug, Clone, Deserialize)]
pub struct CentralityConfig {
    /// 阻尼系数
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// 收敛阈值
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 最大迭代次数
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Katz 衰减系数
    #[serde(default = "default_katz_alpha")]
    pub katz_alpha: f64,

    /// 是否以 importance 作为边权
    #[serde(default)]
    pub weighted: bool,
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_katz_alpha() -> f64 {
    DEFAULT_KATZ_ALPHA
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            katz_alpha: default_katz_alpha(),
            weighted: false,
        }
    }
}

impl From<&CentralityConfig> for CentralitySettings {
    fn from(config: &CentralityConfig) -> Self {
        Self {
            damping: config.damping,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            katz_alpha: config.katz_alpha,
            weighted: config.weighted,
        }
    }
}

/// 批处理配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 同时处理的书籍数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 跳过中篇（编号为小数的书）
    #[serde(default = "default_novels_only")]
    pub novels_only: bool,

    /// 忽略缓存，重新解析所有书籍
    #[serde(default)]
    pub overwrite_interim: bool,

    /// 覆盖已存在的 CSV 输出
    #[serde(default)]
    pub overwrite_processed: bool,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_novels_only() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            novels_only: default_novels_only(),
            overwrite_interim: false,
            overwrite_processed: false,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

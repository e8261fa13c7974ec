//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（chargraph.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["chargraph", "chargraph.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CHARGRAPH_`，层级分隔符 `__`）
/// 2. 配置文件（chargraph.toml 或 chargraph.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `CHARGRAPH_DATA__RAW_DIR=/corpus/raw`
/// - `CHARGRAPH_RELATIONSHIP__WINDOW=20`
/// - `CHARGRAPH_CENTRALITY__WEIGHTED=true`
/// - `CHARGRAPH_PIPELINE__MAX_CONCURRENT=4`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("data.raw_dir", "data/raw")?
        .set_default("data.references_dir", "references")?
        .set_default("data.processed_dir", "data/processed")?
        .set_default("data.cache_path", "data/interim/books.sled")?
        .set_default("relationship.window", 15)?
        .set_default("relationship.threshold", 2)?
        .set_default("centrality.damping", 0.85)?
        .set_default("centrality.tolerance", 1e-8)?
        .set_default("centrality.max_iterations", 1000)?
        .set_default("centrality.katz_alpha", 0.1)?
        .set_default("centrality.weighted", false)?
        .set_default("pipeline.max_concurrent", 2)?
        .set_default("pipeline.novels_only", true)?
        .set_default("pipeline.overwrite_interim", false)?
        .set_default("pipeline.overwrite_processed", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("CHARGRAPH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.relationship.window == 0 {
        return Err(ConfigError::ValidationError(
            "Relationship window cannot be 0".to_string(),
        ));
    }

    let centrality = &config.centrality;
    if !(centrality.damping > 0.0 && centrality.damping < 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "Damping must be in (0, 1), got {}",
            centrality.damping
        )));
    }
    if centrality.tolerance <= 0.0 {
        return Err(ConfigError::ValidationError(
            "Tolerance must be positive".to_string(),
        ));
    }
    if centrality.max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "Max iterations cannot be 0".to_string(),
        ));
    }
    if centrality.katz_alpha <= 0.0 {
        return Err(ConfigError::ValidationError(
            "Katz alpha must be positive".to_string(),
        ));
    }

    if config.pipeline.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Max concurrent books cannot be 0".to_string(),
        ));
    }

    let data = &config.data;
    for (name, path) in [
        ("raw_dir", &data.raw_dir),
        ("references_dir", &data.references_dir),
        ("processed_dir", &data.processed_dir),
        ("cache_path", &data.cache_path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Data path {} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Raw Directory: {:?}", config.data.raw_dir);
    tracing::info!("References Directory: {:?}", config.data.references_dir);
    tracing::info!("Processed Directory: {:?}", config.data.processed_dir);
    tracing::info!("Cache: {:?}", config.data.cache_path);
    tracing::info!(
        "Relationship: window={}, threshold={}",
        config.relationship.window,
        config.relationship.threshold
    );
    tracing::info!(
        "Centrality: damping={}, tolerance={:e}, max_iterations={}, katz_alpha={}, weighted={}",
        config.centrality.damping,
        config.centrality.tolerance,
        config.centrality.max_iterations,
        config.centrality.katz_alpha,
        config.centrality.weighted
    );
    tracing::info!("Max Concurrent Books: {}", config.pipeline.max_concurrent);
    tracing::info!("Novels Only: {}", config.pipeline.novels_only);
    if config.pipeline.overwrite_interim {
        tracing::info!("Overwrite Interim: true");
    }
    if config.pipeline.overwrite_processed {
        tracing::info!("Overwrite Processed: true");
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

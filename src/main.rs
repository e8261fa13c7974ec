//! Chargraph - 小说角色共现关系与中心性分析
//!
//! 批处理入口：解析原始文本，统计角色关系，计算中心性并写出 CSV

use chargraph::config::{load_config, print_config, AppConfig};
use chargraph::infrastructure::Pipeline;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},chargraph={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Chargraph - 角色共现关系与中心性分析");
    print_config(&config);

    let pipeline = Pipeline::from_config(&config).await?;
    let report = pipeline.run().await?;

    for skipped in &report.skipped {
        tracing::warn!(book = %skipped.title, reason = %skipped.reason, "Book skipped");
    }
    for run in pipeline.tracker().all() {
        if let Some(error) = &run.error_message {
            tracing::warn!(book = %run.title, state = run.state.as_str(), error = %error, "Book failed");
        }
    }

    tracing::info!(
        books = report.books,
        skipped = report.skipped.len(),
        done = report.summary.done,
        failed = report.summary.failed,
        relationships = report.relationships,
        relationships_written = report.relationships_written,
        "Run complete"
    );

    Ok(())
}

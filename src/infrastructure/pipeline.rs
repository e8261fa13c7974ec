//! Batch Pipeline
//!
//! 组装所有端口实现与处理器：加载角色 -> 加载书籍 -> 按书分析 -> 写出关系表

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookStorePort, CharacterSourcePort, RawBookSourcePort, RelationshipRow, RunSummary,
    RunTrackerPort, TableStorePort,
};
use crate::application::queries::handlers::{
    LoadBooksHandler, LoadCharactersHandler, SkippedBook,
};
use crate::application::queries::{LoadBooks, LoadCharacters};
use crate::config::AppConfig;
use crate::infrastructure::adapters::{CsvTableStore, DirectoryRawBookSource, FileCharacterSource};
use crate::infrastructure::memory::InMemoryRunTracker;
use crate::infrastructure::persistence::sled::SledBookCache;
use crate::infrastructure::worker::{AnalysisWorker, AnalysisWorkerConfig};

/// 一次运行的报告
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub books: usize,
    pub skipped: Vec<SkippedBook>,
    pub relationships: usize,
    /// 关系表是否为本次运行写出（否则沿用已有文件）
    pub relationships_written: bool,
    pub summary: RunSummary,
}

/// 批处理流水线
pub struct Pipeline {
    config: AppConfig,
    raw_source: Arc<dyn RawBookSourcePort>,
    characters: Arc<dyn CharacterSourcePort>,
    book_cache: Arc<SledBookCache>,
    tables: Arc<dyn TableStorePort>,
    tracker: Arc<dyn RunTrackerPort>,
}

impl Pipeline {
    /// 按配置创建所有适配器
    pub async fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let raw_source = Arc::new(DirectoryRawBookSource::new(&config.data.raw_dir));
        let characters = Arc::new(FileCharacterSource::new(config.data.characters_dir()));
        let book_cache = SledBookCache::open(&config.data.cache_path)?.arc();
        let tables = Arc::new(CsvTableStore::new(&config.data.processed_dir).await?);
        let tracker = InMemoryRunTracker::new().arc();

        Ok(Self {
            config: config.clone(),
            raw_source,
            characters,
            book_cache,
            tables,
            tracker,
        })
    }

    pub fn tracker(&self) -> Arc<dyn RunTrackerPort> {
        self.tracker.clone()
    }

    /// 执行一次完整运行
    ///
    /// 角色目录缺失时立即返回配置错误；单本书的失败只记录在 RunTracker 中
    pub async fn run(&self) -> Result<PipelineReport, ApplicationError> {
        let pipeline = &self.config.pipeline;

        // 全局角色用于解析视角角色
        let registry = LoadCharactersHandler::new(self.characters.clone())
            .handle(LoadCharacters { book: None })
            .await?;
        tracing::info!(characters = registry.len(), "Global characters loaded");

        let store: Arc<dyn BookStorePort> = self.book_cache.clone();
        let loaded = LoadBooksHandler::new(self.raw_source.clone(), store, registry)
            .handle(LoadBooks {
                novels_only: pipeline.novels_only,
                overwrite_interim: pipeline.overwrite_interim,
            })
            .await?;
        self.book_cache.flush()?;

        let existing = self.existing_relationships().await?;
        let reused = existing.is_some();

        let worker = AnalysisWorker::new(
            AnalysisWorkerConfig {
                max_concurrent: pipeline.max_concurrent,
                overwrite_processed: pipeline.overwrite_processed,
                relationship: (&self.config.relationship).into(),
                centrality: (&self.config.centrality).into(),
            },
            self.characters.clone(),
            self.tables.clone(),
            self.tracker.clone(),
        );
        let books = loaded.books.len();
        let outcome = worker.run(loaded.books, existing).await;

        if !reused {
            self.tables
                .write_relationships(&outcome.relationships)
                .await?;
            tracing::info!(
                rows = outcome.relationships.len(),
                "Relationship table written"
            );
        }

        Ok(PipelineReport {
            books,
            skipped: loaded.skipped,
            relationships: outcome.relationships.len(),
            relationships_written: !reused,
            summary: outcome.summary,
        })
    }

    async fn existing_relationships(
        &self,
    ) -> Result<Option<Arc<Vec<RelationshipRow>>>, ApplicationError> {
        if self.config.pipeline.overwrite_processed || !self.tables.relationships_exist().await {
            return Ok(None);
        }

        let rows = self.tables.read_relationships().await?;
        tracing::info!(rows = rows.len(), "Existing relationship table reused");
        Ok(Some(Arc::new(rows)))
    }
}

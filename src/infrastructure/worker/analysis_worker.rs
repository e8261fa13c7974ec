//! Analysis Worker - Per-Book Relationship and Centrality Processor

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::application::commands::handlers::{
    ComputeCentralitiesHandler, ExtractRelationshipsHandler,
};
use crate::application::commands::{ComputeCentralities, ExtractRelationships};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookRunState, CharacterSourcePort, RelationshipRow, RunSummary, RunTrackerPort,
    TableStorePort,
};
use crate::domain::book::Book;
use crate::domain::centrality::CentralitySettings;
use crate::domain::relationship::RelationshipConfig;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct AnalysisWorkerConfig {
    /// 同时处理的最大书籍数
    pub max_concurrent: usize,
    /// 覆盖已存在的中心性表
    pub overwrite_processed: bool,
    pub relationship: RelationshipConfig,
    pub centrality: CentralitySettings,
}

impl Default for AnalysisWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            overwrite_processed: false,
            relationship: RelationshipConfig::default(),
            centrality: CentralitySettings::default(),
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    /// 按书籍顺序排列的关系行
    pub relationships: Vec<RelationshipRow>,
    pub summary: RunSummary,
}

/// 单本书处理所需的共享依赖
#[derive(Clone)]
struct BookJob {
    config: AnalysisWorkerConfig,
    characters: Arc<dyn CharacterSourcePort>,
    tables: Arc<dyn TableStorePort>,
    tracker: Arc<dyn RunTrackerPort>,
}

/// 分析 Worker
///
/// 每本书是一个独立的处理单元：关系统计 -> 中心性计算 -> 写出中心性表。
/// 单本书失败只记录在 RunTracker 中，不影响其他书
pub struct AnalysisWorker {
    job: BookJob,
}

impl AnalysisWorker {
    pub fn new(
        config: AnalysisWorkerConfig,
        characters: Arc<dyn CharacterSourcePort>,
        tables: Arc<dyn TableStorePort>,
        tracker: Arc<dyn RunTrackerPort>,
    ) -> Self {
        Self {
            job: BookJob {
                config,
                characters,
                tables,
                tracker,
            },
        }
    }

    /// 处理所有书籍
    ///
    /// `existing` 为已有的关系表；提供时跳过关系统计，直接使用其中属于该书的行
    pub async fn run(
        &self,
        books: Vec<Arc<Book>>,
        existing: Option<Arc<Vec<RelationshipRow>>>,
    ) -> AnalysisOutcome {
        tracing::info!(
            books = books.len(),
            max_concurrent = self.job.config.max_concurrent,
            reuse_relationships = existing.is_some(),
            "AnalysisWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(Semaphore::new(self.job.config.max_concurrent.max(1)));
        let mut handles = Vec::with_capacity(books.len());

        for book in books {
            let title = book.title().to_string();
            if let Err(e) = self.job.tracker.register(&title) {
                tracing::warn!(book = %title, error = %e, "Book already processed in this run");
                continue;
            }

            let semaphore = semaphore.clone();
            let job = self.job.clone();
            let existing = existing.clone();

            handles.push(tokio::spawn(async move {
                // 持有 permit 直到该书处理完成
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        job.mark_failed(&title, e.to_string());
                        return Vec::new();
                    }
                };

                let rows = match job.relationships(&book, existing).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        tracing::error!(book = %title, error = %e, "Relationship extraction failed");
                        job.mark_failed(&title, e.to_string());
                        return Vec::new();
                    }
                };

                // 中心性失败不影响关系行的输出
                if let Err(e) = job.rank(&title, &rows).await {
                    tracing::error!(book = %title, error = %e, "Centrality computation failed");
                    job.mark_failed(&title, e.to_string());
                }
                rows
            }));
        }

        let mut relationships = Vec::new();
        for result in join_all(handles).await {
            match result {
                Ok(rows) => relationships.extend(rows),
                Err(e) => tracing::error!(error = %e, "Book task panicked"),
            }
        }

        let summary = self.job.tracker.summary();
        tracing::info!(
            total = summary.total,
            done = summary.done,
            failed = summary.failed,
            relationships = relationships.len(),
            "AnalysisWorker finished"
        );

        AnalysisOutcome {
            relationships,
            summary,
        }
    }
}

impl BookJob {
    /// 取得单本书的关系行：沿用已有关系表中属于该书的行，或重新统计
    async fn relationships(
        &self,
        book: &Arc<Book>,
        existing: Option<Arc<Vec<RelationshipRow>>>,
    ) -> Result<Vec<RelationshipRow>, ApplicationError> {
        let title = book.title().to_string();

        let rows = match existing {
            Some(all) => {
                let rows: Vec<RelationshipRow> =
                    all.iter().filter(|r| r.book == title).cloned().collect();
                tracing::debug!(book = %title, rows = rows.len(), "Relationships reused");
                rows
            }
            None => {
                self.tracker.set_state(&title, BookRunState::Extracting)?;
                let registry = self.characters.load_for_book(&title).await?;

                let handler = ExtractRelationshipsHandler::new(self.config.relationship);
                let command = ExtractRelationships {
                    book: book.clone(),
                    characters: Arc::new(registry),
                };
                let response = tokio::task::spawn_blocking(move || handler.handle(command))
                    .await
                    .map_err(|e| ApplicationError::internal(e.to_string()))?;

                tracing::info!(
                    book = %title,
                    pairs = response.pairs_evaluated,
                    rows = response.rows.len(),
                    "Relationships extracted"
                );
                response.rows
            }
        };

        self.tracker.record_counts(&title, rows.len(), 0)?;
        Ok(rows)
    }

    /// 计算并写出单本书的中心性表
    async fn rank(&self, title: &str, rows: &[RelationshipRow]) -> Result<(), ApplicationError> {
        self.tracker.set_state(title, BookRunState::Ranking)?;

        if !self.config.overwrite_processed && self.tables.centralities_exist(title).await {
            tracing::info!(book = %title, "Centralities already written, skipping");
            self.tracker.set_state(title, BookRunState::Done)?;
            return Ok(());
        }

        let handler = ComputeCentralitiesHandler::new(self.config.centrality);
        let command = ComputeCentralities {
            title: title.to_string(),
            rows: rows.to_vec(),
        };
        let centralities = tokio::task::spawn_blocking(move || handler.handle(command))
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))??;

        self.tables.write_centralities(title, &centralities).await?;
        self.tracker
            .record_counts(title, rows.len(), centralities.len())?;
        self.tracker.set_state(title, BookRunState::Done)?;

        tracing::info!(
            book = %title,
            characters = centralities.len(),
            "Centralities written"
        );
        Ok(())
    }

    fn mark_failed(&self, title: &str, error: String) {
        if let Err(e) = self.tracker.set_failed(title, error) {
            tracing::warn!(book = %title, error = %e, "Failed to record book failure");
        }
    }
}

//! CSV Table Store - 结果表格的文件系统实现
//!
//! 实现 TableStorePort trait

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{
    centrality_table_name, CentralityRow, RelationshipRow, TableError, TableStorePort,
    RELATIONSHIP_TABLE,
};

/// CSV 表格目录
pub struct CsvTableStore {
    /// 输出目录
    processed_dir: PathBuf,
}

impl CsvTableStore {
    /// 创建表格存储，确保输出目录存在
    pub async fn new(processed_dir: impl AsRef<Path>) -> Result<Self, TableError> {
        let processed_dir = processed_dir.as_ref().to_path_buf();

        fs::create_dir_all(&processed_dir)
            .await
            .map_err(|e| TableError::IoError(e.to_string()))?;

        Ok(Self { processed_dir })
    }

    /// 获取输出目录
    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn relationships_path(&self) -> PathBuf {
        self.processed_dir.join(RELATIONSHIP_TABLE)
    }

    pub fn centralities_path(&self, title: &str) -> PathBuf {
        self.processed_dir.join(centrality_table_name(title))
    }

    async fn write_rows<T: Serialize + Sync>(path: &Path, rows: &[T]) -> Result<(), TableError> {
        let file = fs::File::create(path)
            .await
            .map_err(|e| TableError::IoError(e.to_string()))?;
        let mut serializer = csv_async::AsyncSerializer::from_writer(file);

        for row in rows {
            serializer
                .serialize(row)
                .await
                .map_err(|e| TableError::CsvError(e.to_string()))?;
        }
        serializer
            .flush()
            .await
            .map_err(|e| TableError::IoError(e.to_string()))?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "Table written");
        Ok(())
    }

    async fn read_rows<T: DeserializeOwned + Send + 'static>(path: &Path) -> Result<Vec<T>, TableError> {
        let file = fs::File::open(path)
            .await
            .map_err(|e| TableError::IoError(e.to_string()))?;
        let mut deserializer = csv_async::AsyncDeserializer::from_reader(file);
        let mut records = deserializer.deserialize::<T>();

        let mut rows = Vec::new();
        while let Some(record) = records.next().await {
            rows.push(record.map_err(|e| TableError::CsvError(e.to_string()))?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl TableStorePort for CsvTableStore {
    async fn relationships_exist(&self) -> bool {
        fs::try_exists(self.relationships_path()).await.unwrap_or(false)
    }

    async fn read_relationships(&self) -> Result<Vec<RelationshipRow>, TableError> {
        Self::read_rows(&self.relationships_path()).await
    }

    async fn write_relationships(&self, rows: &[RelationshipRow]) -> Result<(), TableError> {
        Self::write_rows(&self.relationships_path(), rows).await
    }

    async fn centralities_exist(&self, title: &str) -> bool {
        fs::try_exists(self.centralities_path(title))
            .await
            .unwrap_or(false)
    }

    async fn write_centralities(&self, title: &str, rows: &[CentralityRow]) -> Result<(), TableError> {
        Self::write_rows(&self.centralities_path(title), rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn relationship(source: &str, target: &str) -> RelationshipRow {
        RelationshipRow {
            book: "Leviathan Wakes".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            hits: 12,
            mentions: 48,
            importance: 0.25,
        }
    }

    #[tokio::test]
    async fn test_relationship_table() {
        let dir = tempdir().unwrap();
        let store = CsvTableStore::new(dir.path().join("processed")).await.unwrap();
        assert!(!store.relationships_exist().await);

        let rows = vec![relationship("holden", "naomi"), relationship("naomi", "holden")];
        store.write_relationships(&rows).await.unwrap();
        assert!(store.relationships_exist().await);

        let content = std::fs::read_to_string(store.relationships_path()).unwrap();
        assert!(content.starts_with("book,source,target,hits,mentions,importance\n"));
        assert!(content.contains("Leviathan Wakes,holden,naomi,12,48,0.25"));

        assert_eq!(store.read_relationships().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn test_centrality_table() {
        let dir = tempdir().unwrap();
        let store = CsvTableStore::new(dir.path()).await.unwrap();
        assert!(!store.centralities_exist("Leviathan Wakes").await);

        let row = CentralityRow {
            label: "holden".to_string(),
            mentions: 48,
            text_rank: 1.0,
            own_text_rank: 1.0,
            eigenvector: 1.0,
            own_eigenvector: 1.0,
            katz: 1.0,
            own_katz: 1.0,
            degree: 1.0,
            harmonic: 1.0,
            closeness: 1.0,
            betweenness: 0.0,
        };
        store
            .write_centralities("Leviathan Wakes", &[row])
            .await
            .unwrap();

        assert!(store.centralities_exist("Leviathan Wakes").await);
        let content =
            std::fs::read_to_string(dir.path().join("Centralities Leviathan Wakes.csv")).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "label,mentions,text_rank,own_text_rank,eigenvector,own_eigenvector,katz,own_katz,degree,harmonic,closeness,betweenness"
        );
        assert_eq!(content.lines().count(), 2);
    }
}

//! Character Source Port - 角色别名来源
//!
//! 每个角色一条记录：规范标识 + 按行分隔的别名列表

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::character::{Character, CharacterRegistry};

/// 角色来源错误（启动时致命）
#[derive(Debug, Error)]
pub enum CharacterSourceError {
    #[error("Character directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl CharacterSourceError {
    /// 出错的路径
    pub fn path(&self) -> &PathBuf {
        match self {
            CharacterSourceError::MissingDirectory(path) => path,
            CharacterSourceError::Io { path, .. } => path,
        }
    }
}

/// Character Source Port
#[async_trait]
pub trait CharacterSourcePort: Send + Sync {
    /// 全局角色集合（视角角色解析使用）
    async fn load_global(&self) -> Result<CharacterRegistry, CharacterSourceError>;

    /// 某本书的角色集合（关系统计使用）
    async fn load_for_book(&self, title: &str) -> Result<CharacterRegistry, CharacterSourceError>;
}

/// 由别名文件内容构建角色，空行被忽略
pub fn character_from_aliases(ref_name: &str, content: &str) -> Character {
    let aliases = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());
    Character::new(ref_name, aliases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_from_aliases() {
        let character = character_from_aliases("Holden", "Holden\nJim\r\n\nJames Holden\n");
        assert_eq!(character.ref_name(), "Holden");
        assert_eq!(character.aliases(), &["Holden", "Jim", "James Holden"]);
    }

    #[test]
    fn test_error_path() {
        let err = CharacterSourceError::MissingDirectory(PathBuf::from("references/characters"));
        assert_eq!(err.path(), &PathBuf::from("references/characters"));
    }
}

//! Alias Files - 角色别名文件实现
//!
//! 每个角色一个文件，文件名（不含扩展名）为规范标识，内容为按行分隔的别名

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{character_from_aliases, CharacterSourceError, CharacterSourcePort};
use crate::domain::character::{Character, CharacterRegistry};

/// 不是角色别名的文件
const IGNORED_FILE: &str = "persons.txt";

/// 别名文件目录
///
/// 全局角色为整个目录树（含各书子目录），同名角色保留最先读到的
pub struct FileCharacterSource {
    /// `references/characters`
    characters_dir: PathBuf,
}

impl FileCharacterSource {
    pub fn new(characters_dir: impl AsRef<Path>) -> Self {
        Self {
            characters_dir: characters_dir.as_ref().to_path_buf(),
        }
    }

    pub fn characters_dir(&self) -> &Path {
        &self.characters_dir
    }

    async fn load_dir(&self, root: &Path) -> Result<CharacterRegistry, CharacterSourceError> {
        if !root.is_dir() {
            return Err(CharacterSourceError::MissingDirectory(root.to_path_buf()));
        }

        let mut characters: Vec<Character> = Vec::new();
        let mut names = HashSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut files = Vec::new();
            let mut subdirs = Vec::new();

            let mut entries = fs::read_dir(&dir).await.map_err(|e| io_error(&dir, e))?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
                let path = entry.path();
                if path.is_dir() {
                    subdirs.push(path);
                } else if entry.file_name() != IGNORED_FILE {
                    files.push(path);
                }
            }
            files.sort();

            for path in files {
                let Some(ref_name) = ref_name_of(&path) else {
                    continue;
                };
                if !names.insert(ref_name.clone()) {
                    continue;
                }

                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| io_error(&path, e))?;
                characters.push(character_from_aliases(&ref_name, &content));
            }

            // 逆序入栈，按名称顺序访问子目录
            subdirs.sort();
            pending.extend(subdirs.into_iter().rev());
        }

        tracing::debug!(
            dir = %root.display(),
            characters = characters.len(),
            "Alias files loaded"
        );

        Ok(CharacterRegistry::new(characters))
    }
}

/// 文件名第一个 `.` 之前的部分
fn ref_name_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let ref_name = name.split('.').next()?.trim();
    if ref_name.is_empty() {
        None
    } else {
        Some(ref_name.to_string())
    }
}

fn io_error(path: &Path, err: std::io::Error) -> CharacterSourceError {
    CharacterSourceError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[async_trait]
impl CharacterSourcePort for FileCharacterSource {
    async fn load_global(&self) -> Result<CharacterRegistry, CharacterSourceError> {
        self.load_dir(&self.characters_dir).await
    }

    async fn load_for_book(&self, title: &str) -> Result<CharacterRegistry, CharacterSourceError> {
        self.load_dir(&self.characters_dir.join(title)).await
    }
}

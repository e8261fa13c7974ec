//! Source Adapters - 原始文本与角色别名的文件系统实现

mod alias_files;
mod raw_text;

pub use alias_files::FileCharacterSource;
pub use raw_text::DirectoryRawBookSource;

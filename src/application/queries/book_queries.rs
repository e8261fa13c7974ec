//! Book Queries

/// 加载语料中的所有书籍
///
/// 优先使用缓存中的解析结果，原始文本变化或 `overwrite_interim` 时重新解析
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadBooks {
    /// 跳过中篇
    pub novels_only: bool,
    /// 忽略缓存
    pub overwrite_interim: bool,
}

/// 加载角色别名集合
#[derive(Debug, Clone, Default)]
pub struct LoadCharacters {
    /// None 表示全局集合
    pub book: Option<String>,
}

//! Book Context - Value Objects

use std::str::FromStr;

use super::ParseError;

/// 章节类型
///
/// 封闭枚举，字符串解析集中在 [`ChapterKind::parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChapterKind {
    /// 序章
    Prologue,
    /// 正文章节
    Chapter,
    /// 尾声
    Epilogue,
    /// 插曲
    Interlude,
}

impl ChapterKind {
    pub const ALL: [ChapterKind; 4] = [
        ChapterKind::Prologue,
        ChapterKind::Chapter,
        ChapterKind::Epilogue,
        ChapterKind::Interlude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterKind::Prologue => "Prologue",
            ChapterKind::Chapter => "Chapter",
            ChapterKind::Epilogue => "Epilogue",
            ChapterKind::Interlude => "Interlude",
        }
    }

    /// 解析章节类型（大小写不敏感）
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        match s.trim().to_lowercase().as_str() {
            "prologue" => Ok(ChapterKind::Prologue),
            "chapter" => Ok(ChapterKind::Chapter),
            "epilogue" => Ok(ChapterKind::Epilogue),
            "interlude" => Ok(ChapterKind::Interlude),
            _ => Err(ParseError::UnknownChapterKind(s.to_string())),
        }
    }
}

impl FromStr for ChapterKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ChapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Book Context - Aggregate Root

use std::sync::Arc;

use super::{Chapter, ChapterKind};
use crate::domain::character::Character;

/// Book 聚合根
///
/// 不变量:
/// - title 在语料中唯一
/// - 章节顺序不可变，Chapter 类型章节的编号在构造时分配
/// - 多于一个章节时为长篇（novel），否则为中篇（novella）
#[derive(Debug, Clone)]
pub struct Book {
    title: String,
    number: f64,
    chapters: Vec<Chapter>,
}

impl Book {
    pub fn new(title: impl Into<String>, number: f64, chapters: Vec<Chapter>) -> Self {
        let mut chapters = chapters;
        let mut chapter_count = 0;
        for chapter in chapters.iter_mut() {
            if chapter.kind() == ChapterKind::Chapter {
                chapter_count += 1;
                chapter.set_number(Some(chapter_count));
            } else {
                chapter.set_number(None);
            }
        }

        Self {
            title: title.into(),
            number,
            chapters,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 出版序号，中篇为小数（如 1.1）
    pub fn number(&self) -> f64 {
        self.number
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn is_novel(&self) -> bool {
        self.chapters.len() > 1
    }

    /// 按位置获取章节（包含所有类型）
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// 序章
    ///
    /// 正向扫描，重复时返回最后一个匹配（序章必须在最前）
    pub fn prologue(&self) -> Option<&Chapter> {
        let mut found = None;
        for chapter in self.chapters.iter() {
            if chapter.kind() == ChapterKind::Prologue {
                found = Some(chapter);
            }
        }
        found
    }

    /// 尾声
    ///
    /// 反向扫描，重复时返回扫描到的最后一个匹配，即正序中的第一个（尾声必须在最后）
    pub fn epilogue(&self) -> Option<&Chapter> {
        let mut found = None;
        for chapter in self.chapters.iter().rev() {
            if chapter.kind() == ChapterKind::Epilogue {
                found = Some(chapter);
            }
        }
        found
    }

    /// 只返回 Chapter 类型的章节
    pub fn chapters_only(&self) -> Vec<&Chapter> {
        self.chapters_of_kind(ChapterKind::Chapter)
    }

    pub fn interludes(&self) -> Vec<&Chapter> {
        self.chapters_of_kind(ChapterKind::Interlude)
    }

    fn chapters_of_kind(&self, kind: ChapterKind) -> Vec<&Chapter> {
        self.chapters.iter().filter(|c| c.kind() == kind).collect()
    }

    /// 指定角色视角的所有章节
    pub fn chapters_by_pov(&self, ref_name: &str) -> Vec<&Chapter> {
        self.chapters
            .iter()
            .filter(|c| c.pov().ref_name() == ref_name)
            .collect()
    }

    /// 每个章节的视角角色（按章节顺序）
    pub fn pov_characters(&self) -> Vec<Arc<Character>> {
        self.chapters.iter().map(|c| c.pov().clone()).collect()
    }

    pub fn words(&self) -> Vec<String> {
        self.chapters.iter().flat_map(|c| c.words()).collect()
    }

    pub fn count_words(&self) -> usize {
        self.chapters.iter().map(Chapter::count_words).sum()
    }

    /// 全书正文（不含标题行）
    pub fn content(&self) -> String {
        self.chapters
            .iter()
            .map(Chapter::content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 以原始文本格式输出全书，重新解析可得到相同结构
    pub fn render_text(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for chapter in &self.chapters {
            chapter.render_lines(&mut lines);
        }
        lines
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {:33}", self.number, self.title)?;
        write!(f, "[Words: {:6}] ", self.count_words())?;

        if self.is_novel() {
            let chapter_count = self.chapters_only().len();
            let interlude_count = self.interludes().len();

            write!(f, "(")?;
            if self.prologue().is_some() {
                write!(f, "1 Prologue, ")?;
            }
            write!(f, "{} Chapters", chapter_count)?;
            if interlude_count > 0 {
                write!(f, ", {} Interlude", interlude_count)?;
                if interlude_count > 1 {
                    write!(f, "s")?;
                }
            }
            if self.epilogue().is_some() {
                write!(f, ", 1 Epilogue")?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::Segment;

    fn chapter(ordinal: usize, kind: ChapterKind, pov: &str, text: &str) -> Chapter {
        Chapter::new(
            ordinal,
            kind,
            Arc::new(Character::synthetic(pov)),
            vec![Segment::new(0, vec![text.to_string()])],
        )
    }

    fn sample() -> Book {
        Book::new(
            "Leviathan Wakes",
            1.0,
            vec![
                chapter(0, ChapterKind::Prologue, "Julie", "first prologue"),
                chapter(1, ChapterKind::Chapter, "Holden", "one"),
                chapter(2, ChapterKind::Interlude, "Miller", "between"),
                chapter(3, ChapterKind::Chapter, "Miller", "two"),
                chapter(4, ChapterKind::Epilogue, "Fred", "first epilogue"),
                chapter(5, ChapterKind::Epilogue, "Fred", "second epilogue"),
            ],
        )
    }

    #[test]
    fn test_chapter_numbers_count_chapter_kind_only() {
        let book = sample();
        let numbers: Vec<Option<usize>> = book.chapters().iter().map(Chapter::number).collect();
        assert_eq!(numbers, vec![None, Some(1), None, Some(2), None, None]);
        assert_eq!(book.chapter(3).map(Chapter::ordinal), Some(3));
    }

    #[test]
    fn test_prologue_and_epilogue_scan_directions() {
        let book = Book::new(
            "Doubles",
            2.0,
            vec![
                chapter(0, ChapterKind::Prologue, "A", "p1"),
                chapter(1, ChapterKind::Prologue, "B", "p2"),
                chapter(2, ChapterKind::Epilogue, "C", "e1"),
                chapter(3, ChapterKind::Epilogue, "D", "e2"),
            ],
        );
        // 正向扫描取最后一个序章，反向扫描取最后扫描到的尾声
        assert_eq!(book.prologue().map(Chapter::ordinal), Some(1));
        assert_eq!(book.epilogue().map(Chapter::ordinal), Some(2));
    }

    #[test]
    fn test_is_novel() {
        assert!(sample().is_novel());
        let novella = Book::new(
            "The Churn",
            2.5,
            vec![chapter(0, ChapterKind::Chapter, "", "text")],
        );
        assert!(!novella.is_novel());
        assert!(!Book::new("Empty", 0.0, vec![]).is_novel());
    }

    #[test]
    fn test_filters() {
        let book = sample();
        assert_eq!(book.chapters_only().len(), 2);
        assert_eq!(book.interludes().len(), 1);
        assert_eq!(book.chapters_by_pov("Miller").len(), 2);
        let povs: Vec<String> = book
            .pov_characters()
            .iter()
            .map(|c| c.ref_name().to_string())
            .collect();
        assert_eq!(povs, vec!["Julie", "Holden", "Miller", "Miller", "Fred", "Fred"]);
    }

    #[test]
    fn test_words_and_summary() {
        let book = sample();
        assert_eq!(book.count_words(), 9);
        assert_eq!(book.words().len(), 9);

        let summary = book.to_string();
        assert!(summary.contains("Leviathan Wakes"));
        assert!(summary.contains("(1 Prologue, 2 Chapters, 1 Interlude, 1 Epilogue)"));
    }
}

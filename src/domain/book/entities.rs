//! Book Context - Entities

use std::sync::Arc;

use super::ChapterKind;
use crate::domain::character::Character;
use crate::domain::tokenizer::tokenize;

/// 场景分隔行
pub const SEGMENT_SEPARATOR: &str = "* * *";

/// 场景（章节内以分隔行隔开的文本块）
///
/// 不变量:
/// - ordinal 在章节内从 0 开始连续
/// - 行集合确定后不可变，单词序列在构造时计算
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    ordinal: usize,
    lines: Vec<String>,
    characters: Vec<String>,
    words: Vec<String>,
}

impl Segment {
    pub fn new(ordinal: usize, lines: Vec<String>) -> Self {
        Self::with_characters(ordinal, lines, Vec::new())
    }

    pub fn with_characters(ordinal: usize, lines: Vec<String>, characters: Vec<String>) -> Self {
        let words = tokenize(&lines.join("\n"));
        Self {
            ordinal,
            lines,
            characters,
            words,
        }
    }

    fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 场景中标注的角色标识
    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    /// 场景全文（行之间以换行连接）
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// 去除标点后的单词序列
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn count_words(&self) -> usize {
        self.words.len()
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No: {}, Lines: {}, Words: {}",
            self.ordinal,
            self.lines.len(),
            self.count_words()
        )
    }
}

/// 章节
///
/// 不变量:
/// - 场景 ordinal 从 0 开始连续
/// - number 只对 Chapter 类型有值，由 Book 构造时分配
#[derive(Debug, Clone)]
pub struct Chapter {
    ordinal: usize,
    number: Option<usize>,
    kind: ChapterKind,
    pov: Arc<Character>,
    segments: Vec<Segment>,
}

impl Chapter {
    pub fn new(
        ordinal: usize,
        kind: ChapterKind,
        pov: Arc<Character>,
        segments: Vec<Segment>,
    ) -> Self {
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| segment.with_ordinal(i))
            .collect();

        Self {
            ordinal,
            number: None,
            kind,
            pov,
            segments,
        }
    }

    pub(crate) fn set_number(&mut self, number: Option<usize>) {
        self.number = number;
    }

    /// 在书中的位置（所有类型统一计数，从 0 开始）
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 章节编号（只统计 Chapter 类型，从 1 开始）
    pub fn number(&self) -> Option<usize> {
        self.number
    }

    pub fn kind(&self) -> ChapterKind {
        self.kind
    }

    pub fn pov(&self) -> &Arc<Character> {
        &self.pov
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// 章节标题，如 `Chapter 3: holden`、`Prologue: julie`
    pub fn title(&self) -> String {
        match (self.kind, self.number) {
            (ChapterKind::Chapter, Some(number)) => {
                format!("{} {}: {}", self.kind, number, self.pov)
            }
            _ => format!("{}: {}", self.kind, self.pov),
        }
    }

    /// 章节全部单词（各场景单词依次拼接）
    pub fn words(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|s| s.words().iter().cloned())
            .collect()
    }

    pub fn count_words(&self) -> usize {
        self.segments.iter().map(Segment::count_words).sum()
    }

    /// 章节全文（不含标题行）
    pub fn content(&self) -> String {
        self.segments
            .iter()
            .map(Segment::content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 以原始文本格式输出（标题行 + 以分隔行隔开的场景）
    ///
    /// 匿名视角的 Chapter 类型章节（无标题的中篇或前言）不输出标题行
    pub(crate) fn render_lines(&self, out: &mut Vec<String>) {
        if !(self.pov.is_anonymous() && self.kind == ChapterKind::Chapter) {
            out.push(format!("{}: {}", self.kind, self.pov.ref_name()));
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(SEGMENT_SEPARATOR.to_string());
            }
            out.extend(segment.lines().iter().cloned());
        }
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, Segments: {}, Words: {}",
            self.title(),
            self.segments.len(),
            self.count_words()
        )
    }
}

//! Raw Text Parser
//!
//! 两级状态机：外层按章节标题行切分章节，内层按分隔行切分场景

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::{Book, Chapter, ChapterKind, ParseError, Segment};
use crate::domain::character::{Character, CharacterRegistry};

/// 章节标题行：类型关键字 + 可选的简短字母限定词 + 冒号
static CHAPTER_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Chapter|Epilogue|Prologue|Interlude)( )?(-?[A-Za-z]+){0,2}?:( )?")
        .expect("chapter header pattern is valid")
});

/// 场景分隔行
static SEGMENT_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\* \* \*$").expect("separator pattern is valid"));

/// 已匹配的章节标题
#[derive(Debug)]
struct ChapterHeader {
    kind: ChapterKind,
    pov: Arc<Character>,
}

/// 已打开、尚未切分场景的章节
#[derive(Debug)]
struct OpenChapter {
    header: ChapterHeader,
    start: usize,
}

/// 原始文本解析器
///
/// 视角角色通过显式传入的注册表解析
pub struct BookParser<'a> {
    registry: &'a CharacterRegistry,
}

impl<'a> BookParser<'a> {
    pub fn new(registry: &'a CharacterRegistry) -> Self {
        Self { registry }
    }

    /// 将按行排列的原始文本解析为 Book
    ///
    /// - 空输入得到零章节的 Book
    /// - 没有任何标题行时（中篇格式），全文合成为一个匿名视角的 Chapter
    /// - 第一个标题行之前的非空内容合成为一个匿名视角的 Chapter
    pub fn parse<S: AsRef<str>>(
        &self,
        title: &str,
        number: f64,
        lines: &[S],
    ) -> Result<Book, ParseError> {
        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.as_ref().trim_end_matches(|c| c == '\r' || c == '\n'))
            .collect();

        let mut chapters: Vec<Chapter> = Vec::new();
        let mut open: Option<OpenChapter> = None;

        for (i, line) in lines.iter().enumerate() {
            let Some(header) = self.match_header(line)? else {
                continue;
            };

            match open.take() {
                Some(previous) => {
                    let ordinal = chapters.len();
                    chapters.push(close_chapter(ordinal, previous.header, &lines[previous.start..i]));
                }
                None => {
                    if has_content(&lines[..i]) {
                        chapters.push(synthetic_chapter(0, &lines[..i]));
                    }
                }
            }

            open = Some(OpenChapter {
                header,
                start: i + 1,
            });
        }

        // 终止状态：最后一个章节的剩余行必须切分
        match open {
            Some(last) => {
                let ordinal = chapters.len();
                chapters.push(close_chapter(ordinal, last.header, &lines[last.start..]));
            }
            None => {
                if has_content(&lines) {
                    chapters.push(synthetic_chapter(0, &lines));
                }
            }
        }

        tracing::debug!(
            title = %title,
            chapters = chapters.len(),
            "Book parsed"
        );

        Ok(Book::new(title, number, chapters))
    }

    fn match_header(&self, line: &str) -> Result<Option<ChapterHeader>, ParseError> {
        let Some(captures) = CHAPTER_HEADER.captures(line) else {
            return Ok(None);
        };

        let kind = ChapterKind::parse(&captures[1])?;
        let pov = self.registry.resolve_pov(pov_label(line));

        Ok(Some(ChapterHeader { kind, pov }))
    }
}

/// 标题行中最后一个冒号之后的文本（先去掉末尾多余的冒号和空白）
fn pov_label(line: &str) -> &str {
    let trimmed = line.trim_end().trim_end_matches(':').trim_end();
    match trimmed.rfind(':') {
        Some(pos) => trimmed[pos + 1..].trim(),
        None => "",
    }
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

fn close_chapter(ordinal: usize, header: ChapterHeader, lines: &[&str]) -> Chapter {
    Chapter::new(ordinal, header.kind, header.pov, parse_segments(lines))
}

fn synthetic_chapter(ordinal: usize, lines: &[&str]) -> Chapter {
    Chapter::new(
        ordinal,
        ChapterKind::Chapter,
        Arc::new(Character::anonymous()),
        parse_segments(lines),
    )
}

/// 内层状态机：按分隔行切分场景，空场景直接丢弃且不占用序号
pub fn parse_segments<S: AsRef<str>>(lines: &[S]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if SEGMENT_SEPARATOR.is_match(line) {
            flush_segment(&mut segments, &mut current);
        } else {
            current.push(line.to_string());
        }
    }
    flush_segment(&mut segments, &mut current);

    segments
}

fn flush_segment(segments: &mut Vec<Segment>, current: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let ordinal = segments.len();
    segments.push(Segment::new(ordinal, std::mem::take(current)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CharacterRegistry {
        CharacterRegistry::new(vec![
            Character::new("holden", ["Holden", "James Holden"]),
            Character::new("miller", ["Miller", "Detective Miller"]),
            Character::new("julie", ["Julie", "Julie Mao"]),
        ])
    }

    fn split(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn test_header_with_trailing_colon() {
        let registry = registry();
        let parser = BookParser::new(&registry);
        let book = parser
            .parse("Test", 1.0, &split("Chapter One: Holden:\nline1\n* * *\nline2"))
            .unwrap();

        assert_eq!(book.chapters().len(), 1);
        let chapter = &book.chapters()[0];
        assert_eq!(chapter.pov().ref_name(), "holden");
        assert_eq!(chapter.kind(), ChapterKind::Chapter);
        let ordinals: Vec<usize> = chapter.segments().iter().map(Segment::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert_eq!(chapter.segments()[0].lines(), &["line1"]);
        assert_eq!(chapter.segments()[1].lines(), &["line2"]);
    }

    #[test]
    fn test_novella_without_headers() {
        let registry = registry();
        let book = BookParser::new(&registry)
            .parse("The Churn", 2.5, &split("It was hot.\nAmos waited."))
            .unwrap();

        assert_eq!(book.chapters().len(), 1);
        let chapter = &book.chapters()[0];
        assert_eq!(chapter.kind(), ChapterKind::Chapter);
        assert!(chapter.pov().is_anonymous());
        assert!(!chapter.segments().is_empty());
        assert!(chapter.segments()[0].count_words() > 0);
        assert!(!book.is_novel());
    }

    #[test]
    fn test_empty_input_yields_no_chapters() {
        let registry = registry();
        let empty: Vec<&str> = Vec::new();
        let book = BookParser::new(&registry).parse("Empty", 0.0, &empty).unwrap();
        assert!(book.chapters().is_empty());
    }

    #[test]
    fn test_multiple_chapter_kinds() {
        let registry = registry();
        let text = "Prologue: Julie\n\
                    The ship was dark.\n\
                    Chapter One: Holden\n\
                    Holden woke.\n\
                    * * *\n\
                    * * *\n\
                    He ate.\n\
                    Chapter Two: Detective Miller\n\
                    Rain.\n\
                    Interlude: Somebody\n\
                    Quiet.\n\
                    Epilogue: Fred\n\
                    The end.";
        let book = BookParser::new(&registry)
            .parse("Leviathan Wakes", 1.0, &split(text))
            .unwrap();

        let kinds: Vec<ChapterKind> = book.chapters().iter().map(Chapter::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChapterKind::Prologue,
                ChapterKind::Chapter,
                ChapterKind::Chapter,
                ChapterKind::Interlude,
                ChapterKind::Epilogue,
            ]
        );
        let ordinals: Vec<usize> = book.chapters().iter().map(Chapter::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
        assert_eq!(book.chapters()[2].number(), Some(2));
        assert_eq!(book.chapters()[2].pov().ref_name(), "miller");

        // 连续分隔行之间的空场景被丢弃，序号保持连续
        let segments = book.chapters()[1].segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].ordinal(), 1);
        assert_eq!(segments[1].lines(), &["He ate."]);

        // 未注册的视角标签得到合成角色
        assert_eq!(book.chapters()[3].pov().ref_name(), "Somebody");
        assert_eq!(book.chapters()[4].pov().ref_name(), "Fred");
    }

    #[test]
    fn test_preamble_becomes_synthetic_chapter() {
        let registry = registry();
        let text = "LEVIATHAN WAKES\n\nPrologue: Julie\nDark.";
        let book = BookParser::new(&registry).parse("LW", 1.0, &split(text)).unwrap();

        assert_eq!(book.chapters().len(), 2);
        assert!(book.chapters()[0].pov().is_anonymous());
        assert_eq!(book.chapters()[1].kind(), ChapterKind::Prologue);
        assert_eq!(book.chapters()[1].ordinal(), 1);
    }

    #[test]
    fn test_blank_preamble_dropped() {
        let registry = registry();
        let book = BookParser::new(&registry)
            .parse("LW", 1.0, &split("\n\nPrologue: Julie\nDark."))
            .unwrap();
        assert_eq!(book.chapters().len(), 1);
        assert_eq!(book.chapters()[0].kind(), ChapterKind::Prologue);
    }

    #[test]
    fn test_hyphenated_qualifier_and_crlf() {
        let registry = registry();
        let lines = vec!["Chapter Forty-Two: Holden\r", "Text.\r", "* * *\r", "More.\r"];
        let book = BookParser::new(&registry).parse("X", 1.0, &lines).unwrap();

        assert_eq!(book.chapters().len(), 1);
        assert_eq!(book.chapters()[0].pov().ref_name(), "holden");
        assert_eq!(book.chapters()[0].segments().len(), 2);
    }

    #[test]
    fn test_non_header_lines_not_matched() {
        let registry = registry();
        let text = "Chapter and verse were quoted.\nChapter and verse: quoted";
        let book = BookParser::new(&registry).parse("X", 1.0, &split(text)).unwrap();
        assert_eq!(book.chapters().len(), 1);
        assert!(book.chapters()[0].pov().is_anonymous());
    }

    #[test]
    fn test_pov_label() {
        assert_eq!(pov_label("Chapter One: Holden"), "Holden");
        assert_eq!(pov_label("Chapter One: Holden:"), "Holden");
        assert_eq!(pov_label("Interlude: The Ship: Miller "), "Miller");
        assert_eq!(pov_label("Prologue:"), "");
    }

    #[test]
    fn test_render_then_parse_reproduces_structure() {
        let registry = registry();
        let text = "Front matter\nPrologue: Julie\nDark.\nChapter One: Holden\nA.\n* * *\nB.";
        let parser = BookParser::new(&registry);
        let book = parser.parse("LW", 1.0, &split(text)).unwrap();
        let reparsed = parser.parse("LW", 1.0, &book.render_text()).unwrap();

        assert_eq!(book.chapters().len(), reparsed.chapters().len());
        for (a, b) in book.chapters().iter().zip(reparsed.chapters()) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.pov().ref_name(), b.pov().ref_name());
            assert_eq!(a.segments(), b.segments());
        }
    }
}

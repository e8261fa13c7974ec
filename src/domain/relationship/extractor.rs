//! Co-occurrence Relationship Extractor

use std::sync::Arc;

use crate::domain::book::{Book, Chapter};
use crate::domain::character::Character;

/// 默认查找窗口（单词数）
pub const DEFAULT_WINDOW: usize = 15;

/// 默认关系阈值（命中数需严格大于该值）
pub const DEFAULT_THRESHOLD: usize = 2;

/// 两个单词索引之间的距离
pub fn dist(pair: (usize, usize)) -> usize {
    pair.0.abs_diff(pair.1)
}

/// 共现参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipConfig {
    pub window: usize,
    pub threshold: usize,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// 有序角色对在一本书中的共现记录
///
/// 计数在所有章节、场景间累加。hits 对两个方向对称，
/// importance 只以 source 一侧的提及次数为分母
#[derive(Debug, Clone)]
pub struct CharacterRelationship {
    source: Arc<Character>,
    target: Arc<Character>,
    config: RelationshipConfig,
    hits: usize,
    source_mentions: usize,
    target_mentions: usize,
}

impl CharacterRelationship {
    pub fn new(source: Arc<Character>, target: Arc<Character>, config: RelationshipConfig) -> Self {
        Self {
            source,
            target,
            config,
            hits: 0,
            source_mentions: 0,
            target_mentions: 0,
        }
    }

    /// 在单个单词序列（一个场景）中统计提及与命中
    ///
    /// 命中 = 两个角色出现位置的笛卡尔积中距离严格介于 0 与 window 之间的组合数
    pub fn find_in_text(&mut self, tokens: &[String]) {
        let source_indices = self.source.appearance_indices(tokens);
        let target_indices = self.target.appearance_indices(tokens);
        let window = self.config.window;

        let hits = source_indices
            .iter()
            .flat_map(|&a| target_indices.iter().map(move |&b| dist((a, b))))
            .filter(|&d| 0 < d && d < window)
            .count();

        self.hits += hits;
        self.source_mentions += source_indices.len();
        self.target_mentions += target_indices.len();
    }

    /// 先检查两个角色是否都在章节中出现，再逐场景统计
    pub fn find_in_chapter(&mut self, chapter: &Chapter) {
        let words = chapter.words();
        if !(self.source.appears_in(&words) && self.target.appears_in(&words)) {
            return;
        }
        for segment in chapter.segments() {
            self.find_in_text(segment.words());
        }
    }

    pub fn find_in_chapters<'a>(&mut self, chapters: impl IntoIterator<Item = &'a Chapter>) {
        for chapter in chapters {
            self.find_in_chapter(chapter);
        }
    }

    pub fn find_in_book(&mut self, book: &Book) {
        self.find_in_chapters(book.chapters());
    }

    pub fn have_relationship(&self) -> bool {
        self.hits > self.config.threshold
    }

    pub fn source(&self) -> &Arc<Character> {
        &self.source
    }

    pub fn target(&self) -> &Arc<Character> {
        &self.target
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn source_mentions(&self) -> usize {
        self.source_mentions
    }

    pub fn target_mentions(&self) -> usize {
        self.target_mentions
    }

    /// 按角色标识获取提及次数
    pub fn mentions_of(&self, ref_name: &str) -> Option<usize> {
        if self.source.ref_name() == ref_name {
            Some(self.source_mentions)
        } else if self.target.ref_name() == ref_name {
            Some(self.target_mentions)
        } else {
            None
        }
    }

    /// hits / source 提及次数；source 未被提及时为 0
    pub fn importance(&self) -> f64 {
        if self.source_mentions == 0 {
            return 0.0;
        }
        self.hits as f64 / self.source_mentions as f64
    }

    /// 交换 source 与 target，计数随之交换
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            config: self.config,
            hits: self.hits,
            source_mentions: self.target_mentions,
            target_mentions: self.source_mentions,
        }
    }
}

/// 统计两个角色在整本书中的共现
pub fn find_in_book(
    source: Arc<Character>,
    target: Arc<Character>,
    book: &Book,
    window: usize,
    threshold: usize,
) -> CharacterRelationship {
    let mut relationship =
        CharacterRelationship::new(source, target, RelationshipConfig { window, threshold });
    relationship.find_in_book(book);
    relationship
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{ChapterKind, Segment};
    use crate::domain::tokenizer::tokenize;

    fn a() -> Arc<Character> {
        Arc::new(Character::new("a", ["A", "Mr. A"]))
    }

    fn b() -> Arc<Character> {
        Arc::new(Character::new("b", ["B"]))
    }

    fn chapter(segments: &[&str]) -> Chapter {
        Chapter::new(
            0,
            ChapterKind::Chapter,
            Arc::new(Character::anonymous()),
            segments
                .iter()
                .enumerate()
                .map(|(i, text)| Segment::new(i, vec![text.to_string()]))
                .collect(),
        )
    }

    fn book(chapters: Vec<Chapter>) -> Book {
        Book::new("Test", 1.0, chapters)
    }

    #[test]
    fn test_dist_symmetric() {
        for (x, y) in [(0, 0), (3, 8), (8, 3), (100, 1)] {
            assert_eq!(dist((x, y)), dist((y, x)));
        }
        assert_eq!(dist((3, 8)), 5);
    }

    #[test]
    fn test_three_segments_five_tokens_apart() {
        let text = "Mr. A walked one two three B";
        let book = book(vec![chapter(&[text, text, text])]);

        let relationship = find_in_book(a(), b(), &book, 15, 2);
        assert_eq!(relationship.hits(), 3);
        assert_eq!(relationship.source_mentions(), 3);
        assert_eq!(relationship.target_mentions(), 3);
        assert!(relationship.have_relationship());

        let strict = find_in_book(a(), b(), &book, 15, 3);
        assert_eq!(strict.hits(), 3);
        assert!(!strict.have_relationship());
    }

    #[test]
    fn test_window_is_exclusive() {
        let tokens = tokenize("A one two three four B");
        let mut narrow = CharacterRelationship::new(
            a(),
            b(),
            RelationshipConfig {
                window: 5,
                threshold: 0,
            },
        );
        narrow.find_in_text(&tokens);
        assert_eq!(narrow.hits(), 0);

        let mut wide = CharacterRelationship::new(
            a(),
            b(),
            RelationshipConfig {
                window: 6,
                threshold: 0,
            },
        );
        wide.find_in_text(&tokens);
        assert_eq!(wide.hits(), 1);
    }

    #[test]
    fn test_hits_monotonic_in_window() {
        let text = "A x B x x x x A x x x x x x x x x x B A B x x x x x x x x x x x x x x x x x x x B";
        let book = book(vec![chapter(&[text])]);

        let mut previous = 0;
        for window in 0..40 {
            let hits = find_in_book(a(), b(), &book, window, 2).hits();
            assert!(hits >= previous, "window {} decreased hits", window);
            previous = hits;
        }
        assert!(previous > 0);
    }

    #[test]
    fn test_hits_symmetric_mentions_swapped() {
        let book = book(vec![chapter(&["A met B and then B left A"])]);
        let forward = find_in_book(a(), b(), &book, 15, 2);
        let backward = find_in_book(b(), a(), &book, 15, 2);

        assert_eq!(forward.hits(), backward.hits());
        assert_eq!(forward.source_mentions(), backward.target_mentions());
        assert_eq!(forward.mentions_of("b"), backward.mentions_of("b"));
        assert_eq!(forward.mentions_of("nobody"), None);

        let reversed = forward.reversed();
        assert_eq!(reversed.source().ref_name(), "b");
        assert_eq!(reversed.hits(), backward.hits());
        assert_eq!(reversed.source_mentions(), backward.source_mentions());
    }

    #[test]
    fn test_distance_not_measured_across_segments() {
        // 两个角色分处相邻场景，即便单词距离很近也不计命中
        let book = book(vec![chapter(&["one two A", "B three four"])]);
        let relationship = find_in_book(a(), b(), &book, 15, 0);
        assert_eq!(relationship.hits(), 0);
        assert_eq!(relationship.source_mentions(), 1);
        assert_eq!(relationship.target_mentions(), 1);
    }

    #[test]
    fn test_chapter_short_circuit() {
        // 第一章只出现 A，不统计任何提及
        let book = book(vec![
            chapter(&["A alone here", "A again"]),
            chapter(&["A and B"]),
        ]);
        let relationship = find_in_book(a(), b(), &book, 15, 0);
        assert_eq!(relationship.source_mentions(), 1);
        assert_eq!(relationship.hits(), 1);
    }

    #[test]
    fn test_shared_alias_self_pair_excluded() {
        let twin = Arc::new(Character::new("twin", ["A"]));
        let book = book(vec![chapter(&["A"])]);
        let relationship = find_in_book(a(), twin, &book, 15, 0);
        assert_eq!(relationship.hits(), 0);
    }

    #[test]
    fn test_importance() {
        let book = book(vec![chapter(&["A B A", "A"])]);
        let relationship = find_in_book(a(), b(), &book, 15, 0);
        assert_eq!(relationship.hits(), 2);
        assert_eq!(relationship.source_mentions(), 3);
        assert!((relationship.importance() - 2.0 / 3.0).abs() < 1e-12);

        let empty = CharacterRelationship::new(a(), b(), RelationshipConfig::default());
        assert_eq!(empty.importance(), 0.0);
        assert!(!empty.have_relationship());
    }
}

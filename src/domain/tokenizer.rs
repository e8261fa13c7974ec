//! Word Tokenizer
//!
//! 将原始文本切分为单词序列：去除标点和引号，保留词内的连字符与撇号

/// 排版撇号（’），在匹配前统一替换为 ASCII 撇号
pub const TYPOGRAPHIC_APOSTROPHE: char = '\u{2019}';

/// 检查是否为单词字符（Unicode 字母、数字或下划线）
#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// 检查是否为连接符（连字符或撇号）
#[inline]
fn is_joiner(ch: char) -> bool {
    matches!(ch, '-' | '\'')
}

/// 位置 `pos` 处是否为单词边界（`pos` 可以等于 `chars.len()`）
#[inline]
fn is_boundary(chars: &[char], pos: usize) -> bool {
    let before = pos > 0 && is_word_char(chars[pos - 1]);
    let after = pos < chars.len() && is_word_char(chars[pos]);
    before != after
}

/// 位置 `pos` 处的字符能否成为单词的一部分
///
/// 单词字符总是可以；连接符只在紧邻单词字符时可以
#[inline]
fn is_token_char(chars: &[char], pos: usize) -> bool {
    let ch = chars[pos];
    if is_word_char(ch) {
        return true;
    }
    if !is_joiner(ch) {
        return false;
    }
    let before = pos > 0 && is_word_char(chars[pos - 1]);
    let after = pos + 1 < chars.len() && is_word_char(chars[pos + 1]);
    before || after
}

/// 统一撇号写法
pub fn normalize_apostrophes(text: &str) -> String {
    text.replace(TYPOGRAPHIC_APOSTROPHE, "'")
}

/// 对文本进行分词
///
/// 分词策略：
/// 1. 统一撇号（’ -> '）
/// 2. 单词不能以连字符开头
/// 3. 从当前位置尽可能向后扩展，再回退到最近的单词边界
pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = normalize_apostrophes(text).chars().collect();
    let mut tokens = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if chars[start] == '-' || !is_token_char(&chars, start) {
            start += 1;
            continue;
        }

        let mut end = start;
        while end < chars.len() && is_token_char(&chars, end) {
            end += 1;
        }

        // 回退到单词边界
        while end > start && !is_boundary(&chars, end) {
            end -= 1;
        }

        if end == start {
            start += 1;
            continue;
        }

        tokens.push(chars[start..end].iter().collect());
        start = end;
    }

    tokens
}

/// 将文本分词后以单个空格重新拼接，用于别名和视角标签的规范化
pub fn normalize_phrase(text: &str) -> String {
    tokenize(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_quotes() {
        let tokens = tokenize("\u{201C}Holden,\u{201D} Naomi said. \u{201C}Get up!\u{201D}");
        assert_eq!(tokens, vec!["Holden", "Naomi", "said", "Get", "up"]);
    }

    #[test]
    fn test_keeps_internal_hyphen() {
        assert_eq!(tokenize("a well-known ship"), vec!["a", "well-known", "ship"]);
    }

    #[test]
    fn test_dangling_hyphens_dropped() {
        assert_eq!(tokenize("-start end- --"), vec!["start", "end"]);
        assert_eq!(tokenize("a - b"), vec!["a", "b"]);
    }

    #[test]
    fn test_apostrophes_normalized() {
        assert_eq!(tokenize("Holden\u{2019}s ship"), vec!["Holden's", "ship"]);
        assert_eq!(tokenize("Holden's ship"), vec!["Holden's", "ship"]);
    }

    #[test]
    fn test_trailing_apostrophe_dropped() {
        assert_eq!(tokenize("the dogs' bones"), vec!["the", "dogs", "bones"]);
    }

    #[test]
    fn test_leading_apostrophe_kept_before_word() {
        assert_eq!(tokenize("'tis fine"), vec!["'tis", "fine"]);
    }

    #[test]
    fn test_unicode_letters() {
        assert_eq!(tokenize("Cortázar smiled"), vec!["Cortázar", "smiled"]);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("* * * ... !?").is_empty());
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("Mr. A"), "Mr A");
        assert_eq!(normalize_phrase("  James   Holden "), "James Holden");
    }
}

//! Character Context - Entities

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::domain::tokenizer::normalize_phrase;

/// 别名最多包含的单词数
pub const MAX_ALIAS_TOKENS: usize = 3;

/// 角色 - 规范标识 + 别名集合
///
/// 不变量:
/// - ref_name 在注册表内唯一
/// - 别名在构造时经过分词规范化（撇号统一、标点去除、单空格拼接），保持插入顺序且不重复
/// - 构造后不可变
#[derive(Debug, Clone)]
pub struct Character {
    ref_name: String,
    aliases: Vec<String>,
    lookup: HashSet<String>,
}

impl Character {
    pub fn new<I, S>(ref_name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();

        for alias in aliases {
            let normalized = normalize_phrase(alias.as_ref());
            if normalized.is_empty() {
                continue;
            }
            if lookup.insert(normalized.clone()) {
                ordered.push(normalized);
            }
        }

        Self {
            ref_name: ref_name.into(),
            aliases: ordered,
            lookup,
        }
    }

    /// 匿名角色（无章节标题的中篇小说使用）
    pub fn anonymous() -> Self {
        Self::new("", Vec::<String>::new())
    }

    /// 以标签本身作为唯一别名的合成角色
    pub fn synthetic(label: &str) -> Self {
        Self::new(label, [label])
    }

    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_anonymous(&self) -> bool {
        self.ref_name.is_empty()
    }

    /// 整个标签（规范化后）是否为该角色的别名
    pub fn is_called(&self, label: &str) -> bool {
        self.lookup.contains(&normalize_phrase(label))
    }

    /// 在位置 `index` 处按最长优先（3 -> 2 -> 1 个单词）尝试匹配别名
    ///
    /// 返回匹配短语最后一个单词的索引
    fn match_at(&self, tokens: &[String], index: usize) -> Option<usize> {
        for len in (1..=MAX_ALIAS_TOKENS).rev() {
            if index + len > tokens.len() {
                continue;
            }
            let phrase = tokens[index..index + len].join(" ");
            if self.lookup.contains(&phrase) {
                return Some(index + len - 1);
            }
        }
        None
    }

    /// 列出角色名出现的所有位置
    ///
    /// 贪婪扫描：匹配成功后跳过已匹配的单词，因此结果严格递增且互不重叠
    pub fn appearance_indices(&self, tokens: &[String]) -> Vec<usize> {
        let mut indices = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            match self.match_at(tokens, index) {
                Some(last) => {
                    indices.push(last);
                    index = last + 1;
                }
                None => index += 1,
            }
        }

        indices
    }

    /// 角色是否在单词序列中出现（找到第一个匹配即返回）
    pub fn appears_in(&self, tokens: &[String]) -> bool {
        (0..tokens.len()).any(|index| self.match_at(tokens, index).is_some())
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        self.ref_name == other.ref_name
    }
}

impl Eq for Character {}

impl Hash for Character {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ref_name.hash(state);
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ref_name)
    }
}

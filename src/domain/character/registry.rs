//! Character Registry
//!
//! 显式构造、显式传递的角色注册表（替代进程级全局单例）

use std::sync::Arc;

use super::Character;

/// 角色注册表
///
/// 不变量:
/// - 角色按 ref_name 排序且唯一（重复时保留第一个）
/// - 构造后不可变，可在线程间共享
#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    characters: Vec<Arc<Character>>,
}

impl CharacterRegistry {
    pub fn new(characters: impl IntoIterator<Item = Character>) -> Self {
        let mut sorted: Vec<Arc<Character>> = Vec::new();
        for character in characters {
            if sorted.iter().any(|c| c.ref_name() == character.ref_name()) {
                tracing::debug!(ref_name = %character.ref_name(), "Duplicate character ignored");
                continue;
            }
            sorted.push(Arc::new(character));
        }
        sorted.sort_by(|a, b| a.ref_name().cmp(b.ref_name()));
        Self { characters: sorted }
    }

    pub fn characters(&self) -> &[Arc<Character>] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// 按规范标识查找
    pub fn get(&self, ref_name: &str) -> Option<Arc<Character>> {
        self.characters
            .binary_search_by(|c| c.ref_name().cmp(ref_name))
            .ok()
            .map(|i| self.characters[i].clone())
    }

    /// 解析章节标题中的视角角色
    ///
    /// 返回第一个以该标签为别名的角色；找不到时合成一个只有该标签的角色，
    /// 空标签得到匿名角色。此操作永不失败
    pub fn resolve_pov(&self, label: &str) -> Arc<Character> {
        let label = label.trim();
        if label.is_empty() {
            return Arc::new(Character::anonymous());
        }

        if let Some(found) = self.characters.iter().find(|c| c.is_called(label)) {
            return found.clone();
        }

        tracing::debug!(label = %label, "No alias matches POV label, using synthetic character");
        Arc::new(Character::synthetic(label))
    }

    /// 按标识还原视角角色（反序列化使用），标识未注册时按标签解析
    pub fn resolve_id(&self, ref_name: &str) -> Arc<Character> {
        self.get(ref_name)
            .unwrap_or_else(|| self.resolve_pov(ref_name))
    }

    /// 所有不同角色的无序组合，每对只出现一次
    pub fn pairs(&self) -> Vec<(Arc<Character>, Arc<Character>)> {
        let mut pairs = Vec::new();
        for (i, first) in self.characters.iter().enumerate() {
            for second in &self.characters[i + 1..] {
                pairs.push((first.clone(), second.clone()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CharacterRegistry {
        CharacterRegistry::new(vec![
            Character::new("naomi", ["Naomi", "Naomi Nagata"]),
            Character::new("holden", ["Holden", "Jim", "James Holden"]),
            Character::new("amos", ["Amos", "Amos Burton"]),
        ])
    }

    #[test]
    fn test_sorted_and_lookup() {
        let registry = registry();
        let names: Vec<&str> = registry.characters().iter().map(|c| c.ref_name()).collect();
        assert_eq!(names, vec!["amos", "holden", "naomi"]);
        assert!(registry.get("holden").is_some());
        assert!(registry.get("miller").is_none());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let registry = CharacterRegistry::new(vec![
            Character::new("holden", ["Holden"]),
            Character::new("holden", ["Jim"]),
        ]);
        assert_eq!(registry.len(), 1);
        assert!(registry.characters()[0].is_called("Holden"));
    }

    #[test]
    fn test_resolve_pov() {
        let registry = registry();
        assert_eq!(registry.resolve_pov("James Holden").ref_name(), "holden");
        assert_eq!(registry.resolve_pov(" Naomi ").ref_name(), "naomi");
    }

    #[test]
    fn test_resolve_pov_fallback_never_fails() {
        let registry = registry();
        let unknown = registry.resolve_pov("Miller");
        assert_eq!(unknown.ref_name(), "Miller");
        assert!(unknown.is_called("Miller"));

        assert!(registry.resolve_pov("").is_anonymous());
    }

    #[test]
    fn test_resolve_id() {
        let registry = registry();
        assert_eq!(registry.resolve_id("amos").ref_name(), "amos");
        assert_eq!(registry.resolve_id("Amos").ref_name(), "amos");
    }

    #[test]
    fn test_pairs_unordered() {
        let pairs = registry().pairs();
        let names: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(a, b)| (a.ref_name(), b.ref_name()))
            .collect();
        assert_eq!(
            names,
            vec![("amos", "holden"), ("amos", "naomi"), ("holden", "naomi")]
        );
    }
}

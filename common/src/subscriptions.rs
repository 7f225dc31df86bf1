//! 型番の購読リスト(楽観的更新)
//!
//! 購読/解除はAPI完了を待たずにまず手元の集合へ反映し、
//! 失敗したら呼び出し側が逆操作で巻き戻す。

/// 現在のユーザーが購読している型番の集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    parts: Vec<String>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// APIの返却リストから構築(順序維持・重複除去)
    pub fn from_parts(parts: Vec<String>) -> Self {
        let mut set = SubscriptionSet::new();
        for part in parts {
            set.insert(&part);
        }
        set
    }

    pub fn contains(&self, part_number: &str) -> bool {
        self.parts.iter().any(|p| p == part_number)
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 楽観的に追加。実際に追加された場合true
    pub fn insert(&mut self, part_number: &str) -> bool {
        if part_number.is_empty() || self.contains(part_number) {
            return false;
        }
        self.parts.push(part_number.to_string());
        true
    }

    /// 楽観的に削除。実際に削除された場合true
    pub fn remove(&mut self, part_number: &str) -> bool {
        let before = self.parts.len();
        self.parts.retain(|p| p != part_number);
        self.parts.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_dedups_and_keeps_order() {
        let set = SubscriptionSet::from_parts(vec![
            "XC7A100T".to_string(),
            "STM32F103".to_string(),
            "XC7A100T".to_string(),
        ]);
        assert_eq!(set.parts(), &["XC7A100T", "STM32F103"]);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut set = SubscriptionSet::new();
        assert!(set.insert("XC7A100T"));
        assert!(!set.insert("XC7A100T"));
        assert!(!set.insert(""));
        assert!(set.contains("XC7A100T"));

        assert!(set.remove("XC7A100T"));
        assert!(!set.remove("XC7A100T"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_optimistic_unsubscribe_rollback() {
        // 楽観的に解除 → API失敗 → 巻き戻し
        let mut set = SubscriptionSet::from_parts(vec![
            "XC7A100T".to_string(),
            "STM32F103".to_string(),
        ]);
        assert!(set.remove("XC7A100T"));
        assert_eq!(set.len(), 1);

        // 失敗したので戻す
        assert!(set.insert("XC7A100T"));
        assert!(set.contains("XC7A100T"));
        assert_eq!(set.len(), 2);
    }
}

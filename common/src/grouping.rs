//! 検索結果のグルーピング・ソートエンジン
//!
//! 1回の検索で受け取ったフラットなレコード列から表示用ビューを導出する。
//! ビューは毎回再計算され、元のレコード列は失わない。

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::ResultRecord;

/// 表示グルーピングモード。常にどれか1つだけが有効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// グルーピングなし(受信順)
    #[default]
    Flat,
    /// 型番ごと → サプライヤーごと
    ByPartNumber,
    /// サプライヤーごと
    BySupplier,
}

impl GroupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupMode::Flat => "flat",
            GroupMode::ByPartNumber => "part_number",
            GroupMode::BySupplier => "supplier",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flat" => Some(GroupMode::Flat),
            "part_number" => Some(GroupMode::ByPartNumber),
            "supplier" => Some(GroupMode::BySupplier),
            _ => None,
        }
    }
}

/// ソート対象カラム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PartNumber,
    Manufacturer,
    DateCode,
    Quantity,
    Supplier,
    Country,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PartNumber => "part_number",
            SortKey::Manufacturer => "mfr",
            SortKey::DateCode => "dc",
            SortKey::Quantity => "qty",
            SortKey::Supplier => "supplier_name",
            SortKey::Country => "country",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "part_number" => Some(SortKey::PartNumber),
            "mfr" => Some(SortKey::Manufacturer),
            "dc" => Some(SortKey::DateCode),
            "qty" => Some(SortKey::Quantity),
            "supplier_name" => Some(SortKey::Supplier),
            "country" => Some(SortKey::Country),
            _ => None,
        }
    }
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// 現在のソート状態。表示中の全レコード列に一様に適用する
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    /// カラムヘッダのクリック。同じキーなら方向を反転、
    /// 別のキーなら昇順でリセット
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }
}

/// 安定ソート。数量は数値比較(変換失敗は0)、文字列カラムは
/// 大文字小文字を無視して比較する。同値は直前の相対順を保つ
pub fn sort_records(records: &mut [ResultRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Quantity => a
                .qty_value()
                .partial_cmp(&b.qty_value())
                .unwrap_or(Ordering::Equal),
            _ => string_key(a, key).cmp(&string_key(b, key)),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn string_key(record: &ResultRecord, key: SortKey) -> String {
    let raw = match key {
        SortKey::PartNumber => &record.part_number,
        SortKey::Manufacturer => &record.mfr,
        SortKey::DateCode => &record.dc,
        SortKey::Supplier => &record.supplier_name,
        SortKey::Country => &record.country,
        SortKey::Quantity => &record.qty,
    };
    raw.to_lowercase()
}

/// サプライヤー名ごとのグループ(キーは初出順)
pub fn group_by_supplier(records: &[ResultRecord]) -> Vec<(String, Vec<ResultRecord>)> {
    bucket_by(records, |record| record.supplier_name.clone())
}

/// 型番ごと → サプライヤーごとの2段グループ(両段とも初出順)
pub fn group_by_part_number(
    records: &[ResultRecord],
) -> Vec<(String, Vec<(String, Vec<ResultRecord>)>)> {
    bucket_by(records, |record| record.part_number.clone())
        .into_iter()
        .map(|(part_number, group)| (part_number, group_by_supplier(&group)))
        .collect()
}

fn bucket_by<F>(records: &[ResultRecord], key_of: F) -> Vec<(String, Vec<ResultRecord>)>
where
    F: Fn(&ResultRecord) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<ResultRecord>> = HashMap::new();
    for record in records {
        let key = key_of(record);
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            })
            .push(record.clone());
    }
    order
        .into_iter()
        .map(|key| {
            let group = buckets.remove(&key).unwrap_or_default();
            (key, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(part_number: &str, supplier: &str, qty: &str) -> ResultRecord {
        ResultRecord {
            part_number: part_number.to_string(),
            supplier_name: supplier.to_string(),
            qty: qty.to_string(),
            ..ResultRecord::default()
        }
    }

    fn sample_records() -> Vec<ResultRecord> {
        vec![
            record("XC7A100T", "Chip One", "500"),
            record("XC7A200T", "Maxi Parts", "20"),
            record("XC7A100T", "Maxi Parts", "1500"),
            record("XC7A100T", "Chip One", "0"),
        ]
    }

    // =============================================
    // ソート
    // =============================================

    #[test]
    fn test_sort_by_quantity_numeric() {
        let mut records = sample_records();
        sort_records(&mut records, SortKey::Quantity, SortDirection::Asc);
        let qtys: Vec<f64> = records.iter().map(|r| r.qty_value()).collect();
        assert_eq!(qtys, vec![0.0, 20.0, 500.0, 1500.0]);
    }

    #[test]
    fn test_sort_involution() {
        // 昇順→降順は同じ要素列の逆順になる
        let mut ascending = sample_records();
        sort_records(&mut ascending, SortKey::Quantity, SortDirection::Asc);
        let mut descending = sample_records();
        sort_records(&mut descending, SortKey::Quantity, SortDirection::Desc);
        let reversed: Vec<ResultRecord> = ascending.into_iter().rev().collect();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn test_sort_unparsable_quantity_as_zero() {
        let mut records = vec![
            record("A", "S", "abc"),
            record("B", "S", "10"),
            record("C", "S", ""),
        ];
        sort_records(&mut records, SortKey::Quantity, SortDirection::Asc);
        // 数値化できない値は0として並び、安定ソートで相対順を保つ
        let order: Vec<&str> = records.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_strings_case_insensitive() {
        let mut records = vec![
            record("b-part", "S", "1"),
            record("A-PART", "S", "1"),
            record("c-part", "S", "1"),
        ];
        sort_records(&mut records, SortKey::PartNumber, SortDirection::Asc);
        let order: Vec<&str> = records.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(order, vec!["A-PART", "b-part", "c-part"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut records = vec![
            record("A", "first", "10"),
            record("A", "second", "10"),
            record("A", "third", "10"),
        ];
        sort_records(&mut records, SortKey::Quantity, SortDirection::Asc);
        let order: Vec<&str> = records.iter().map(|r| r.supplier_name.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    // =============================================
    // ソート状態のトグル
    // =============================================

    #[test]
    fn test_sort_state_toggle() {
        let mut state = SortState::default();
        state.toggle(SortKey::Quantity);
        assert_eq!(state.key, Some(SortKey::Quantity));
        assert_eq!(state.direction, SortDirection::Asc);

        // 同じキー: 方向反転
        state.toggle(SortKey::Quantity);
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle(SortKey::Quantity);
        assert_eq!(state.direction, SortDirection::Asc);

        // 別のキー: 昇順でリセット
        state.toggle(SortKey::Quantity);
        state.toggle(SortKey::PartNumber);
        assert_eq!(state.key, Some(SortKey::PartNumber));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    // =============================================
    // グルーピング
    // =============================================

    #[test]
    fn test_group_by_supplier_first_seen_order() {
        let groups = group_by_supplier(&sample_records());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Chip One", "Maxi Parts"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 2);
    }

    #[test]
    fn test_group_by_part_number_nested() {
        let groups = group_by_part_number(&sample_records());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["XC7A100T", "XC7A200T"]);

        let (_, suppliers) = &groups[0];
        let supplier_keys: Vec<&str> = suppliers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(supplier_keys, vec!["Chip One", "Maxi Parts"]);
    }

    #[test]
    fn test_group_by_part_number_union_equals_flat_subset() {
        // 型番配下の全サブグループの和集合 = 元リストのその型番の部分集合
        let records = sample_records();
        let groups = group_by_part_number(&records);
        for (part_number, suppliers) in groups {
            let mut grouped: Vec<ResultRecord> = suppliers
                .into_iter()
                .flat_map(|(_, group)| group)
                .collect();
            let mut flat_subset: Vec<ResultRecord> = records
                .iter()
                .filter(|r| r.part_number == part_number)
                .cloned()
                .collect();
            let sort_key = |r: &ResultRecord| (r.supplier_name.clone(), r.qty.clone());
            grouped.sort_by_key(sort_key);
            flat_subset.sort_by_key(sort_key);
            assert_eq!(grouped, flat_subset);
        }
    }

    #[test]
    fn test_grouping_does_not_lose_records() {
        let records = sample_records();
        let total: usize = group_by_supplier(&records)
            .iter()
            .map(|(_, group)| group.len())
            .sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_group_mode_parse_round_trip() {
        for mode in [GroupMode::Flat, GroupMode::ByPartNumber, GroupMode::BySupplier] {
            assert_eq!(GroupMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(GroupMode::parse("region"), None);
    }
}

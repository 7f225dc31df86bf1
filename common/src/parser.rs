//! 検索APIレスポンスのパーサー
//!
//! デプロイ環境によりレスポンス形状が3通りある:
//! 1. `{ items: [{item: "<json文字列>", numResults}] }` (フラット型)
//! 2. `{ results: { inStock: [...], brokered: [...] } }` (カテゴリ型)
//! 3. `{ numResults, results: { americas|europe|asia: { inStock, brokered } } }`
//!
//! いずれも各要素のitemフィールドはJSON文字列で、二段目のデコードが
//! 必要になる。item単位のデコード失敗はレコードを除外して数えるだけで、
//! レスポンス全体の失敗にはしない。

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Region, ResultRecord, StockCategory, Suggestion};

/// 正規化済みの検索結果
///
/// 形状の違いを吸収し、APIの返却順を保ったレコード列にまとめる。
/// カテゴリ・地域はAPIが割り当てたタグをレコードに付けたまま保持する。
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub records: Vec<ResultRecord>,
    /// itemのデコード失敗で除外した件数(表示はしない)
    pub dropped: usize,
    /// レスポンスが総件数を持つ形状の場合のみ
    pub num_results: Option<u64>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// カテゴリタグ付きのレコードを含むか(在庫/ブローカーの
    /// セクション表示を使うかの判定)
    pub fn is_sectioned(&self) -> bool {
        self.records.iter().any(|r| r.category.is_some())
    }

    pub fn in_category(&self, category: StockCategory) -> Vec<ResultRecord> {
        self.records
            .iter()
            .filter(|r| r.category == Some(category))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemEnvelope {
    item: Option<String>,
    part_number: Option<String>,
    #[serde(rename = "numResults")]
    num_results: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryBuckets {
    #[serde(rename = "inStock")]
    in_stock: Vec<ItemEnvelope>,
    brokered: Vec<ItemEnvelope>,
}

const REGION_KEYS: [(&str, Region); 3] = [
    ("americas", Region::Americas),
    ("europe", Region::Europe),
    ("asia", Region::Asia),
];

/// 検索レスポンスを正規化する
pub fn parse_search_response(response: &Value) -> Result<SearchResults> {
    let object = response
        .as_object()
        .ok_or_else(|| Error::Parse("検索レスポンスがオブジェクトではありません".to_string()))?;

    let mut results = SearchResults {
        num_results: object.get("numResults").and_then(Value::as_u64),
        ..SearchResults::default()
    };

    if let Some(items) = object.get("items") {
        let envelopes: Vec<ItemEnvelope> = serde_json::from_value(items.clone())?;
        for envelope in envelopes {
            push_decoded(&mut results, &envelope, None, None);
        }
        return Ok(results);
    }

    let Some(buckets) = object.get("results") else {
        return Err(Error::Parse(
            "検索レスポンスにitemsもresultsもありません".to_string(),
        ));
    };

    let is_regional = REGION_KEYS
        .iter()
        .any(|(key, _)| buckets.get(*key).is_some());

    if is_regional {
        for (key, region) in REGION_KEYS {
            let Some(bucket) = buckets.get(key) else {
                continue;
            };
            let bucket: CategoryBuckets = serde_json::from_value(bucket.clone())?;
            push_bucket(&mut results, bucket, Some(region));
        }
    } else {
        let bucket: CategoryBuckets = serde_json::from_value(buckets.clone())?;
        push_bucket(&mut results, bucket, None);
    }

    Ok(results)
}

fn push_bucket(results: &mut SearchResults, bucket: CategoryBuckets, region: Option<Region>) {
    for envelope in bucket.in_stock {
        push_decoded(results, &envelope, Some(StockCategory::InStock), region);
    }
    for envelope in bucket.brokered {
        push_decoded(results, &envelope, Some(StockCategory::Brokered), region);
    }
}

fn push_decoded(
    results: &mut SearchResults,
    envelope: &ItemEnvelope,
    category: Option<StockCategory>,
    region: Option<Region>,
) {
    match decode_item(envelope) {
        Some(mut record) => {
            record.category = category;
            record.region = region;
            results.records.push(record);
        }
        None => results.dropped += 1,
    }
}

/// item文字列の二段目のデコード。失敗はNone(呼び出し側で件数だけ数える)
fn decode_item(envelope: &ItemEnvelope) -> Option<ResultRecord> {
    let item = envelope.item.as_deref()?;
    serde_json::from_str(item).ok()
}

/// インクリメンタル検索用: itemsの各要素を候補に変換する
///
/// 検索バー向けデプロイでは要素が直接part_number/numResultsを持つが、
/// item文字列しか無い環境もあるため内側レコードへのフォールバックを持つ。
pub fn parse_suggestions(response: &Value) -> Result<Vec<Suggestion>> {
    let object = response
        .as_object()
        .ok_or_else(|| Error::Parse("検索レスポンスがオブジェクトではありません".to_string()))?;
    let Some(items) = object.get("items") else {
        return Ok(Vec::new());
    };
    let envelopes: Vec<ItemEnvelope> = serde_json::from_value(items.clone())?;

    let suggestions = envelopes
        .iter()
        .filter_map(|envelope| {
            let part_number = match &envelope.part_number {
                Some(part_number) if !part_number.is_empty() => part_number.clone(),
                _ => {
                    let record = decode_item(envelope)?;
                    if record.part_number.is_empty() {
                        return None;
                    }
                    record.part_number
                }
            };
            Some(Suggestion {
                part_number,
                num_results: envelope.num_results.unwrap_or(0),
            })
        })
        .collect();

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_json(part_number: &str, qty: u64) -> String {
        json!({
            "part_number": part_number,
            "supplier_name": "Chip One",
            "qty": qty,
        })
        .to_string()
    }

    // =============================================
    // フラット型レスポンス
    // =============================================

    #[test]
    fn test_parse_flat_items() {
        let response = json!({
            "items": [
                {"item": item_json("XC7A100T", 10), "numResults": 3},
                {"item": item_json("XC7A200T", 20)},
            ]
        });
        let results = parse_search_response(&response).unwrap();
        assert_eq!(results.total(), 2);
        assert_eq!(results.dropped, 0);
        assert!(!results.is_sectioned());
        assert_eq!(results.records[0].part_number, "XC7A100T");
        assert!(results.records[0].category.is_none());
    }

    #[test]
    fn test_parse_flat_items_drops_malformed() {
        let response = json!({
            "items": [
                {"item": item_json("XC7A100T", 10)},
                {"item": "{ not json"},
                {"item": null},
                {"item": item_json("XC7A200T", 20)},
            ]
        });
        let results = parse_search_response(&response).unwrap();
        // 表示件数はデコードに成功した件数のみ
        assert_eq!(results.total(), 2);
        assert_eq!(results.dropped, 2);
    }

    #[test]
    fn test_parse_preserves_api_order() {
        let response = json!({
            "items": [
                {"item": item_json("B", 1)},
                {"item": item_json("A", 2)},
                {"item": item_json("C", 3)},
            ]
        });
        let results = parse_search_response(&response).unwrap();
        let order: Vec<&str> = results
            .records
            .iter()
            .map(|r| r.part_number.as_str())
            .collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    // =============================================
    // カテゴリ型レスポンス
    // =============================================

    #[test]
    fn test_parse_category_buckets() {
        let response = json!({
            "results": {
                "inStock": [
                    {"item": item_json("XC7A100T", 100)},
                    {"item": item_json("XC7A100T", 50)},
                ],
                "brokered": [
                    {"item": item_json("XC7A100T", 5)},
                ]
            }
        });
        let results = parse_search_response(&response).unwrap();
        assert_eq!(results.total(), 3);
        assert!(results.is_sectioned());
        assert_eq!(results.in_category(StockCategory::InStock).len(), 2);
        assert_eq!(results.in_category(StockCategory::Brokered).len(), 1);
    }

    #[test]
    fn test_parse_category_buckets_missing_side() {
        let response = json!({
            "results": {
                "inStock": [{"item": item_json("XC7A100T", 100)}]
            }
        });
        let results = parse_search_response(&response).unwrap();
        assert_eq!(results.total(), 1);
        assert!(results.in_category(StockCategory::Brokered).is_empty());
    }

    // =============================================
    // マルチリージョン型レスポンス
    // =============================================

    #[test]
    fn test_parse_regional_buckets() {
        let response = json!({
            "numResults": 3,
            "results": {
                "americas": {
                    "inStock": [{"item": item_json("XC7A100T", 100)}]
                },
                "europe": {
                    "brokered": [{"item": item_json("XC7A100T", 5)}]
                },
                "asia": {
                    "inStock": [{"item": item_json("XC7A100T", 30)}]
                }
            }
        });
        let results = parse_search_response(&response).unwrap();
        assert_eq!(results.total(), 3);
        assert_eq!(results.num_results, Some(3));
        assert_eq!(results.records[0].region, Some(Region::Americas));
        assert_eq!(results.records[1].region, Some(Region::Europe));
        assert_eq!(results.records[1].category, Some(StockCategory::Brokered));
        assert_eq!(results.records[2].region, Some(Region::Asia));
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        let response = json!({"rows": []});
        assert!(parse_search_response(&response).is_err());
        assert!(parse_search_response(&json!(42)).is_err());
    }

    // =============================================
    // インクリメンタル検索候補
    // =============================================

    #[test]
    fn test_parse_suggestions_direct_fields() {
        let response = json!({
            "items": [
                {"part_number": "XC7A100T", "numResults": 12},
                {"part_number": "XC7A200T", "numResults": 4},
            ]
        });
        let suggestions = parse_suggestions(&response).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].part_number, "XC7A100T");
        assert_eq!(suggestions[0].num_results, 12);
    }

    #[test]
    fn test_parse_suggestions_falls_back_to_inner_item() {
        let response = json!({
            "items": [
                {"item": item_json("XC7A100T", 10), "numResults": 7},
                {"item": "{ broken"},
            ]
        });
        let suggestions = parse_suggestions(&response).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].part_number, "XC7A100T");
        assert_eq!(suggestions[0].num_results, 7);
    }

    #[test]
    fn test_parse_suggestions_without_items_is_empty() {
        let response = json!({"results": {"inStock": []}});
        let suggestions = parse_suggestions(&response).unwrap();
        assert!(suggestions.is_empty());
    }
}

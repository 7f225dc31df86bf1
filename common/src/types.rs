//! 検索クエリと検索結果レコードの型定義
//!
//! ネイティブ(テスト)とWeb(WASM)で共有される型:
//! - SearchQuery: 1回の検索呼び出しの不変な条件
//! - ResultRecord: ディストリビュータの在庫1件(APIから二重エンコードで届く)
//! - PriceBreak: 数量別価格ティア(a〜eのサフィックス列から変換)
//! - Suggestion: インクリメンタル検索ドロップダウンの候補

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// メーカー型番
    #[default]
    Mpn,
    /// メーカー名
    Manufacturer,
}

impl SearchField {
    /// APIに送るワイヤ名
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Mpn => "mpn",
            SearchField::Manufacturer => "manufacturer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mpn" => Some(SearchField::Mpn),
            "manufacturer" => Some(SearchField::Manufacturer),
            _ => None,
        }
    }
}

/// 一致方法(前方一致 / 完全一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchType {
    Exact,
    #[default]
    BeginsWith,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::BeginsWith => "begins_with",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(MatchType::Exact),
            "begins_with" => Some(MatchType::BeginsWith),
            _ => None,
        }
    }
}

/// 1回の検索呼び出しの条件。生成後は変更しない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub field: SearchField,
    pub match_type: MatchType,
    pub value: String,
}

impl SearchQuery {
    /// 検索語の最低文字数。これ未満の入力は検索を発行しない
    pub const MIN_QUERY_LEN: usize = 3;

    pub fn new(
        field: SearchField,
        match_type: MatchType,
        value: impl Into<String>,
    ) -> Result<Self> {
        let value = value.into();
        if value.chars().count() < Self::MIN_QUERY_LEN {
            return Err(Error::Validation(format!(
                "検索語は{}文字以上で入力してください",
                Self::MIN_QUERY_LEN
            )));
        }
        Ok(SearchQuery {
            field,
            match_type,
            value,
        })
    }

    /// ドロップダウン候補の確定時に使う、型番の完全一致クエリ
    pub fn exact_mpn(part_number: impl Into<String>) -> Result<Self> {
        SearchQuery::new(SearchField::Mpn, MatchType::Exact, part_number)
    }

    /// ナビゲーション用のクエリパラメータ表現
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search_type", self.match_type.as_str().to_string()),
            ("field", self.field.as_str().to_string()),
            ("field_value", self.value.clone()),
        ]
    }

    /// クエリパラメータから復元。field/search_typeが欠けていれば既定値
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut field = SearchField::default();
        let mut match_type = MatchType::default();
        let mut value = String::new();
        for (key, raw) in pairs {
            match key {
                "field" => field = SearchField::parse(raw).unwrap_or_default(),
                "search_type" => match_type = MatchType::parse(raw).unwrap_or_default(),
                "field_value" => value = raw.to_string(),
                _ => {}
            }
        }
        SearchQuery::new(field, match_type, value)
    }
}

/// 在庫カテゴリ。APIが割り当てたものをそのまま保持する(クライアントは再分類しない)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCategory {
    InStock,
    Brokered,
}

impl StockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockCategory::InStock => "inStock",
            StockCategory::Brokered => "brokered",
        }
    }
}

/// 地域(マルチリージョン型のレスポンスのみ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Americas,
    Europe,
    Asia,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Americas => "americas",
            Region::Europe => "europe",
            Region::Asia => "asia",
        }
    }
}

/// 数量別価格ティア
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreak {
    /// 適用数量しきい値(表示はそのまま)
    pub qty: String,
    /// 単価(正の値のみ)
    pub price: f64,
}

/// 検索結果1件。受信後は不変
///
/// APIのitem文字列にはbreak_qty_a〜e / price_a〜eのサフィックス列が
/// 並ぶが、デシリアライズ境界で順序付きのprice_breaksに変換し、
/// サフィックス列はここから先に漏らさない。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawRecord")]
pub struct ResultRecord {
    pub part_number: String,
    pub mfr: String,
    /// デートコード
    pub dc: String,
    pub description: String,
    /// 数量。表示は受信値のまま、ソート時にqty_value()で数値化
    pub qty: String,
    pub country: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub supplier_code: String,
    pub processed_at: String,
    pub link: String,
    pub min_qty: String,
    pub package_multiple: String,
    pub rohs: String,
    /// 有効な(しきい値あり・正の単価)ティアのみ、a〜e順
    pub price_breaks: Vec<PriceBreak>,
    /// APIが割り当てた在庫カテゴリ(フラット型レスポンスではNone)
    pub category: Option<StockCategory>,
    /// APIが割り当てた地域(マルチリージョン型のみ)
    pub region: Option<Region>,
}

impl ResultRecord {
    /// ソート用の数量。数値化できない場合は0
    pub fn qty_value(&self) -> f64 {
        self.qty.trim().parse().unwrap_or(0.0)
    }
}

/// ワイヤ上のレコード。数値と文字列が混在して届くフィールドは
/// string_or_numberで吸収する
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    part_number: String,
    mfr: String,
    dc: String,
    description: String,
    #[serde(deserialize_with = "string_or_number")]
    qty: String,
    country: String,
    #[serde(deserialize_with = "string_or_number")]
    supplier_id: String,
    supplier_name: String,
    #[serde(deserialize_with = "string_or_number")]
    supplier_code: String,
    processed_at: String,
    link: String,
    #[serde(deserialize_with = "string_or_number")]
    min_qty: String,
    #[serde(deserialize_with = "string_or_number")]
    package_multiple: String,
    #[serde(deserialize_with = "string_or_number")]
    rohs: String,
    #[serde(deserialize_with = "string_or_number")]
    break_qty_a: String,
    #[serde(deserialize_with = "string_or_number")]
    break_qty_b: String,
    #[serde(deserialize_with = "string_or_number")]
    break_qty_c: String,
    #[serde(deserialize_with = "string_or_number")]
    break_qty_d: String,
    #[serde(deserialize_with = "string_or_number")]
    break_qty_e: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price_a: Option<f64>,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price_b: Option<f64>,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price_c: Option<f64>,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price_d: Option<f64>,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price_e: Option<f64>,
}

impl From<RawRecord> for ResultRecord {
    fn from(raw: RawRecord) -> Self {
        let tiers = [
            (&raw.break_qty_a, raw.price_a),
            (&raw.break_qty_b, raw.price_b),
            (&raw.break_qty_c, raw.price_c),
            (&raw.break_qty_d, raw.price_d),
            (&raw.break_qty_e, raw.price_e),
        ];
        // しきい値と単価が両方あり、単価が正のティアだけを残す
        let price_breaks = tiers
            .into_iter()
            .filter_map(|(qty, price)| match price {
                Some(price) if !qty.is_empty() && price > 0.0 => Some(PriceBreak {
                    qty: qty.clone(),
                    price,
                }),
                _ => None,
            })
            .collect();

        ResultRecord {
            part_number: raw.part_number,
            mfr: raw.mfr,
            dc: raw.dc,
            description: raw.description,
            qty: raw.qty,
            country: raw.country,
            supplier_id: raw.supplier_id,
            supplier_name: raw.supplier_name,
            supplier_code: raw.supplier_code,
            processed_at: raw.processed_at,
            link: raw.link,
            min_qty: raw.min_qty,
            package_multiple: raw.package_multiple,
            rohs: raw.rohs,
            price_breaks,
            category: None,
            region: None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// インクリメンタル検索ドロップダウンの候補1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub part_number: String,
    pub num_results: u64,
}

/// メールアドレスの形式チェック(空白なし・@の前後・ドメインにドット)
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut domain_parts = domain.rsplitn(2, '.');
    let tld = domain_parts.next().unwrap_or("");
    let host = domain_parts.next().unwrap_or("");
    !tld.is_empty() && !host.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // SearchQuery テスト
    // =============================================

    #[test]
    fn test_search_query_rejects_short_value() {
        let result = SearchQuery::new(SearchField::Mpn, MatchType::BeginsWith, "XC");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_search_query_accepts_min_length() {
        let query = SearchQuery::new(SearchField::Mpn, MatchType::BeginsWith, "XC7").unwrap();
        assert_eq!(query.value, "XC7");
    }

    #[test]
    fn test_exact_mpn_query() {
        let query = SearchQuery::exact_mpn("XC7A100T").unwrap();
        assert_eq!(query.field, SearchField::Mpn);
        assert_eq!(query.match_type, MatchType::Exact);
    }

    #[test]
    fn test_query_pairs_round_trip() {
        let query =
            SearchQuery::new(SearchField::Manufacturer, MatchType::Exact, "Xilinx").unwrap();
        let pairs = query.to_query_pairs();
        let borrowed: Vec<(&str, &str)> =
            pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let restored = SearchQuery::from_query_pairs(borrowed).unwrap();
        assert_eq!(restored, query);
    }

    #[test]
    fn test_from_query_pairs_defaults() {
        let restored =
            SearchQuery::from_query_pairs([("field_value", "XC7A100T")]).unwrap();
        assert_eq!(restored.field, SearchField::Mpn);
        assert_eq!(restored.match_type, MatchType::BeginsWith);
    }

    #[test]
    fn test_from_query_pairs_unknown_values_fall_back() {
        let restored = SearchQuery::from_query_pairs([
            ("field", "serial_number"),
            ("search_type", "fuzzy"),
            ("field_value", "XC7A100T"),
        ])
        .unwrap();
        assert_eq!(restored.field, SearchField::Mpn);
        assert_eq!(restored.match_type, MatchType::BeginsWith);
    }

    // =============================================
    // ResultRecord デシリアライズテスト
    // =============================================

    #[test]
    fn test_record_deserialize_minimal() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"part_number": "XC7A100T"}"#).unwrap();
        assert_eq!(record.part_number, "XC7A100T");
        assert!(record.price_breaks.is_empty());
        assert!(record.category.is_none());
    }

    #[test]
    fn test_record_qty_accepts_number_and_string() {
        let a: ResultRecord = serde_json::from_str(r#"{"qty": 1500}"#).unwrap();
        let b: ResultRecord = serde_json::from_str(r#"{"qty": "1500"}"#).unwrap();
        assert_eq!(a.qty, "1500");
        assert_eq!(b.qty, "1500");
        assert_eq!(a.qty_value(), 1500.0);
    }

    #[test]
    fn test_record_qty_value_defaults_to_zero() {
        let record: ResultRecord = serde_json::from_str(r#"{"qty": "N/A"}"#).unwrap();
        assert_eq!(record.qty_value(), 0.0);
    }

    #[test]
    fn test_price_breaks_keep_only_valid_tiers() {
        let record: ResultRecord = serde_json::from_str(
            r#"{
                "part_number": "XC7A100T",
                "break_qty_a": 1, "price_a": 125.5,
                "break_qty_b": 10, "price_b": 0,
                "break_qty_c": "", "price_c": 99.0,
                "break_qty_d": "100", "price_d": "88.25"
            }"#,
        )
        .unwrap();
        assert_eq!(record.price_breaks.len(), 2);
        assert_eq!(record.price_breaks[0].qty, "1");
        assert_eq!(record.price_breaks[0].price, 125.5);
        assert_eq!(record.price_breaks[1].qty, "100");
        assert_eq!(record.price_breaks[1].price, 88.25);
    }

    #[test]
    fn test_price_breaks_preserve_tier_order() {
        let record: ResultRecord = serde_json::from_str(
            r#"{
                "break_qty_a": 1, "price_a": 3.0,
                "break_qty_b": 10, "price_b": 2.0,
                "break_qty_c": 100, "price_c": 1.0,
                "break_qty_d": 1000, "price_d": 0.5,
                "break_qty_e": 10000, "price_e": 0.25
            }"#,
        )
        .unwrap();
        let qtys: Vec<&str> = record.price_breaks.iter().map(|b| b.qty.as_str()).collect();
        assert_eq!(qtys, vec!["1", "10", "100", "1000", "10000"]);
    }

    #[test]
    fn test_record_null_fields_become_empty() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"qty": null, "supplier_id": null}"#).unwrap();
        assert_eq!(record.qty, "");
        assert_eq!(record.supplier_id, "");
    }

    // =============================================
    // メールアドレス形式チェック
    // =============================================

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(is_valid_email("first.last@parts.co.jp"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("buyer@nodot"));
        assert!(!is_valid_email("buyer@.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email(""));
    }
}

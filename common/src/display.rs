//! 表示ポリシー(マスキング・整形)
//!
//! 未ログイン時のマスキングは表示層のポリシーであり、
//! セキュリティ境界ではない(値の形だけ見せて内容を伏せる)。

/// 未ログイン時のサプライヤー名プレースホルダ(固定幅)
pub const MASKED_SUPPLIER: &str = "******";
/// 未ログイン時の国コードプレースホルダ
pub const MASKED_COUNTRY: &str = "**";
/// 説明文の表示上限(文字数)
pub const DESCRIPTION_MAX_CHARS: usize = 50;
/// 価格ティアのプレビュー表示数(残りは展開で表示)
pub const PRICE_BREAK_PREVIEW: usize = 3;

/// 数字をすべて'*'に置き換える
pub fn mask_digits(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_digit() { '*' } else { c })
        .collect()
}

/// 空文字と"nan"(大文字小文字問わず)を欠損として扱う
pub fn clean_field(s: &str) -> Option<&str> {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s)
    }
}

/// 欠損は"-"で表示
pub fn field_or_dash(s: &str) -> String {
    clean_field(s).unwrap_or("-").to_string()
}

/// 説明文を50文字で切り詰める
pub fn truncate_description(s: &str) -> String {
    match clean_field(s) {
        None => "-".to_string(),
        Some(s) if s.chars().count() > DESCRIPTION_MAX_CHARS => {
            let head: String = s.chars().take(DESCRIPTION_MAX_CHARS).collect();
            format!("{}...", head)
        }
        Some(s) => s.to_string(),
    }
}

/// ISOタイムスタンプの日付部分
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// サプライヤー名。未ログイン時は固定幅プレースホルダ
pub fn supplier_display(name: &str, signed_in: bool) -> String {
    if !signed_in {
        return MASKED_SUPPLIER.to_string();
    }
    field_or_dash(name)
}

/// 国コード。欠損は"-"、未ログイン時はプレースホルダ
pub fn country_display(country: &str, signed_in: bool) -> String {
    match clean_field(country) {
        None => "-".to_string(),
        Some(_) if !signed_in => MASKED_COUNTRY.to_string(),
        Some(country) => country.to_string(),
    }
}

/// 取込日。欠損は"-"、未ログイン時は数字をマスク
pub fn processed_at_display(timestamp: &str, signed_in: bool) -> String {
    match clean_field(timestamp) {
        None => "-".to_string(),
        Some(timestamp) => {
            let date = date_part(timestamp);
            if signed_in {
                date.to_string()
            } else {
                mask_digits(date)
            }
        }
    }
}

/// 単価の表示(小数4桁)
pub fn format_price(price: f64) -> String {
    format!("${:.4}", price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_digits() {
        assert_eq!(mask_digits("2024-06-18"), "****-**-**");
        assert_eq!(mask_digits("no digits"), "no digits");
        assert_eq!(mask_digits(""), "");
    }

    #[test]
    fn test_clean_field_treats_nan_as_missing() {
        assert_eq!(clean_field("nan"), None);
        assert_eq!(clean_field("NaN"), None);
        assert_eq!(clean_field(""), None);
        assert_eq!(clean_field("Xilinx"), Some("Xilinx"));
    }

    #[test]
    fn test_field_or_dash() {
        assert_eq!(field_or_dash("nan"), "-");
        assert_eq!(field_or_dash("2311"), "2311");
    }

    #[test]
    fn test_truncate_description() {
        let long = "a".repeat(60);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), DESCRIPTION_MAX_CHARS + 3);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_description("short"), "short");
        assert_eq!(truncate_description("nan"), "-");
    }

    #[test]
    fn test_supplier_display_masks_when_signed_out() {
        assert_eq!(supplier_display("Chip One", false), MASKED_SUPPLIER);
        assert_eq!(supplier_display("Chip One", true), "Chip One");
        assert_eq!(supplier_display("", true), "-");
    }

    #[test]
    fn test_country_display() {
        assert_eq!(country_display("JP", false), MASKED_COUNTRY);
        assert_eq!(country_display("JP", true), "JP");
        assert_eq!(country_display("", false), "-");
        assert_eq!(country_display("", true), "-");
    }

    #[test]
    fn test_processed_at_display() {
        let ts = "2024-06-18T09:30:00Z";
        assert_eq!(processed_at_display(ts, true), "2024-06-18");
        assert_eq!(processed_at_display(ts, false), "****-**-**");
        assert_eq!(processed_at_display("", false), "-");
    }

    #[test]
    fn test_masked_values_never_contain_original() {
        // 未ログイン時に真の値が現れないこと
        let supplier = supplier_display("Chip One", false);
        assert!(!supplier.contains("Chip One"));
        let country = country_display("JP", false);
        assert!(!country.contains("JP"));
        let processed = processed_at_display("2024-06-18T09:30:00Z", false);
        assert!(!processed.contains('2'));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.125), "$0.1250");
        assert_eq!(format_price(88.25), "$88.2500");
    }
}

//! APIエンドポイント定義
//!
//! リクエスト/レスポンスのワイヤ形状はこのモジュールに閉じる。
//! 検索レスポンスの正規化は共通ライブラリのparserが担う。

use std::collections::BTreeMap;

use parts_locator_common::{
    parse_search_response, parse_suggestions, Error, Result, SearchQuery, SearchResults,
    Suggestion,
};
use serde::{Deserialize, Serialize};

use super::client;

/// 検索リクエスト
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search_type: &'a str,
    search_source: &'a str,
    field: &'a str,
    field_value: &'a str,
}

async fn search_raw(query: &SearchQuery, search_source: &str) -> Result<serde_json::Value> {
    client::post_json(
        "/search",
        &SearchRequest {
            search_type: query.match_type.as_str(),
            search_source,
            field: query.field.as_str(),
            field_value: &query.value,
        },
    )
    .await
}

/// 検索。search_sourceは呼び出し元画面の識別子
pub async fn search(query: &SearchQuery, search_source: &str) -> Result<SearchResults> {
    let response = search_raw(query, search_source).await?;
    parse_search_response(&response)
}

/// インクリメンタル検索のドロップダウン候補
pub async fn suggest(query: &SearchQuery) -> Result<Vec<Suggestion>> {
    let response = search_raw(query, "search_bar").await?;
    parse_suggestions(&response)
}

// =============================================
// 認証
// =============================================

#[derive(Debug, Serialize)]
struct SigninRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// サインイン結果
#[derive(Debug, Clone, Deserialize)]
pub struct SigninResponse {
    pub user: String,
    pub token: String,
}

pub async fn signin(username: &str, password: &str) -> Result<SigninResponse> {
    client::post_json("/user/signin", &SigninRequest { username, password }).await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

pub async fn register(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    let _: serde_json::Value = client::post_json(
        "/user/register",
        &RegisterRequest {
            email,
            password,
            first_name,
            last_name,
        },
    )
    .await?;
    Ok(())
}

/// 保存済みトークンの有効性確認
pub async fn verify() -> Result<()> {
    let _: serde_json::Value = client::get_json("/user/verify").await?;
    Ok(())
}

// =============================================
// サプライヤー
// =============================================

/// サプライヤー登録フォームの入力値
#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    pub company_name: String,
    pub contact_email: String,
    pub password: String,
    pub phone_number: String,
    pub address: String,
    pub country: String,
    pub description: String,
    pub website: String,
    pub email_for_upload: String,
    pub in_stock_file_name: String,
    pub brokered_file_name: String,
    /// 標準フィールド名 → サプライヤー側の列名
    pub field_mappings: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSupplierRequest {
    company_name: String,
    contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_for_upload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_stock_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brokered_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_mappings: Option<BTreeMap<String, String>>,
}

/// 空・空白のみのフィールドは送信前に落とす
fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl SupplierForm {
    fn to_request(&self) -> CreateSupplierRequest {
        let field_mappings: BTreeMap<String, String> = self
            .field_mappings
            .iter()
            .filter(|(_, column)| !column.trim().is_empty())
            .map(|(key, column)| (key.clone(), column.trim().to_string()))
            .collect();
        CreateSupplierRequest {
            company_name: self.company_name.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            password: blank_to_none(&self.password),
            phone_number: blank_to_none(&self.phone_number),
            address: blank_to_none(&self.address),
            country: blank_to_none(&self.country),
            description: blank_to_none(&self.description),
            website: blank_to_none(&self.website),
            email_for_upload: blank_to_none(&self.email_for_upload),
            in_stock_file_name: blank_to_none(&self.in_stock_file_name),
            brokered_file_name: blank_to_none(&self.brokered_file_name),
            field_mappings: if field_mappings.is_empty() {
                None
            } else {
                Some(field_mappings)
            },
        }
    }
}

pub async fn create_supplier(form: &SupplierForm) -> Result<()> {
    let _: serde_json::Value = client::post_json("/supplier/create", &form.to_request()).await?;
    Ok(())
}

/// サプライヤー詳細
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupplierInfo {
    pub company_name: String,
    pub description: String,
    pub address: String,
    #[serde(alias = "phoneNumber")]
    pub phone_number: String,
    pub website: String,
    pub contact_email: String,
}

#[derive(Debug, Deserialize)]
struct SupplierDetailsResponse {
    supplier: SupplierEnvelope,
}

#[derive(Debug, Deserialize)]
struct SupplierEnvelope {
    supplier_info: SupplierInfo,
}

pub async fn supplier_details(supplier_id: &str) -> Result<SupplierInfo> {
    let response: SupplierDetailsResponse =
        client::get_json(&format!("/supplier/details/{}", supplier_id)).await?;
    Ok(response.supplier.supplier_info)
}

// =============================================
// 購読
// =============================================

#[derive(Debug, Deserialize)]
struct SubscriptionsResponse {
    #[serde(rename = "subscribedParts", default)]
    subscribed_parts: Vec<String>,
}

/// 現在のユーザーが購読中の型番一覧
pub async fn subscriptions() -> Result<Vec<String>> {
    let response: SubscriptionsResponse = client::get_json("/user/subscriptions").await?;
    Ok(response.subscribed_parts)
}

#[derive(Debug, Serialize)]
struct SubscriptionRequest<'a> {
    part_number: &'a str,
}

pub async fn subscribe(part_number: &str) -> Result<()> {
    let _: serde_json::Value =
        client::post_json("/user/subscribe", &SubscriptionRequest { part_number }).await?;
    Ok(())
}

pub async fn unsubscribe(part_number: &str) -> Result<()> {
    let _: serde_json::Value =
        client::post_json("/user/unsubscribe", &SubscriptionRequest { part_number }).await?;
    Ok(())
}

// =============================================
// 価格データアップロード
// =============================================

/// アップロードするCSVのContent-Type
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// 価格データアップロードフォームの入力値
#[derive(Debug, Clone, Default)]
pub struct PricingUploadForm {
    pub email_address: String,
    pub mpn_field: String,
    pub mfr_field: String,
    pub quantity_requested_field: String,
}

#[derive(Debug, Serialize)]
struct PresignedUrlRequest {
    email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mpn_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mfr_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity_requested_field: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PresignedUrlResponse {
    #[serde(default)]
    presigned_url: String,
}

/// 2段階アップロードの1段目: 事前署名URLの発行
pub async fn pricing_presigned_url(form: &PricingUploadForm) -> Result<String> {
    let request = PresignedUrlRequest {
        email_address: form.email_address.trim().to_string(),
        mpn_field: blank_to_none(&form.mpn_field),
        mfr_field: blank_to_none(&form.mfr_field),
        quantity_requested_field: blank_to_none(&form.quantity_requested_field),
    };
    let response: PresignedUrlResponse =
        client::post_json("/get-pricing-presigned-url", &request).await?;
    if response.presigned_url.is_empty() {
        return Err(Error::Parse(
            "アップロードURLを取得できませんでした".to_string(),
        ));
    }
    Ok(response.presigned_url)
}

/// 2段階アップロードの2段目: 発行されたURLへのファイル直PUT
pub async fn upload_pricing_file(presigned_url: &str, file: &web_sys::File) -> Result<()> {
    client::put_file(presigned_url, file, CSV_CONTENT_TYPE).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // リクエストのシリアライズテスト
    // =============================================

    #[test]
    fn test_search_request_serialize() {
        let request = SearchRequest {
            search_type: "begins_with",
            search_source: "search_page",
            field: "mpn",
            field_value: "XC7A100T",
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"search_type\":\"begins_with\""));
        assert!(json.contains("\"search_source\":\"search_page\""));
        assert!(json.contains("\"field\":\"mpn\""));
        assert!(json.contains("\"field_value\":\"XC7A100T\""));
    }

    #[test]
    fn test_register_request_uses_camel_case() {
        let request = RegisterRequest {
            email: "buyer@example.com",
            password: "secret",
            first_name: "Taro",
            last_name: "Yamada",
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"firstName\":\"Taro\""));
        assert!(json.contains("\"lastName\":\"Yamada\""));
    }

    #[test]
    fn test_supplier_form_omits_blank_fields() {
        let form = SupplierForm {
            company_name: "Chip One".to_string(),
            contact_email: "sales@chipone.example".to_string(),
            phone_number: "   ".to_string(),
            website: String::new(),
            description: "FPGA distributor".to_string(),
            ..SupplierForm::default()
        };
        let json = serde_json::to_string(&form.to_request()).expect("シリアライズ失敗");
        assert!(json.contains("\"companyName\":\"Chip One\""));
        assert!(json.contains("\"description\":\"FPGA distributor\""));
        // 空・空白のみのフィールドはキーごと落ちる
        assert!(!json.contains("phoneNumber"));
        assert!(!json.contains("website"));
        assert!(!json.contains("password"));
        assert!(!json.contains("fieldMappings"));
    }

    #[test]
    fn test_supplier_form_keeps_nonblank_mappings() {
        let mut form = SupplierForm {
            company_name: "Chip One".to_string(),
            contact_email: "sales@chipone.example".to_string(),
            ..SupplierForm::default()
        };
        form.field_mappings
            .insert("Part Number".to_string(), "pn".to_string());
        form.field_mappings
            .insert("Quantity".to_string(), "  ".to_string());
        let json = serde_json::to_string(&form.to_request()).expect("シリアライズ失敗");
        assert!(json.contains("\"fieldMappings\":{\"Part Number\":\"pn\"}"));
    }

    #[test]
    fn test_presigned_url_request_omits_blank_hints() {
        let form = PricingUploadForm {
            email_address: "buyer@example.com".to_string(),
            mpn_field: "part_no".to_string(),
            ..PricingUploadForm::default()
        };
        let request = PresignedUrlRequest {
            email_address: form.email_address.trim().to_string(),
            mpn_field: blank_to_none(&form.mpn_field),
            mfr_field: blank_to_none(&form.mfr_field),
            quantity_requested_field: blank_to_none(&form.quantity_requested_field),
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"mpn_field\":\"part_no\""));
        assert!(!json.contains("mfr_field"));
        assert!(!json.contains("quantity_requested_field"));
    }

    // =============================================
    // レスポンスのデシリアライズテスト
    // =============================================

    #[test]
    fn test_signin_response_deserialize() {
        let json = r#"{"user": "taro", "token": "jwt-token"}"#;
        let response: SigninResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.user, "taro");
        assert_eq!(response.token, "jwt-token");
    }

    #[test]
    fn test_supplier_details_response_deserialize() {
        let json = r#"{
            "supplier": {
                "supplier_info": {
                    "company_name": "Chip One",
                    "phoneNumber": "+81-3-0000-0000",
                    "contact_email": "sales@chipone.example"
                }
            }
        }"#;
        let response: SupplierDetailsResponse =
            serde_json::from_str(json).expect("デシリアライズ失敗");
        let info = response.supplier.supplier_info;
        assert_eq!(info.company_name, "Chip One");
        assert_eq!(info.phone_number, "+81-3-0000-0000");
        assert_eq!(info.website, "");
    }

    #[test]
    fn test_subscriptions_response_deserialize() {
        let json = r#"{"subscribedParts": ["XC7A100T", "STM32F103"]}"#;
        let response: SubscriptionsResponse =
            serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.subscribed_parts.len(), 2);

        let empty: SubscriptionsResponse = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(empty.subscribed_parts.is_empty());
    }

    #[test]
    fn test_presigned_url_response_deserialize() {
        let json = r#"{"presigned_url": "https://bucket.example/upload?sig=abc"}"#;
        let response: PresignedUrlResponse =
            serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.presigned_url, "https://bucket.example/upload?sig=abc");

        let missing: PresignedUrlResponse = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(missing.presigned_url.is_empty());
    }
}

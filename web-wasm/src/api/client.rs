//! fetchラッパー
//!
//! 全リクエストに共通する処理をまとめる: ベアラートークンの付与
//! (リクエスト毎にストレージから読み直す)、401での保存トークン破棄、
//! エラー本文からのサーバ提供メッセージ抽出。

use parts_locator_common::{Error, Result};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::storage;

/// APIゲートウェイのベースURL
pub const API_BASE_URL: &str = "https://obkg1pw61g.execute-api.us-west-2.amazonaws.com/prod";

pub async fn post_json<T, B>(path: &str, body: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: serde::Serialize,
{
    let body = serde_json::to_string(body)?;
    request_json("POST", &format!("{}{}", API_BASE_URL, path), Some(body)).await
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    request_json("GET", &format!("{}{}", API_BASE_URL, path), None).await
}

async fn request_json<T: DeserializeOwned>(
    method: &str,
    url: &str,
    body: Option<String>,
) -> Result<T> {
    let response = fetch(method, url, body).await?;
    let json = JsFuture::from(response.json().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    serde_wasm_bindgen::from_value(json)
        .map_err(|e| Error::Parse(format!("レスポンスのデコードに失敗しました: {}", e)))
}

async fn fetch(method: &str, url: &str, body: Option<String>) -> Result<Response> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    // トークンはキャッシュせず毎回読み直す
    if let Some(token) = storage::token() {
        request
            .headers()
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(js_error)?;
    }

    let response = send(&request).await?;

    if response.status() == 401 {
        // 認可エラー: 保存済みトークンを破棄し、以後のリクエストは
        // 未認証のまま続行する
        storage::clear_token();
    }
    if !response.ok() {
        let message = error_detail(&response).await;
        return Err(Error::Api {
            status: response.status(),
            message,
        });
    }
    Ok(response)
}

/// 事前署名URLへのファイル直PUT(認証ヘッダなし・Content-Typeはファイルに合わせる)
pub async fn put_file(url: &str, file: &web_sys::File, content_type: &str) -> Result<()> {
    let opts = RequestInit::new();
    opts.set_method("PUT");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(file.as_ref());

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", content_type)
        .map_err(js_error)?;

    let response = send(&request).await?;
    if !response.ok() {
        let message = error_detail(&response).await;
        return Err(Error::Api {
            status: response.status(),
            message,
        });
    }
    Ok(())
}

async fn send(request: &Request) -> Result<Response> {
    let window = web_sys::window().ok_or_else(|| Error::Api {
        status: 0,
        message: "windowがありません".to_string(),
    })?;
    let response_value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    response_value.dyn_into().map_err(js_error)
}

/// エラー本文からサーバ提供の詳細メッセージを取り出す。
/// JSONなら error / message キーを優先し、無ければ本文をそのまま使う
async fn error_detail(response: &Response) -> String {
    let fallback = response.status_text();
    let Ok(text_promise) = response.text() else {
        return fallback;
    };
    let Ok(text_value) = JsFuture::from(text_promise).await else {
        return fallback;
    };
    let Some(text) = text_value.as_string() else {
        return fallback;
    };
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["error", "message"] {
            if let Some(detail) = value.get(key).and_then(|v| v.as_str()) {
                return detail.to_string();
            }
        }
    }
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Api {
        status: 0,
        message: format!("{:?}", value),
    }
}

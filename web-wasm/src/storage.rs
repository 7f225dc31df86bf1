//! ブラウザローカルストレージ(トークン・ユーザー名・検索既定値)
//!
//! 認証トークンはここに置くだけで、セッション中はキャッシュしない。
//! APIクライアントがリクエスト毎にtoken()を読み直す(401ハンドラが
//! 他のリクエスト処理中に消すことがあるため)。

use gloo::storage::{LocalStorage, Storage};
use parts_locator_common::{MatchType, SearchField};

/// 認証トークンの保存キー
pub const TOKEN_KEY: &str = "component-locator-token";
/// ユーザー名の保存キー
pub const USER_KEY: &str = "component-locator-user";
/// 既定の検索フィールドの保存キー
pub const DEFAULT_FIELD_KEY: &str = "defaultField";
/// 既定の一致方法の保存キー
pub const DEFAULT_SEARCH_TYPE_KEY: &str = "defaultSearchType";

pub fn token() -> Option<String> {
    LocalStorage::get(TOKEN_KEY).ok()
}

pub fn set_token(token: &str) {
    let _ = LocalStorage::set(TOKEN_KEY, token);
}

pub fn clear_token() {
    LocalStorage::delete(TOKEN_KEY);
}

pub fn user() -> Option<String> {
    LocalStorage::get(USER_KEY).ok()
}

pub fn set_user(user: &str) {
    let _ = LocalStorage::set(USER_KEY, user);
}

pub fn clear_user() {
    LocalStorage::delete(USER_KEY);
}

/// 保存済みの検索既定値。未保存・不正値は既定値にフォールバック
pub fn saved_defaults() -> (SearchField, MatchType) {
    let field = LocalStorage::get::<String>(DEFAULT_FIELD_KEY)
        .ok()
        .and_then(|s| SearchField::parse(&s))
        .unwrap_or_default();
    let match_type = LocalStorage::get::<String>(DEFAULT_SEARCH_TYPE_KEY)
        .ok()
        .and_then(|s| MatchType::parse(&s))
        .unwrap_or_default();
    (field, match_type)
}

pub fn save_defaults(field: SearchField, match_type: MatchType) {
    let _ = LocalStorage::set(DEFAULT_FIELD_KEY, field.as_str());
    let _ = LocalStorage::set(DEFAULT_SEARCH_TYPE_KEY, match_type.as_str());
}

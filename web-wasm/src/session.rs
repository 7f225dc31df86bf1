//! セッション(ログイン状態)ストア
//!
//! グローバル可変状態にはせず、コンテキスト経由で明示的に注入する。
//! トークン実体はストレージが持ち、APIクライアントがリクエスト毎に
//! 読み直す。ここが持つのは表示用のユーザー識別だけ。

use leptos::prelude::*;
use parts_locator_common::Result;

use crate::api;
use crate::storage;

/// 現在のセッション。生成はログイン時、破棄はログアウトか
/// 認可エラー(401)受信時
#[derive(Clone, Copy)]
pub struct Session {
    user: RwSignal<Option<String>>,
}

impl Session {
    /// 起動時にストレージから復元する。トークンとユーザー名が
    /// 揃っている場合だけログイン状態として扱う
    pub fn restore() -> Self {
        let user = match (storage::token(), storage::user()) {
            (Some(_), Some(user)) => Some(user),
            _ => None,
        };
        Session {
            user: RwSignal::new(user),
        }
    }

    pub fn user(&self) -> Option<String> {
        self.user.get()
    }

    pub fn signed_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// サインイン。成功時はトークンとユーザー名を保存する
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let signin = api::signin(username, password).await?;
        storage::set_token(&signin.token);
        storage::set_user(&signin.user);
        self.user.set(Some(signin.user));
        Ok(())
    }

    /// ユーザー登録。登録してもログイン状態にはしない
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        api::register(email, password, first_name, last_name).await
    }

    pub fn logout(&self) {
        storage::clear_token();
        storage::clear_user();
        self.user.set(None);
    }

    /// 認可エラー(401)を受けた時の無効化。トークンはAPI層が
    /// すでに破棄しているので、残りの状態を落とす
    pub fn expire(&self) {
        storage::clear_user();
        self.user.set(None);
    }
}

pub fn provide_session() -> Session {
    let session = Session::restore();
    provide_context(session);
    session
}

pub fn use_session() -> Session {
    expect_context::<Session>()
}

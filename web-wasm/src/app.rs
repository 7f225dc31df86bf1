//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use parts_locator_common::SearchQuery;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::{
    header::Header, locator::Locator, login_panel::LoginPanel, results_view::ResultsView,
    subscriptions_page::SubscriptionsPage, supplier_registration::SupplierRegistration,
    upload_pricing::UploadPricing,
};
use crate::session::provide_session;
use crate::storage;

/// 画面遷移先(ルーターは使わず、単一ツリー内で切り替える)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// 検索トップ
    #[default]
    Locator,
    /// 検索結果
    Results,
    /// ログイン / ユーザー登録
    Login,
    /// 購読一覧
    Subscriptions,
    /// サプライヤー登録
    SupplierRegistration,
    /// 価格データアップロード
    UploadPricing,
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let session = provide_session();
    let (page, set_page) = signal(Page::default());
    let (query, set_query) = signal(None::<SearchQuery>);

    // 保存済みトークンの有効性を起動時に確認する。401なら
    // API層がトークンを破棄するので、セッションも落とす
    if storage::token().is_some() {
        spawn_local(async move {
            if let Err(error) = api::verify().await {
                if error.is_unauthorized() {
                    session.expire();
                }
            }
        });
    }

    // 検索実行: クエリを差し替えて結果画面へ
    let on_search = move |new_query: SearchQuery| {
        set_query.set(Some(new_query));
        set_page.set(Page::Results);
    };

    view! {
        <div class="container">
            <Header page=page set_page=set_page />

            <main class="page-body">
                {move || match page.get() {
                    Page::Locator => view! { <Locator on_search=on_search /> }.into_any(),
                    Page::Results => view! { <ResultsView query=query on_search=on_search /> }.into_any(),
                    Page::Login => view! { <LoginPanel set_page=set_page /> }.into_any(),
                    Page::Subscriptions => view! { <SubscriptionsPage set_page=set_page /> }.into_any(),
                    Page::SupplierRegistration => view! { <SupplierRegistration /> }.into_any(),
                    Page::UploadPricing => view! { <UploadPricing /> }.into_any(),
                }}
            </main>
        </div>
    }
}

//! 検索トップページ

use leptos::prelude::*;
use parts_locator_common::SearchQuery;

use crate::components::search_bar::SearchBar;

#[component]
pub fn Locator<F>(on_search: F) -> impl IntoView
where
    F: Fn(SearchQuery) + Clone + Send + Sync + 'static,
{
    view! {
        <div class="locator">
            <h1>"電子部品を横断検索"</h1>
            <p class="text-muted">
                "ディストリビュータ各社の在庫と価格をまとめて検索できます"
            </p>

            <SearchBar on_search=on_search initial=None show_dropdown=true />

            <p class="text-muted locator-hint">
                "例: " <strong>"XC7A100T-1FTG256C"</strong>
            </p>
        </div>
    }
}

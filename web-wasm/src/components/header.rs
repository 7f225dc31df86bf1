//! ヘッダー(ナビゲーション)コンポーネント

use leptos::prelude::*;

use crate::app::Page;
use crate::session::use_session;

#[component]
pub fn Header(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    let session = use_session();

    let nav_link = move |target: Page, label: &'static str| {
        view! {
            <button
                class="nav-link"
                class:active=move || page.get() == target
                on:click=move |_| set_page.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <header class="header">
            <button class="brand" on:click=move |_| set_page.set(Page::Locator)>
                "Parts Locator - 電子部品横断検索"
            </button>

            <nav class="nav">
                {nav_link(Page::Locator, "部品検索")}
                {nav_link(Page::SupplierRegistration, "サプライヤー登録")}
                {nav_link(Page::UploadPricing, "価格データアップロード")}
                <Show when=move || session.signed_in()>
                    {nav_link(Page::Subscriptions, "購読一覧")}
                </Show>
            </nav>

            <div class="session-area">
                <Show
                    when=move || session.signed_in()
                    fallback=move || view! {
                        <button
                            class="btn btn-primary btn-small"
                            on:click=move |_| set_page.set(Page::Login)
                        >
                            "ログイン"
                        </button>
                    }
                >
                    <span class="session-user">
                        {move || session.user().unwrap_or_default()}
                    </span>
                    <button
                        class="btn btn-secondary btn-small"
                        on:click=move |_| {
                            session.logout();
                            set_page.set(Page::Locator);
                        }
                    >
                        "ログアウト"
                    </button>
                </Show>
            </div>
        </header>
    }
}

//! 購読一覧ページ
//!
//! ログイン中のユーザーが購読している型番の一覧と解除。
//! 解除は楽観的にリストから外し、失敗したら戻す。

use std::collections::HashSet;

use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::SubscriptionSet;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::app::Page;
use crate::session::use_session;

#[component]
pub fn SubscriptionsPage(set_page: WriteSignal<Page>) -> impl IntoView {
    let session = use_session();
    let (subscriptions, set_subscriptions) = signal(SubscriptionSet::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(HashSet::<String>::new());

    Effect::new(move |_| {
        if !session.signed_in() {
            return;
        }
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::subscriptions().await {
                Ok(parts) => set_subscriptions.set(SubscriptionSet::from_parts(parts)),
                Err(error) => {
                    logging::error!("購読リストの取得に失敗しました: {}", error);
                    set_error.set(Some(
                        "購読リストを読み込めませんでした。".to_string(),
                    ));
                }
            }
            set_loading.set(false);
        });
    });

    let unsubscribe = move |part_number: String| {
        set_busy.update(|busy| {
            busy.insert(part_number.clone());
        });
        // 楽観的にリストから外す
        set_subscriptions.update(|set| {
            set.remove(&part_number);
        });
        spawn_local(async move {
            if let Err(error) = api::unsubscribe(&part_number).await {
                logging::error!("購読解除に失敗しました: {}", error);
                set_error.set(Some(format!(
                    "{}の購読解除に失敗しました。",
                    part_number
                )));
                // 失敗したので戻す
                set_subscriptions.update(|set| {
                    set.insert(&part_number);
                });
            }
            set_busy.update(|busy| {
                busy.remove(&part_number);
            });
        });
    };

    view! {
        <div class="subscriptions-page">
            <h2>"購読一覧"</h2>

            <Show
                when=move || session.signed_in()
                fallback=move || {
                    view! {
                        <div class="alert alert-info">
                            "購読一覧を見るにはログインしてください。"
                            <button
                                type="button"
                                class="btn btn-primary btn-small"
                                on:click=move |_| set_page.set(Page::Login)
                            >
                                "ログインへ"
                            </button>
                        </div>
                    }
                }
            >
                {move || {
                    error
                        .get()
                        .map(|message| {
                            view! {
                                <div class="alert alert-danger">
                                    <span>{message}</span>
                                    <button
                                        type="button"
                                        class="link-button"
                                        on:click=move |_| set_error.set(None)
                                    >
                                        "閉じる"
                                    </button>
                                </div>
                            }
                        })
                }}

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <p>"購読リストを読込中..."</p> }
                >
                    <Show
                        when=move || !subscriptions.with(SubscriptionSet::is_empty)
                        fallback=|| {
                            view! {
                                <div class="alert alert-info">
                                    "購読中の型番はありません。部品を検索して購読ボタンを押すと、入荷時に通知を受け取れます。"
                                </div>
                            }
                        }
                    >
                        <div class="card">
                            <p class="text-muted">
                                {move || format!("{}件の型番を購読中", subscriptions.with(SubscriptionSet::len))}
                            </p>
                            <table class="results-table">
                                <thead>
                                    <tr>
                                        <th>"型番"</th>
                                        <th>"操作"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || subscriptions.get().parts().to_vec()
                                        key=|part_number| part_number.clone()
                                        children=move |part_number: String| {
                                            let busy_key = part_number.clone();
                                            let click_part = part_number.clone();
                                            view! {
                                                <tr>
                                                    <td>
                                                        <strong>{part_number.clone()}</strong>
                                                    </td>
                                                    <td>
                                                        <button
                                                            type="button"
                                                            class="btn btn-secondary btn-small"
                                                            disabled=move || {
                                                                busy.get().contains(&busy_key)
                                                            }
                                                            on:click=move |_| {
                                                                unsubscribe(click_part.clone())
                                                            }
                                                        >
                                                            "購読解除"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </Show>
                </Show>
            </Show>
        </div>
    }
}

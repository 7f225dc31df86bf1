//! 検索結果画面(結果表示エンジン)
//!
//! idle → loading → success | error の状態機械を新しいクエリのたびに
//! やり直す。レスポンス適用時にソート・展開状態をリセットし、
//! グルーピングは保持中のレコード列からモード切替のたびに再計算する。

use std::collections::HashSet;
use std::sync::Arc;

use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::{
    display, group_by_part_number, group_by_supplier, sort_records, GroupMode, RequestSequence,
    ResultRecord, SearchQuery, SearchResults, SortKey, SortState, StockCategory, SubscriptionSet,
};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::results_table::ResultsTable;
use crate::components::search_bar::SearchBar;
use crate::components::supplier_modal::SupplierModal;
use crate::session::use_session;

#[component]
pub fn ResultsView<F>(query: ReadSignal<Option<SearchQuery>>, on_search: F) -> impl IntoView
where
    F: Fn(SearchQuery) + Clone + Send + Sync + 'static,
{
    let session = use_session();
    let (results, set_results) = signal(SearchResults::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let sort = RwSignal::new(SortState::default());
    let (group_mode, set_group_mode) = signal(GroupMode::Flat);
    let (expanded, set_expanded) = signal(HashSet::<String>::new());
    let (subscriptions, set_subscriptions) = signal(SubscriptionSet::new());
    let (modal_record, set_modal_record) = signal(None::<ResultRecord>);
    let sequence = Arc::new(RequestSequence::new());

    // クエリが差し替わるたびに検索し直す(last-query-wins)
    Effect::new({
        let sequence = Arc::clone(&sequence);
        move |_| {
            let Some(query) = query.get() else {
                return;
            };
            let generation = sequence.begin();
            set_loading.set(true);
            set_error.set(None);
            let sequence = Arc::clone(&sequence);
            spawn_local(async move {
                let outcome = api::search(&query, "search_page").await;
                if !sequence.is_current(generation) {
                    // すでに新しいクエリが走っている
                    return;
                }
                set_loading.set(false);
                match outcome {
                    Ok(found) => {
                        if found.dropped > 0 {
                            logging::warn!(
                                "{}件のレコードをデコードできず除外しました",
                                found.dropped
                            );
                        }
                        // 新しいレスポンスの適用時にビュー状態をリセット
                        sort.set(SortState::default());
                        set_expanded.set(HashSet::new());
                        set_results.set(found);
                    }
                    Err(error) => {
                        if error.is_unauthorized() {
                            session.expire();
                        }
                        logging::error!("検索に失敗しました: {}", error);
                        set_error.set(Some(format!("検索に失敗しました: {}", error)));
                        set_results.set(SearchResults::default());
                    }
                }
            });
        }
    });

    // ログイン中なら購読リストを読み込む(行の購読ボタン表示用)
    Effect::new(move |_| {
        if session.signed_in() {
            spawn_local(async move {
                match api::subscriptions().await {
                    Ok(parts) => set_subscriptions.set(SubscriptionSet::from_parts(parts)),
                    Err(error) => {
                        logging::warn!("購読リストの取得に失敗しました: {}", error);
                    }
                }
            });
        } else {
            set_subscriptions.set(SubscriptionSet::new());
        }
    });

    // カラムヘッダのクリック。状態をトグルして保持中の全レコードに適用
    let on_sort = move |key: SortKey| {
        sort.update(|state| state.toggle(key));
        let state = sort.get_untracked();
        if let Some(key) = state.key {
            set_results.update(|results| {
                sort_records(&mut results.records, key, state.direction);
            });
        }
    };

    // 購読トグル(楽観的更新、失敗時は巻き戻し)
    let on_toggle_subscription = move |part_number: String| {
        let was_subscribed = subscriptions.get_untracked().contains(&part_number);
        set_subscriptions.update(|set| {
            if was_subscribed {
                set.remove(&part_number);
            } else {
                set.insert(&part_number);
            }
        });
        spawn_local(async move {
            let outcome = if was_subscribed {
                api::unsubscribe(&part_number).await
            } else {
                api::subscribe(&part_number).await
            };
            if let Err(error) = outcome {
                logging::error!("購読の更新に失敗しました: {}", error);
                // 失敗したので巻き戻す
                set_subscriptions.update(|set| {
                    if was_subscribed {
                        set.insert(&part_number);
                    } else {
                        set.remove(&part_number);
                    }
                });
            }
        });
    };

    let on_supplier_click = move |record: ResultRecord| {
        set_modal_record.set(Some(record));
    };

    let toggle_group = move |key: String| {
        set_expanded.update(|expanded| {
            if !expanded.remove(&key) {
                expanded.insert(key);
            }
        });
    };

    let table_for = move |records: Vec<ResultRecord>| {
        view! {
            <ResultsTable
                records=records
                sort=sort
                on_sort=on_sort
                subscriptions=subscriptions
                on_toggle_subscription=on_toggle_subscription
                on_supplier_click=on_supplier_click
            />
        }
    };

    // グループ見出し + 折りたたみ(既定は1行プレビュー)
    let group_section = move |key: String,
                             label: String,
                             count: usize,
                             expanded_body: AnyView,
                             preview: Vec<ResultRecord>| {
        let is_expanded = expanded.get().contains(&key);
        let toggle_key = key.clone();
        view! {
            <section class="result-group">
                <div class="group-header">
                    <h4>
                        {label}
                        <small class="text-muted">{format!(" {}件", count)}</small>
                    </h4>
                    <button
                        type="button"
                        class="link-button"
                        on:click=move |_| toggle_group(toggle_key.clone())
                    >
                        {if is_expanded { "折りたたむ" } else { "すべて表示" }}
                    </button>
                </div>
                {if is_expanded {
                    expanded_body
                } else {
                    table_for(preview).into_any()
                }}
            </section>
        }
    };

    let content = move || {
        if loading.get() {
            return view! {
                <div class="status-block">
                    <p>"検索中..."</p>
                </div>
            }
            .into_any();
        }

        let current = results.get();
        if current.is_empty() {
            if error.get().is_none() && query.get().is_some() {
                return view! {
                    <div class="alert alert-info">
                        "該当する結果がありません。条件を変えてお試しください。"
                    </div>
                }
                .into_any();
            }
            return ().into_any();
        }

        let signed_in = session.signed_in();
        match group_mode.get() {
            GroupMode::Flat => {
                if current.is_sectioned() {
                    let in_stock = current.in_category(StockCategory::InStock);
                    let brokered = current.in_category(StockCategory::Brokered);
                    view! {
                        <section class="stock-section">
                            <h3>{format!("在庫あり ({})", in_stock.len())}</h3>
                            {table_for(in_stock)}
                        </section>
                        <section class="stock-section">
                            <h3>{format!("ブローカー ({})", brokered.len())}</h3>
                            {table_for(brokered)}
                        </section>
                    }
                    .into_any()
                } else {
                    table_for(current.records.clone()).into_any()
                }
            }
            GroupMode::ByPartNumber => group_by_part_number(&current.records)
                .into_iter()
                .map(|(part_number, suppliers)| {
                    let count: usize = suppliers.iter().map(|(_, group)| group.len()).sum();
                    let preview: Vec<ResultRecord> = suppliers
                        .first()
                        .and_then(|(_, group)| group.first())
                        .cloned()
                        .into_iter()
                        .collect();
                    let expanded_body = suppliers
                        .into_iter()
                        .map(|(supplier, group)| {
                            view! {
                                <div class="subgroup">
                                    <h5>{display::supplier_display(&supplier, signed_in)}</h5>
                                    {table_for(group)}
                                </div>
                            }
                        })
                        .collect_view()
                        .into_any();
                    group_section(
                        format!("part:{}", part_number),
                        part_number,
                        count,
                        expanded_body,
                        preview,
                    )
                })
                .collect_view()
                .into_any(),
            GroupMode::BySupplier => group_by_supplier(&current.records)
                .into_iter()
                .map(|(supplier, group)| {
                    let count = group.len();
                    let preview: Vec<ResultRecord> =
                        group.first().cloned().into_iter().collect();
                    let expanded_body = table_for(group).into_any();
                    group_section(
                        format!("supplier:{}", supplier),
                        display::supplier_display(&supplier, signed_in),
                        count,
                        expanded_body,
                        preview,
                    )
                })
                .collect_view()
                .into_any(),
        }
    };

    view! {
        <div class="results-view">
            <h2>"部品検索結果"</h2>

            <div class="card">
                <SearchBar
                    on_search=on_search
                    initial=query.get_untracked()
                    show_dropdown=true
                />
            </div>

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

            <Show when=move || !loading.get() && results.with(|r| !r.is_empty())>
                <div class="results-summary">
                    <h5>
                        {move || {
                            let current = results.get();
                            let value = query
                                .get()
                                .map(|q| q.value)
                                .unwrap_or_default();
                            match current.num_results {
                                Some(total) if total as usize != current.total() => format!(
                                    "「{}」の検索結果 {}件 (全{}件)",
                                    value,
                                    current.total(),
                                    total
                                ),
                                _ => format!("「{}」の検索結果 {}件", value, current.total()),
                            }
                        }}
                    </h5>
                    <div class="results-controls">
                        <span class="badge">
                            {move || {
                                query
                                    .get()
                                    .map(|q| {
                                        format!(
                                            "{} - {}",
                                            q.field.as_str().to_uppercase(),
                                            q.match_type.as_str().replace('_', " ").to_uppercase()
                                        )
                                    })
                                    .unwrap_or_default()
                            }}
                        </span>
                        <select
                            class="group-select"
                            on:change=move |ev| {
                                set_group_mode
                                    .set(GroupMode::parse(&event_target_value(&ev)).unwrap_or_default());
                            }
                        >
                            <option value="flat" selected=move || group_mode.get() == GroupMode::Flat>
                                "グルーピングなし"
                            </option>
                            <option
                                value="part_number"
                                selected=move || group_mode.get() == GroupMode::ByPartNumber
                            >
                                "型番ごと"
                            </option>
                            <option
                                value="supplier"
                                selected=move || group_mode.get() == GroupMode::BySupplier
                            >
                                "サプライヤーごと"
                            </option>
                        </select>
                    </div>
                </div>
            </Show>

            {content}

            <SupplierModal record=modal_record on_close=move |_| set_modal_record.set(None) />
        </div>
    }
}

//! 検索バー(インクリメンタル検索)コンポーネント
//!
//! キー入力を300msデバウンスして候補を取得する。取得結果は
//! 世代カウンタで検査し、最後の入力に対応するレスポンスだけを
//! ドロップダウンへ反映する。

use std::sync::Arc;

use gloo::timers::callback::Timeout;
use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::{MatchType, RequestSequence, SearchField, SearchQuery, Suggestion};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::debounce::Debouncer;
use crate::storage;

/// デバウンス窓(最後のキー入力からの待ち時間)
const SUGGEST_DEBOUNCE_MS: u32 = 300;
/// フォーカス喪失からドロップダウンを閉じるまでの猶予
/// (候補のクリックを取りこぼさないため)
const BLUR_GRACE_MS: u32 = 200;
/// 既定値保存の完了表示を出す時間
const SAVE_FLASH_MS: u32 = 2000;

#[component]
pub fn SearchBar<F>(
    on_search: F,
    /// 結果画面から戻した初期値。Noneなら保存済み既定値を使う
    initial: Option<SearchQuery>,
    show_dropdown: bool,
) -> impl IntoView
where
    F: Fn(SearchQuery) + Clone + Send + Sync + 'static,
{
    let (saved_field, saved_match_type) = storage::saved_defaults();
    let (initial_field, initial_match_type, initial_value) = match &initial {
        Some(query) => (query.field, query.match_type, query.value.clone()),
        None => (saved_field, saved_match_type, String::new()),
    };

    let (value, set_value) = signal(initial_value);
    let (field, set_field) = signal(initial_field);
    let (match_type, set_match_type) = signal(initial_match_type);
    let (suggestions, set_suggestions) = signal(Vec::<Suggestion>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (show_results, set_show_results) = signal(false);
    let (is_focused, set_is_focused) = signal(false);
    let (save_success, set_save_success) = signal(false);

    let debouncer = Debouncer::new();
    let sequence = Arc::new(RequestSequence::new());

    let long_enough =
        move || value.get().chars().count() >= SearchQuery::MIN_QUERY_LEN;

    // キー入力・条件変更のたびに呼ぶ。条件を満たす間だけ
    // デバウンスタイマーを張り直す
    let queue_lookup = {
        let debouncer = debouncer.clone();
        let sequence = Arc::clone(&sequence);
        move || {
            if !show_dropdown {
                return;
            }
            if !long_enough() || !is_focused.get() {
                debouncer.cancel();
                set_suggestions.set(Vec::new());
                set_show_results.set(false);
                return;
            }
            let sequence = Arc::clone(&sequence);
            debouncer.schedule(SUGGEST_DEBOUNCE_MS, move || {
                let Ok(query) =
                    SearchQuery::new(field.get(), match_type.get(), value.get())
                else {
                    return;
                };
                let generation = sequence.begin();
                set_is_loading.set(true);
                set_show_results.set(true);
                spawn_local(async move {
                    let outcome = api::suggest(&query).await;
                    if !sequence.is_current(generation) {
                        // 新しい入力のリクエストが出ているので捨てる
                        return;
                    }
                    set_is_loading.set(false);
                    match outcome {
                        Ok(found) => {
                            set_show_results.set(!found.is_empty());
                            set_suggestions.set(found);
                        }
                        Err(error) => {
                            logging::error!("検索候補の取得に失敗しました: {}", error);
                            set_suggestions.set(Vec::new());
                            set_show_results.set(false);
                        }
                    }
                });
            });
        }
    };

    // フォーム送信。最低文字数未満なら何もしない
    let submit = {
        let debouncer = debouncer.clone();
        let on_search = on_search.clone();
        move || {
            let Ok(query) = SearchQuery::new(field.get(), match_type.get(), value.get())
            else {
                return;
            };
            debouncer.cancel();
            set_show_results.set(false);
            on_search(query);
        }
    };

    // 候補の確定: 値を取り込み、型番の完全一致検索へ
    let select_suggestion = {
        let debouncer = debouncer.clone();
        let on_search = on_search.clone();
        move |part_number: String| {
            set_value.set(part_number.clone());
            debouncer.cancel();
            set_show_results.set(false);
            if let Ok(query) = SearchQuery::exact_mpn(part_number) {
                on_search(query);
            }
        }
    };

    let save_defaults = move || {
        storage::save_defaults(field.get(), match_type.get());
        set_save_success.set(true);
        Timeout::new(SAVE_FLASH_MS, move || set_save_success.set(false)).forget();
    };

    view! {
        <div class="search-bar">
            <form on:submit={
                let submit = submit.clone();
                move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    submit();
                }
            }>
                <div class="search-controls">
                    <select
                        class="search-select"
                        on:change={
                            let queue_lookup = queue_lookup.clone();
                            move |ev| {
                                set_match_type.set(
                                    MatchType::parse(&event_target_value(&ev)).unwrap_or_default(),
                                );
                                queue_lookup();
                            }
                        }
                    >
                        <option
                            value="exact"
                            selected=move || match_type.get() == MatchType::Exact
                        >
                            "完全一致"
                        </option>
                        <option
                            value="begins_with"
                            selected=move || match_type.get() == MatchType::BeginsWith
                        >
                            "前方一致"
                        </option>
                    </select>

                    <select
                        class="search-select"
                        on:change={
                            let queue_lookup = queue_lookup.clone();
                            move |ev| {
                                set_field.set(
                                    SearchField::parse(&event_target_value(&ev)).unwrap_or_default(),
                                );
                                queue_lookup();
                            }
                        }
                    >
                        <option value="mpn" selected=move || field.get() == SearchField::Mpn>
                            "型番"
                        </option>
                        <option
                            value="manufacturer"
                            selected=move || field.get() == SearchField::Manufacturer
                        >
                            "メーカー"
                        </option>
                    </select>

                    <input
                        type="text"
                        class="search-input"
                        placeholder="型番またはメーカー名を入力..."
                        prop:value=move || value.get()
                        on:input={
                            let queue_lookup = queue_lookup.clone();
                            move |ev| {
                                set_value.set(event_target_value(&ev));
                                queue_lookup();
                            }
                        }
                        on:focus={
                            let queue_lookup = queue_lookup.clone();
                            move |_| {
                                set_is_focused.set(true);
                                queue_lookup();
                            }
                        }
                        on:blur=move |_| {
                            // ドロップダウン項目のクリックが先に届くよう、
                            // 少し待ってから閉じる
                            Timeout::new(BLUR_GRACE_MS, move || {
                                set_is_focused.set(false);
                                set_show_results.set(false);
                            })
                            .forget();
                        }
                    />

                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || !long_enough()
                    >
                        "検索"
                    </button>

                    <button
                        type="button"
                        class="btn btn-secondary"
                        title="現在の一致方法とフィールドを既定値として保存"
                        on:click=move |_| save_defaults()
                    >
                        {move || if save_success.get() { "保存しました" } else { "既定値を保存" }}
                    </button>
                </div>

                <Show when=move || {
                    let count = value.get().chars().count();
                    count > 0 && count < SearchQuery::MIN_QUERY_LEN
                }>
                    <small class="text-muted">
                        {format!("{}文字以上で検索できます", SearchQuery::MIN_QUERY_LEN)}
                    </small>
                </Show>
            </form>

            <Show when=move || {
                show_dropdown
                    && show_results.get()
                    && (is_loading.get() || !suggestions.get().is_empty())
            }>
                {
                    let select_suggestion = select_suggestion.clone();
                    view! {
                        <div class="suggest-dropdown">
                            <Show
                                when=move || !is_loading.get()
                                fallback=|| {
                                    view! { <div class="suggest-loading">"検索中..."</div> }
                                }
                            >
                                {
                                    let select_suggestion = select_suggestion.clone();
                                    view! {
                                        <For
                                    each={move || suggestions.get().into_iter().enumerate().collect::<Vec<_>>()}
                                    key=|(index, suggestion)| (*index, suggestion.part_number.clone())
                                    children={
                                        let select_suggestion = select_suggestion.clone();
                                        move |(_, suggestion): (usize, Suggestion)| {
                                            let select_suggestion = select_suggestion.clone();
                                            let part_number = suggestion.part_number.clone();
                                            view! {
                                                <button
                                                    type="button"
                                                    class="suggest-item"
                                                    on:click=move |_| select_suggestion(part_number.clone())
                                                >
                                                    <span class="suggest-part">
                                                        {suggestion.part_number.clone()}
                                                    </span>
                                                    <small class="text-muted">
                                                        {format!("{}件", suggestion.num_results)}
                                                    </small>
                                                </button>
                                            }
                                        }
                                    }
                                        />
                                    }
                                }
                            </Show>
                        </div>
                    }
                }
            </Show>
        </div>
    }
}

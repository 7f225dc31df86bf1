//! 検索結果テーブル
//!
//! ソート可能なヘッダ、未ログイン時のマスキング、価格ティアの
//! プレビュー/展開をまとめた表示専用コンポーネント。表示する
//! レコード列の導出(グルーピング・セクション分け)は呼び出し側が行う。

use leptos::prelude::*;
use parts_locator_common::{
    display, ResultRecord, SortDirection, SortKey, SortState, SubscriptionSet,
};

use crate::session::use_session;

fn sort_marker(state: SortState, key: SortKey) -> &'static str {
    match state.key {
        Some(active) if active == key => match state.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

#[component]
pub fn ResultsTable<FS, FT, FP>(
    records: Vec<ResultRecord>,
    sort: RwSignal<SortState>,
    on_sort: FS,
    subscriptions: ReadSignal<SubscriptionSet>,
    on_toggle_subscription: FT,
    on_supplier_click: FP,
) -> impl IntoView
where
    FS: Fn(SortKey) + Clone + Send + Sync + 'static,
    FT: Fn(String) + Clone + Send + Sync + 'static,
    FP: Fn(ResultRecord) + Clone + Send + Sync + 'static,
{
    let session = use_session();

    let header_cell = {
        move |key: SortKey, label: &'static str| {
            let on_sort = on_sort.clone();
            view! {
                <th class="sortable" on:click=move |_| on_sort(key)>
                    {label}
                    {move || sort_marker(sort.get(), key)}
                </th>
            }
        }
    };

    let rows = records
        .into_iter()
        .map(|record| {
            let (show_all_breaks, set_show_all_breaks) = signal(false);

            // 型番セル: リンクがあれば別タブで開く
            let part_cell = {
                let part_number = record.part_number.clone();
                let link = record.link.clone();
                let supplier_code = display::clean_field(&record.supplier_code)
                    .map(|code| format!("DISTI # {}", code));
                view! {
                    <td class="part-cell">
                        {if link.is_empty() {
                            view! { <strong>{part_number}</strong> }.into_any()
                        } else {
                            view! {
                                <a href=link target="_blank" rel="noopener noreferrer">
                                    <strong>{part_number}</strong>
                                </a>
                            }
                            .into_any()
                        }}
                        {supplier_code.map(|code| view! {
                            <small class="text-muted supplier-code">{code}</small>
                        })}
                    </td>
                }
            };

            let description_title = record.description.clone();
            let description = display::truncate_description(&record.description);

            let processed_at = record.processed_at.clone();
            let country = record.country.clone();

            // 価格セル: 有効ティアを3件までプレビューし、残りは展開で表示
            let price_cell = {
                let breaks = record.price_breaks.clone();
                move || {
                    if breaks.is_empty() {
                        return view! { <span class="text-muted">"-"</span> }.into_any();
                    }
                    let limit = if show_all_breaks.get() {
                        breaks.len()
                    } else {
                        display::PRICE_BREAK_PREVIEW
                    };
                    let tiers = breaks
                        .iter()
                        .take(limit)
                        .map(|tier| {
                            view! {
                                <div class="price-tier">
                                    <span class="tier-qty">{tier.qty.clone()}</span>
                                    <span class="tier-price">
                                        {display::format_price(tier.price)}
                                    </span>
                                </div>
                            }
                        })
                        .collect_view();
                    let hidden = breaks.len().saturating_sub(display::PRICE_BREAK_PREVIEW);
                    let more = (hidden > 0).then(|| {
                        view! {
                            <button
                                type="button"
                                class="link-button"
                                on:click=move |_| set_show_all_breaks.update(|v| *v = !*v)
                            >
                                {move || {
                                    if show_all_breaks.get() {
                                        "折りたたむ".to_string()
                                    } else {
                                        format!("残り{}件を表示", hidden)
                                    }
                                }}
                            </button>
                        }
                    });
                    view! { <div class="price-breaks">{tiers}{more}</div> }.into_any()
                }
            };

            // サプライヤーセル: ログイン時のみ詳細モーダルへのリンク
            let supplier_cell = {
                let record = record.clone();
                let on_supplier_click = on_supplier_click.clone();
                move || {
                    if session.signed_in() {
                        let label = display::field_or_dash(&record.supplier_name);
                        let record = record.clone();
                        let on_supplier_click = on_supplier_click.clone();
                        view! {
                            <button
                                type="button"
                                class="link-button"
                                on:click=move |_| on_supplier_click(record.clone())
                            >
                                {label}
                            </button>
                        }
                        .into_any()
                    } else {
                        view! {
                            <span class="text-muted">{display::MASKED_SUPPLIER}</span>
                        }
                        .into_any()
                    }
                }
            };

            let region_tag = record
                .region
                .map(|region| view! { <small class="region-tag">{region.as_str()}</small> });

            let subscription_cell = {
                let part_number = record.part_number.clone();
                let on_toggle_subscription = on_toggle_subscription.clone();
                let label_part = part_number.clone();
                view! {
                    <Show when=move || session.signed_in()>
                        <td class="subscribe-cell">
                            <button
                                type="button"
                                class="btn btn-secondary btn-small"
                                on:click={
                                    let part_number = part_number.clone();
                                    let on_toggle_subscription = on_toggle_subscription.clone();
                                    move |_| on_toggle_subscription(part_number.clone())
                                }
                            >
                                {
                                    let label_part = label_part.clone();
                                    move || {
                                        if subscriptions.get().contains(&label_part) {
                                            "購読解除"
                                        } else {
                                            "購読"
                                        }
                                    }
                                }
                            </button>
                        </td>
                    </Show>
                }
            };

            view! {
                <tr class="result-row">
                    {part_cell}
                    <td>{display::field_or_dash(&record.mfr)}</td>
                    <td>{display::field_or_dash(&record.dc)}</td>
                    <td title=description_title>
                        <small class="text-muted">{description}</small>
                    </td>
                    <td>
                        {
                            let processed_at = processed_at.clone();
                            move || display::processed_at_display(&processed_at, session.signed_in())
                        }
                    </td>
                    <td>
                        {
                            let country = country.clone();
                            move || display::country_display(&country, session.signed_in())
                        }
                    </td>
                    <td class="qty-cell">{display::field_or_dash(&record.qty)}</td>
                    <td>{price_cell}</td>
                    <td>
                        {supplier_cell}
                        {region_tag}
                    </td>
                    {subscription_cell}
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="results-table-wrap">
            <table class="results-table">
                <thead>
                    <tr>
                        {header_cell(SortKey::PartNumber, "型番")}
                        {header_cell(SortKey::Manufacturer, "メーカー")}
                        {header_cell(SortKey::DateCode, "デートコード")}
                        <th>"説明"</th>
                        <th>"取込日"</th>
                        {header_cell(SortKey::Country, "国")}
                        {header_cell(SortKey::Quantity, "数量")}
                        <th>"価格"</th>
                        {header_cell(SortKey::Supplier, "サプライヤー")}
                        <Show when=move || session.signed_in()>
                            <th>"購読"</th>
                        </Show>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
}

//! サプライヤー詳細モーダル
//!
//! 結果行のサプライヤー名クリックで開き、詳細APIを引いて表示する。
//! ログイン中しか開けないので、ここではマスキングしない。

use std::sync::Arc;

use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::{display, RequestSequence, ResultRecord};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, SupplierInfo};

#[component]
pub fn SupplierModal<F>(record: ReadSignal<Option<ResultRecord>>, on_close: F) -> impl IntoView
where
    F: Fn(()) + Clone + Send + Sync + 'static,
{
    let (info, set_info) = signal(None::<SupplierInfo>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let sequence = Arc::new(RequestSequence::new());

    // 対象レコードが変わるたびに詳細を取得し直す
    Effect::new({
        let sequence = Arc::clone(&sequence);
        move |_| {
            let Some(target) = record.get() else {
                set_info.set(None);
                return;
            };
            let generation = sequence.begin();
            set_loading.set(true);
            set_error.set(None);
            set_info.set(None);
            let sequence = Arc::clone(&sequence);
            spawn_local(async move {
                let outcome = api::supplier_details(&target.supplier_id).await;
                if !sequence.is_current(generation) {
                    return;
                }
                set_loading.set(false);
                match outcome {
                    Ok(found) => set_info.set(Some(found)),
                    Err(error) => {
                        logging::error!("サプライヤー詳細の取得に失敗しました: {}", error);
                        set_error.set(Some(
                            "サプライヤー詳細を取得できませんでした".to_string(),
                        ));
                    }
                }
            });
        }
    });

    let close_backdrop = {
        let on_close = on_close.clone();
        move |_| on_close(())
    };
    let close_button = {
        let on_close = on_close.clone();
        move |_| on_close(())
    };

    view! {
        <Show when=move || record.get().is_some()>
            <div class="modal-backdrop" on:click=close_backdrop.clone()></div>
            <div class="modal">
                <div class="modal-header">
                    <h2>"サプライヤー情報"</h2>
                    <button type="button" class="link-button" on:click=close_button.clone()>
                        "閉じる"
                    </button>
                </div>
                <div class="modal-body">
                    <Show when=move || loading.get()>
                        <p>"読込中..."</p>
                    </Show>

                    {move || {
                        error
                            .get()
                            .map(|message| view! { <div class="alert alert-danger">{message}</div> })
                    }}

                    {move || {
                        let Some(info) = info.get() else {
                            return ().into_any();
                        };
                        let selected = record.get();
                        let email_link = selected.as_ref().and_then(|item| {
                            display::clean_field(&info.contact_email).map(|email| {
                                let subject = js_sys::encode_uri_component(&format!(
                                    "Inquiry About {}",
                                    item.part_number
                                ));
                                (
                                    email.to_string(),
                                    format!("mailto:{}?subject={}", email, String::from(subject)),
                                )
                            })
                        });
                        view! {
                            <div class="supplier-info">
                                <h3>{info.company_name.clone()}</h3>
                                {display::clean_field(&info.description).map(|description| {
                                    view! { <p class="text-muted">{description.to_string()}</p> }
                                })}

                                {selected.map(|item| {
                                    view! {
                                        <div class="selected-part">
                                            <h4>"対象の部品"</h4>
                                            <table class="mini-table">
                                                <thead>
                                                    <tr>
                                                        <th>"型番"</th>
                                                        <th>"メーカー"</th>
                                                        <th>"デートコード"</th>
                                                        <th>"数量"</th>
                                                        <th>"国"</th>
                                                        <th>"取込日"</th>
                                                    </tr>
                                                </thead>
                                                <tbody>
                                                    <tr>
                                                        <td>
                                                            <strong>{item.part_number.clone()}</strong>
                                                        </td>
                                                        <td>{display::field_or_dash(&item.mfr)}</td>
                                                        <td>{display::field_or_dash(&item.dc)}</td>
                                                        <td>{display::field_or_dash(&item.qty)}</td>
                                                        <td>{display::field_or_dash(&item.country)}</td>
                                                        <td>
                                                            {display::processed_at_display(
                                                                &item.processed_at,
                                                                true,
                                                            )}
                                                        </td>
                                                    </tr>
                                                </tbody>
                                            </table>
                                        </div>
                                    }
                                })}

                                <div class="contact-info">
                                    <h4>"連絡先"</h4>
                                    {display::clean_field(&info.address).map(|address| {
                                        view! {
                                            <p>
                                                <strong>"住所: "</strong>
                                                {address.to_string()}
                                            </p>
                                        }
                                    })}
                                    {display::clean_field(&info.phone_number).map(|phone| {
                                        let href = format!("tel:{}", phone);
                                        view! {
                                            <p>
                                                <strong>"電話: "</strong>
                                                <a href=href>{phone.to_string()}</a>
                                            </p>
                                        }
                                    })}
                                    {display::clean_field(&info.website).map(|website| {
                                        let href = website.to_string();
                                        view! {
                                            <p>
                                                <strong>"Web: "</strong>
                                                <a
                                                    href=href
                                                    target="_blank"
                                                    rel="noopener noreferrer"
                                                >
                                                    {website.to_string()}
                                                </a>
                                            </p>
                                        }
                                    })}
                                    {email_link.map(|(email, href)| {
                                        view! {
                                            <p>
                                                <strong>"メール: "</strong>
                                                <a href=href>{email}</a>
                                            </p>
                                        }
                                    })}
                                </div>
                            </div>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        </Show>
    }
}

//! 価格データアップロードフォーム
//!
//! 2段階アップロード: 事前署名URLを発行してもらい、選択された
//! CSVファイルをそのURLへ直接PUTする。

use leptos::html;
use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::is_valid_email;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, PricingUploadForm};

#[component]
pub fn UploadPricing() -> impl IntoView {
    let (email_address, set_email_address) = signal(String::new());
    let (mpn_field, set_mpn_field) = signal(String::new());
    let (mfr_field, set_mfr_field) = signal(String::new());
    let (quantity_field, set_quantity_field) = signal(String::new());
    // ファイル実体はinput要素が持つ。表示用のラベルだけ状態に置く
    let (file_label, set_file_label) = signal(None::<String>);
    let file_input = NodeRef::<html::Input>::new();

    let (uploading, set_uploading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (success, set_success) = signal(None::<String>);

    let on_file_change = move |_| {
        set_error.set(None);
        let Some(input) = file_input.get() else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        match file {
            Some(file) if file.type_() == api::CSV_CONTENT_TYPE => {
                let size_kb = file.size() / 1024.0;
                set_file_label.set(Some(format!("{} ({:.2} KB)", file.name(), size_kb)));
            }
            Some(_) => {
                set_error.set(Some(
                    "CSVファイル(.csv)を選択してください。".to_string(),
                ));
                input.set_value("");
                set_file_label.set(None);
            }
            None => set_file_label.set(None),
        }
    };

    let submit = move || {
        set_error.set(None);
        set_success.set(None);

        // ネットワークに出る前の入力検査
        let email = email_address.get();
        if email.trim().is_empty() {
            set_error.set(Some("メールアドレスは必須です。".to_string()));
            return;
        }
        if !is_valid_email(email.trim()) {
            set_error.set(Some(
                "メールアドレスの形式が正しくありません。".to_string(),
            ));
            return;
        }
        let Some(file) = file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            set_error.set(Some(
                "アップロードするCSVファイルを選択してください。".to_string(),
            ));
            return;
        };

        let form = PricingUploadForm {
            email_address: email,
            mpn_field: mpn_field.get(),
            mfr_field: mfr_field.get(),
            quantity_requested_field: quantity_field.get(),
        };

        set_uploading.set(true);
        spawn_local(async move {
            // 1段目: 事前署名URLの発行、2段目: ファイル直PUT
            let outcome = match api::pricing_presigned_url(&form).await {
                Ok(presigned_url) => api::upload_pricing_file(&presigned_url, &file).await,
                Err(error) => Err(error),
            };
            set_uploading.set(false);
            match outcome {
                Ok(()) => {
                    set_success.set(Some(
                        "アップロードしました。処理が完了するとメールで通知されます。"
                            .to_string(),
                    ));
                    set_email_address.set(String::new());
                    set_mpn_field.set(String::new());
                    set_mfr_field.set(String::new());
                    set_quantity_field.set(String::new());
                    set_file_label.set(None);
                    if let Some(input) = file_input.get_untracked() {
                        input.set_value("");
                    }
                }
                Err(error) => {
                    logging::error!("価格データのアップロードに失敗しました: {}", error);
                    set_error.set(Some(format!(
                        "アップロードに失敗しました: {}",
                        error
                    )));
                }
            }
        });
    };

    let hint_field = move |id: &'static str,
                          label: &'static str,
                          placeholder: &'static str,
                          value: ReadSignal<String>,
                          set_value: WriteSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type="text"
                    id=id
                    placeholder=placeholder
                    prop:value=move || value.get()
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                    disabled=move || uploading.get()
                />
            </div>
        }
    };

    view! {
        <div class="upload-pricing card">
            <h2>"価格データアップロード"</h2>

            <form on:submit=move |ev| {
                ev.prevent_default();
                submit();
            }>
                <div class="form-group">
                    <label for="upload-email">"メールアドレス *"</label>
                    <input
                        type="email"
                        id="upload-email"
                        placeholder="通知を受け取るメールアドレス"
                        prop:value=move || email_address.get()
                        on:input=move |ev| {
                            set_email_address.set(event_target_value(&ev));
                            set_error.set(None);
                        }
                        disabled=move || uploading.get()
                    />
                    <small class="text-muted">
                        "処理完了の通知とダウンロード案内をこのアドレスに送ります"
                    </small>
                </div>

                <h5>"列名マッピング (任意)"</h5>
                <p class="text-muted">
                    "CSVの列名が標準名と異なる場合だけ入力してください。"
                </p>
                {hint_field("mpn-field", "型番の列名", "例: part_number", mpn_field, set_mpn_field)}
                {hint_field("mfr-field", "メーカーの列名", "例: manufacturer_name", mfr_field, set_mfr_field)}
                {hint_field(
                    "quantity-field",
                    "希望数量の列名",
                    "例: qty_requested",
                    quantity_field,
                    set_quantity_field,
                )}

                <div class="form-group">
                    <label for="csv-file">"CSVファイル *"</label>
                    <input
                        type="file"
                        id="csv-file"
                        accept=".csv"
                        node_ref=file_input
                        on:change=on_file_change
                        disabled=move || uploading.get()
                    />
                    {move || {
                        file_label
                            .get()
                            .map(|label| {
                                view! {
                                    <small class="text-success">{format!("選択中: {}", label)}</small>
                                }
                            })
                    }}
                </div>

                {move || {
                    error
                        .get()
                        .map(|message| view! { <div class="alert alert-danger">{message}</div> })
                }}
                {move || {
                    success
                        .get()
                        .map(|message| view! { <div class="alert alert-success">{message}</div> })
                }}

                <button type="submit" class="btn btn-primary" disabled=move || uploading.get()>
                    {move || if uploading.get() { "アップロード中..." } else { "アップロードする" }}
                </button>
            </form>

            <div class="upload-notes">
                <h5>"CSVファイルの要件"</h5>
                <ul class="text-muted">
                    <li>"拡張子は.csv"</li>
                    <li>"1行目は列ヘッダ"</li>
                    <li>"型番・メーカー・数量の列を含めてください"</li>
                </ul>
            </div>
        </div>
    }
}

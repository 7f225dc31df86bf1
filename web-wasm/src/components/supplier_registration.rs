//! サプライヤー登録フォーム
//!
//! 会社情報と列名マッピングを入力して登録する。空欄のフィールドは
//! 送信ペイロードから落とす(API層が共通で処理)。

use leptos::logging;
use leptos::prelude::*;
use parts_locator_common::is_valid_email;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, SupplierForm};

/// 標準フィールド名(ワイヤ上のマッピングキー)と表示ラベル
const MAPPING_FIELDS: [(&str, &str); 6] = [
    ("Part Number", "型番"),
    ("Manufacturer", "メーカー"),
    ("Datecode", "デートコード"),
    ("Description", "説明"),
    ("Quantity", "数量"),
    ("Country Code", "国コード"),
];

#[component]
pub fn SupplierRegistration() -> impl IntoView {
    let (company_name, set_company_name) = signal(String::new());
    let (contact_email, set_contact_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (phone_number, set_phone_number) = signal(String::new());
    let (website, set_website) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (country, set_country) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (email_for_upload, set_email_for_upload) = signal(String::new());
    let mappings = RwSignal::new(vec![String::new(); MAPPING_FIELDS.len()]);

    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (success, set_success) = signal(false);

    let reset_form = move || {
        set_company_name.set(String::new());
        set_contact_email.set(String::new());
        set_password.set(String::new());
        set_phone_number.set(String::new());
        set_website.set(String::new());
        set_address.set(String::new());
        set_country.set(String::new());
        set_description.set(String::new());
        set_email_for_upload.set(String::new());
        mappings.set(vec![String::new(); MAPPING_FIELDS.len()]);
    };

    let submit = move || {
        set_error.set(None);
        set_success.set(false);

        // 必須フィールドとメール形式はネットワークに出る前に検査する
        if company_name.get().trim().is_empty() || contact_email.get().trim().is_empty() {
            set_error.set(Some(
                "会社名と連絡先メールアドレスは必須です。".to_string(),
            ));
            return;
        }
        if !is_valid_email(contact_email.get().trim()) {
            set_error.set(Some(
                "連絡先メールアドレスの形式が正しくありません。".to_string(),
            ));
            return;
        }

        let form = SupplierForm {
            company_name: company_name.get(),
            contact_email: contact_email.get(),
            password: password.get(),
            phone_number: phone_number.get(),
            address: address.get(),
            country: country.get(),
            description: description.get(),
            website: website.get(),
            email_for_upload: email_for_upload.get(),
            field_mappings: MAPPING_FIELDS
                .iter()
                .zip(mappings.get())
                .map(|((key, _), column)| (key.to_string(), column))
                .collect(),
            ..SupplierForm::default()
        };

        set_submitting.set(true);
        spawn_local(async move {
            let outcome = api::create_supplier(&form).await;
            set_submitting.set(false);
            match outcome {
                Ok(()) => {
                    set_success.set(true);
                    reset_form();
                }
                Err(error) => {
                    logging::error!("サプライヤー登録に失敗しました: {}", error);
                    set_error.set(Some(format!(
                        "サプライヤー登録に失敗しました: {}",
                        error
                    )));
                }
            }
        });
    };

    let text_field = move |id: &'static str,
                          label: &'static str,
                          value: ReadSignal<String>,
                          set_value: WriteSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type="text"
                    id=id
                    prop:value=move || value.get()
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                />
            </div>
        }
    };

    view! {
        <div class="supplier-registration card">
            <h2>"サプライヤー登録"</h2>
            <p class="text-muted">
                "会社情報と在庫ファイルの列名マッピングを登録してください。"
            </p>

            {move || {
                error
                    .get()
                    .map(|message| view! { <div class="alert alert-danger">{message}</div> })
            }}
            <Show when=move || success.get()>
                <div class="alert alert-success">"サプライヤーを登録しました。"</div>
            </Show>

            <form on:submit=move |ev| {
                ev.prevent_default();
                submit();
            }>
                {text_field("company-name", "会社名 *", company_name, set_company_name)}
                {text_field("contact-email", "連絡先メールアドレス *", contact_email, set_contact_email)}

                <div class="form-group">
                    <label for="supplier-password">"パスワード"</label>
                    <input
                        type="password"
                        id="supplier-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>

                {text_field("phone-number", "電話番号", phone_number, set_phone_number)}
                {text_field("website", "Webサイト", website, set_website)}
                {text_field("address", "住所", address, set_address)}
                {text_field("country", "国", country, set_country)}

                <div class="form-group">
                    <label for="supplier-description">"会社紹介"</label>
                    <textarea
                        id="supplier-description"
                        rows="3"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    ></textarea>
                </div>

                {text_field(
                    "email-for-upload",
                    "アップロード用メールアドレス(別の場合)",
                    email_for_upload,
                    set_email_for_upload,
                )}

                <hr />
                <h5>"列名マッピング"</h5>
                <p class="text-muted">
                    "在庫ファイルの列名が標準名と異なる場合に入力してください。空欄なら標準名をそのまま使います。"
                </p>

                {MAPPING_FIELDS
                    .iter()
                    .enumerate()
                    .map(|(index, (key, label))| {
                        let input_id = format!("map-{}", index);
                        let placeholder = format!("「{}」に対応する列名 (任意)", label);
                        view! {
                            <div class="form-group">
                                <label for=input_id.clone()>{format!("{} ({})", label, key)}</label>
                                <input
                                    type="text"
                                    id=input_id
                                    placeholder=placeholder
                                    prop:value=move || {
                                        mappings.with(|values| values[index].clone())
                                    }
                                    on:input=move |ev| {
                                        mappings.update(|values| {
                                            values[index] = event_target_value(&ev);
                                        })
                                    }
                                />
                            </div>
                        }
                    })
                    .collect_view()}

                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "送信中..." } else { "登録する" }}
                </button>
            </form>
        </div>
    }
}

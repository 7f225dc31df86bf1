//! ログイン / ユーザー登録パネル

use leptos::prelude::*;
use parts_locator_common::is_valid_email;
use wasm_bindgen_futures::spawn_local;

use crate::app::Page;
use crate::session::use_session;

#[component]
pub fn LoginPanel(set_page: WriteSignal<Page>) -> impl IntoView {
    let session = use_session();
    let (register_mode, set_register_mode) = signal(false);

    // ログインフォーム
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());

    // 登録フォーム
    let (email, set_email) = signal(String::new());
    let (register_password, set_register_password) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());

    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (notice, set_notice) = signal(None::<String>);

    let submit_login = move || {
        let username_value = username.get();
        let password_value = password.get();
        if username_value.trim().is_empty() || password_value.is_empty() {
            set_error.set(Some(
                "ユーザー名とパスワードを入力してください".to_string(),
            ));
            return;
        }
        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            let outcome = session.login(username_value.trim(), &password_value).await;
            set_submitting.set(false);
            match outcome {
                Ok(()) => set_page.set(Page::Locator),
                Err(error) => {
                    set_error.set(Some(format!("ログインに失敗しました: {}", error)));
                }
            }
        });
    };

    let submit_register = move || {
        let email_value = email.get();
        let password_value = register_password.get();
        if !is_valid_email(email_value.trim()) {
            set_error.set(Some(
                "メールアドレスの形式が正しくありません".to_string(),
            ));
            return;
        }
        if password_value.is_empty() {
            set_error.set(Some("パスワードを入力してください".to_string()));
            return;
        }
        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            let outcome = session
                .register(
                    email_value.trim(),
                    &password_value,
                    first_name.get_untracked().trim(),
                    last_name.get_untracked().trim(),
                )
                .await;
            set_submitting.set(false);
            match outcome {
                Ok(()) => {
                    set_notice.set(Some(
                        "登録しました。ログインしてください。".to_string(),
                    ));
                    set_register_mode.set(false);
                }
                Err(error) => {
                    set_error.set(Some(format!("登録に失敗しました: {}", error)));
                }
            }
        });
    };

    view! {
        <div class="login-panel card">
            <div class="tab-row">
                <button
                    type="button"
                    class="tab"
                    class:active=move || !register_mode.get()
                    on:click=move |_| {
                        set_register_mode.set(false);
                        set_error.set(None);
                    }
                >
                    "ログイン"
                </button>
                <button
                    type="button"
                    class="tab"
                    class:active=move || register_mode.get()
                    on:click=move |_| {
                        set_register_mode.set(true);
                        set_error.set(None);
                        set_notice.set(None);
                    }
                >
                    "新規登録"
                </button>
            </div>

            {move || {
                error
                    .get()
                    .map(|message| view! { <div class="alert alert-danger">{message}</div> })
            }}
            {move || {
                notice
                    .get()
                    .map(|message| view! { <div class="alert alert-success">{message}</div> })
            }}

            <Show
                when=move || !register_mode.get()
                fallback=move || {
                    view! {
                        <form on:submit=move |ev| {
                            ev.prevent_default();
                            submit_register();
                        }>
                            <div class="form-group">
                                <label for="register-email">"メールアドレス *"</label>
                                <input
                                    type="email"
                                    id="register-email"
                                    prop:value=move || email.get()
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="form-group">
                                <label for="register-password">"パスワード *"</label>
                                <input
                                    type="password"
                                    id="register-password"
                                    prop:value=move || register_password.get()
                                    on:input=move |ev| {
                                        set_register_password.set(event_target_value(&ev))
                                    }
                                />
                            </div>
                            <div class="form-group">
                                <label for="register-first-name">"名"</label>
                                <input
                                    type="text"
                                    id="register-first-name"
                                    prop:value=move || first_name.get()
                                    on:input=move |ev| set_first_name.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="form-group">
                                <label for="register-last-name">"姓"</label>
                                <input
                                    type="text"
                                    id="register-last-name"
                                    prop:value=move || last_name.get()
                                    on:input=move |ev| set_last_name.set(event_target_value(&ev))
                                />
                            </div>
                            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                                {move || if submitting.get() { "送信中..." } else { "登録する" }}
                            </button>
                        </form>
                    }
                }
            >
                <form on:submit=move |ev| {
                    ev.prevent_default();
                    submit_login();
                }>
                    <div class="form-group">
                        <label for="login-username">"ユーザー名"</label>
                        <input
                            type="text"
                            id="login-username"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="login-password">"パスワード"</label>
                        <input
                            type="password"
                            id="login-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "送信中..." } else { "ログイン" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}

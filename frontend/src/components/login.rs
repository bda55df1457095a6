use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::icons::Footprints;
use crate::config::{self, AuthMode};
use crate::session::use_gateway;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let gateway = use_gateway();

    let dev_mode = config::auth_mode() == AuthMode::DevTag;
    let (email, set_email) = signal(if dev_mode {
        config::dev_default_email().to_string()
    } else {
        String::new()
    });
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 已登录用户的跳转由路由服务监听认证信号自动完成

    let is_loading = move || auth.state.with(|s| s.is_loading);

    // Callback 是 Copy 的，嵌套的视图闭包可以随意捕获而保持 Fn
    let on_submit = Callback::new(move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() {
            set_error_msg.set(Some("Please enter your email".to_string()));
            return;
        }
        if !dev_mode && password.get().is_empty() {
            set_error_msg.set(Some("Please enter your password".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        let gateway = gateway.clone();
        spawn_local(async move {
            if let Err(message) = login(auth, api, gateway, email.get(), password.get()).await {
                set_error_msg.set(Some(message));
            } else {
                crate::analytics::event("login", None);
            }
            set_is_submitting.set(false);
        });
    });

    view! {
        <Show
            when=move || !is_loading()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <div class="flex flex-col items-center gap-2">
                            <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                <Footprints attr:class="h-8 w-8" />
                            </div>
                            <h1 class="text-3xl font-bold">"StepSquad"</h1>
                            <p class="text-base-content/70">
                                "Sign in to join your team's step challenge"
                            </p>
                        </div>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=move |ev| on_submit.run(ev)>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@example.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>

                            <Show when=move || !dev_mode>
                                <div class="form-control">
                                    <label class="label" for="password">
                                        <span class="label-text">"Password"</span>
                                    </label>
                                    <input
                                        id="password"
                                        type="password"
                                        placeholder="••••••••"
                                        on:input=move |ev| set_password.set(event_target_value(&ev))
                                        prop:value=password
                                        class="input input-bordered"
                                    />
                                    <label class="label">
                                        <span class="label-text-alt text-base-content/50">
                                            "New here? Signing in creates your account."
                                        </span>
                                    </label>
                                </div>
                            </Show>

                            <Show when=move || dev_mode>
                                <p class="text-xs text-base-content/50">
                                    "Development mode: no password required."
                                </p>
                            </Show>

                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                    } else {
                                        "Sign in".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}

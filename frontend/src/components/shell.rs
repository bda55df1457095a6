//! 页面骨架组件
//!
//! 顶部导航栏加全局 toast。所有受保护页面都包在 `AppShell` 里。

use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::cache::use_cache;
use crate::components::icons::*;
use crate::session::use_gateway;
use crate::web::router::use_router;
use crate::web::timer::Timeout;

/// toast 自动消失的延迟
const TOAST_DISMISS_MS: u32 = 3_000;

/// 全局通知：消息内容与是否出错
#[derive(Clone, Copy)]
pub struct Notify(pub RwSignal<Option<(String, bool)>>);

impl Notify {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn success(&self, message: impl Into<String>) {
        self.0.set(Some((message.into(), false)));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.0.set(Some((message.into(), true)));
    }
}

pub fn use_notify() -> Notify {
    use_context::<Notify>().expect("Notify should be provided")
}

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let gateway = use_gateway();
    let cache = use_cache();
    let router = use_router();
    let notify = use_notify();
    let notification = notify.0;

    let is_admin = auth.is_admin_signal();
    let user_email = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.email.clone()))
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        logout(auth, &gateway, &cache);
    };

    // 3 秒后清除通知。计时器随替换 drop 并取消，旧 toast 的
    // 计时器不会误清新 toast
    let dismiss_timer = StoredValue::new_local(Option::<Timeout>::None);
    Effect::new(move |_| {
        if notification.get().is_some() {
            dismiss_timer.set_value(Timeout::new(TOAST_DISMISS_MS, move || {
                notification.set(None);
            }));
        } else {
            dismiss_timer.set_value(None);
        }
    });

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            // 通知提示框
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let is_err = notification.get().map(|(_, e)| e).unwrap_or(false);
                        if is_err {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().map(|(msg, _)| msg)}</span>
                    </div>
                </div>
            </Show>

            <div class="navbar bg-base-100 shadow-lg px-4">
                <div class="flex-1 gap-2">
                    <a
                        class="btn btn-ghost text-xl gap-2"
                        on:click=move |_| router.navigate("/")
                    >
                        <Footprints attr:class="h-6 w-6 text-primary" />
                        "StepSquad"
                    </a>
                    <Show when=move || is_admin.get()>
                        <button
                            class="btn btn-primary btn-sm gap-2 hidden md:inline-flex"
                            on:click=move |_| router.navigate("/competitions/new")
                        >
                            <Plus attr:class="h-4 w-4" /> "New Competition"
                        </button>
                    </Show>
                </div>
                <div class="flex-none gap-2">
                    <button
                        class="btn btn-ghost btn-sm gap-2"
                        on:click=move |_| router.navigate("/devices")
                    >
                        <Watch attr:class="h-4 w-4" /> "Devices"
                    </button>
                    <span class="badge badge-neutral hidden md:inline-flex">{user_email}</span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Sign out"
                    </button>
                </div>
            </div>

            <div class="max-w-7xl mx-auto p-4 md:p-8">{children()}</div>
        </div>
    }
}

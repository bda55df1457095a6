//! 权限不足提示页
//!
//! 第二道门禁：已登录但角色不足时渲染，不做静默重定向，
//! 让用户明白发生了什么。

use leptos::prelude::*;

use crate::components::icons::ShieldAlert;
use crate::web::router::use_router;

#[component]
pub fn AccessDenied() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex items-center justify-center py-24">
            <div class="text-center space-y-4">
                <div class="flex justify-center">
                    <div class="p-4 bg-error/10 rounded-2xl text-error">
                        <ShieldAlert attr:class="h-10 w-10" />
                    </div>
                </div>
                <h1 class="text-2xl font-bold">"Access denied"</h1>
                <p class="text-base-content/70">
                    "This page requires an administrator account."
                </p>
                <button class="btn btn-primary" on:click=move |_| router.navigate("/")>
                    "Back to competitions"
                </button>
            </div>
        </div>
    }
}

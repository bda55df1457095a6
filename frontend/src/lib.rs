//! StepSquad 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话门面（凭证与请求头）
//! - `api`: 后端 API 客户端（错误契约与缓存配合）
//! - `components`: UI 组件层
//!
//! 应用级单例（认证、API 客户端、查询缓存、通知）都在 `App` 中
//! 创建并通过 Context 下发，组件只消费不构造。

mod analytics;
mod api;
mod auth;
mod cache;
mod components {
    pub mod access_denied;
    pub mod competition_detail;
    pub mod competition_form;
    pub mod devices;
    pub mod home;
    pub mod icons;
    pub mod login;
    pub mod oauth_callback;
    pub mod shell;
}
mod config;
mod error;
mod provider;
mod session;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web;

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::StepSquadApi;
use crate::auth::AuthContext;
use crate::cache::QueryCache;
use crate::components::competition_detail::CompetitionDetailPage;
use crate::components::competition_form::CompetitionFormPage;
use crate::components::devices::DevicesPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::oauth_callback::OauthCallbackPage;
use crate::components::shell::{AppShell, Notify};
use crate::config::AuthMode;
use crate::provider::RestIdentityProvider;
use crate::session::{BrowserStore, SessionGateway};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。除登录页与 OAuth 回调页
/// 外都包在应用外壳里。
fn route_matcher(route: AppRoute) -> AnyView {
    crate::analytics::page_view(&route.to_path());

    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Home => view! {
            <AppShell>
                <HomePage />
            </AppShell>
        }
        .into_any(),
        AppRoute::CompetitionNew => view! {
            <AppShell>
                <CompetitionFormPage />
            </AppShell>
        }
        .into_any(),
        AppRoute::CompetitionEdit(comp_id) => view! {
            <AppShell>
                <CompetitionFormPage comp_id=comp_id />
            </AppShell>
        }
        .into_any(),
        AppRoute::CompetitionDetail(comp_id) => view! {
            <AppShell>
                <CompetitionDetailPage comp_id=comp_id />
            </AppShell>
        }
        .into_any(),
        AppRoute::Devices => view! {
            <AppShell>
                <DevicesPage />
            </AppShell>
        }
        .into_any(),
        AppRoute::OauthCallback(provider, params) => view! {
            <OauthCallbackPage provider=provider params=params />
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文与应用级单例
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(Notify::new());
    provide_context(QueryCache::new());

    // 2. 按配置选择会话模式：开发标签 or 托管身份提供方
    let gateway: Arc<SessionGateway> = match config::auth_mode() {
        AuthMode::DevTag => Arc::new(SessionGateway::new_dev(Arc::new(BrowserStore))),
        AuthMode::Provider => {
            // auth_mode 已保证 key 存在
            let key = config::identity_api_key().unwrap_or_default();
            Arc::new(SessionGateway::new_with_provider(
                Arc::new(RestIdentityProvider::new(key)),
                Arc::new(BrowserStore),
            ))
        }
    };
    provide_context(gateway.clone());

    // 3. API 客户端：会话失效时回调认证上下文，触发守卫重定向
    let api = StepSquadApi::new(
        config::api_base_url(),
        gateway.clone(),
        Arc::new(move || auth_ctx.on_session_invalidated()),
    );
    provide_context(api.clone());

    // 4. 恢复会话：完成前 auth_ready 为假，守卫不做任何跳转
    spawn_local(crate::auth::check_session(auth_ctx, api, gateway));

    let is_authenticated = auth_ctx.is_authenticated_signal();
    let auth_ready = auth_ctx.auth_ready_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated auth_ready=auth_ready>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

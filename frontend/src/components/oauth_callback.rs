//! OAuth 回调落地页
//!
//! 提供方授权完成后重定向到这里，把查询参数原样转交后端换取
//! 令牌。交换只发起一次，成功后引导回设备页。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::OauthCallbackRequest;

use crate::api::use_api;
use crate::cache::use_cache;
use crate::components::icons::Watch;
use crate::web::route::OauthParams;
use crate::web::router::use_router;

#[derive(Clone, PartialEq)]
enum Exchange {
    Pending,
    Done(String),
    Failed(String),
}

#[component]
pub fn OauthCallbackPage(provider: String, params: OauthParams) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let router = use_router();

    let display_name = provider.clone();
    let (exchange, set_exchange) = signal(Exchange::Pending);

    if params.is_empty() {
        set_exchange.set(Exchange::Failed(
            "The provider did not return any authorization parameters.".to_string(),
        ));
    } else {
        let api = api.clone();
        let cache = cache.clone();
        let provider = provider.clone();
        spawn_local(async move {
            let req = OauthCallbackRequest {
                code: params.code,
                state: params.state,
                oauth_token: params.oauth_token,
                oauth_verifier: params.oauth_verifier,
            };
            match api.device_oauth_callback(&provider, &req).await {
                Ok(response) => {
                    crate::analytics::event("device_connected", None);
                    cache.invalidate("devices");
                    set_exchange.set(Exchange::Done(
                        response
                            .message
                            .unwrap_or_else(|| "Device connected.".to_string()),
                    ));
                }
                Err(e) => set_exchange.set(Exchange::Failed(e.user_message())),
            }
        });
    }

    view! {
        <div class="flex items-center justify-center py-24">
            <div class="card bg-base-100 shadow-xl w-full max-w-md">
                <div class="card-body text-center space-y-4">
                    <div class="flex justify-center">
                        <div class="p-4 bg-primary/10 rounded-2xl text-primary">
                            <Watch attr:class="h-10 w-10" />
                        </div>
                    </div>
                    <h1 class="text-xl font-bold">
                        {format!("Connecting {}", display_name)}
                    </h1>
                    {move || match exchange.get() {
                        Exchange::Pending => view! {
                            <div>
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                                <p class="text-base-content/70 mt-2">"Finishing authorization..."</p>
                            </div>
                        }
                        .into_any(),
                        Exchange::Done(message) => view! {
                            <div class="space-y-4">
                                <div class="alert alert-success text-sm py-2">
                                    <span>{message}</span>
                                </div>
                                <button class="btn btn-primary" on:click=move |_| router.replace("/devices")>
                                    "Go to devices"
                                </button>
                            </div>
                        }
                        .into_any(),
                        Exchange::Failed(message) => view! {
                            <div class="space-y-4">
                                <div class="alert alert-error text-sm py-2">
                                    <span>{message}</span>
                                </div>
                                <button class="btn btn-ghost" on:click=move |_| router.replace("/devices")>
                                    "Back to devices"
                                </button>
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

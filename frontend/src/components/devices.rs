//! 设备管理页
//!
//! 连接/断开步数提供方并触发同步。OAuth 授权跳转离开本应用，
//! 回调由 OauthCallbackPage 接收。同步一次只允许一台设备进行，
//! 这是 UI 层的串行化，服务端本身无此限制。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::{Device, DeviceProvider, StepDate, VirtualSyncRequest};

use crate::api::use_api;
use crate::cache::{keys, use_cache};
use crate::components::icons::*;
use crate::components::shell::use_notify;

const PROVIDERS: [DeviceProvider; 3] = [
    DeviceProvider::Garmin,
    DeviceProvider::Fitbit,
    DeviceProvider::Virtual,
];

#[component]
pub fn DevicesPage() -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let notify = use_notify();

    let (devices, set_devices) = signal(Vec::<Device>::new());
    let (loading, set_loading) = signal(true);
    // 正在同步的提供方，Some 时其余同步按钮禁用
    let (syncing, set_syncing) = signal(Option::<DeviceProvider>::None);
    let (last_sync_message, set_last_sync_message) = signal(Option::<String>::None);

    // 虚拟设备的可选参数
    let (virtual_steps, set_virtual_steps) = signal(String::new());
    let (virtual_date, set_virtual_date) = signal(String::new());

    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        move |_| {
            cache.track();
            let key = keys::devices();
            if let Some(cached) = cache.get::<Vec<Device>>(&key) {
                set_devices.set(cached);
                set_loading.set(false);
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.list_devices().await {
                    Ok(response) => {
                        cache.put(&key, &response.devices);
                        set_devices.set(response.devices);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_loading.set(false);
            });
        }
    });

    let linked = move |provider: DeviceProvider| {
        devices.with(|list| list.iter().find(|d| d.provider == provider).cloned())
    };
    // 同一时间至多连接一个提供方，已有连接时其余 Connect 禁用
    let any_linked = move || devices.with(|list| !list.is_empty());

    let on_connect = {
        let api = api.clone();
        move |provider: DeviceProvider| {
            let api = api.clone();
            spawn_local(async move {
                match api.device_authorize_url(provider.as_str()).await {
                    Ok(response) => {
                        // 整页跳转到提供方的授权页面
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&response.authorization_url);
                        }
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    let on_disconnect = {
        let api = api.clone();
        let cache = cache.clone();
        move |provider: DeviceProvider| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message(&format!(
                        "Disconnect {}? Already submitted steps are kept.",
                        provider.display_name()
                    ))
                    .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            spawn_local(async move {
                match api.disconnect_device(provider.as_str()).await {
                    Ok(_) => {
                        notify.success(format!("{} disconnected", provider.display_name()));
                        cache.invalidate("devices");
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    let on_sync = {
        let api = api.clone();
        let cache = cache.clone();
        move |provider: DeviceProvider| {
            if syncing.get_untracked().is_some() {
                return;
            }
            let request = if provider == DeviceProvider::Virtual {
                VirtualSyncRequest {
                    steps: virtual_steps.get_untracked().trim().parse().ok(),
                    date: StepDate::parse(virtual_date.get_untracked().trim()),
                }
            } else {
                VirtualSyncRequest::default()
            };

            let api = api.clone();
            let cache = cache.clone();
            set_syncing.set(Some(provider));
            set_last_sync_message.set(None);
            spawn_local(async move {
                match api.sync_device(provider.as_str(), &request).await {
                    Ok(result) => {
                        crate::analytics::event("device_sync", None);
                        set_last_sync_message.set(Some(if result.message.is_empty() {
                            format!(
                                "{}: {} steps across {} days",
                                provider.display_name(),
                                result.steps,
                                result.submitted_count
                            )
                        } else {
                            result.message
                        }));
                        // 同步写入了步数，设备状态与所有榜单都需要重载
                        cache.invalidate("devices");
                        cache.invalidate("leaderboard");
                        cache.invalidate("steps");
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_syncing.set(None);
            });
        }
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <div class="flex items-center gap-3">
                <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                    <Watch attr:class="h-6 w-6" />
                </div>
                <div>
                    <h2 class="text-2xl font-bold">"Devices"</h2>
                    <p class="text-base-content/70 text-sm">
                        "Connect a step provider to sync steps automatically."
                    </p>
                </div>
            </div>

            {move || last_sync_message.get().map(|message| view! {
                <div class="alert alert-success text-sm py-2">
                    <span>{message}</span>
                </div>
            })}

            <Show when=move || loading.get()>
                <div class="text-center py-8">
                    <span class="loading loading-spinner loading-md"></span>
                </div>
            </Show>

            <Show when=move || !loading.get()>
                <div class="space-y-4">
                    {PROVIDERS
                        .into_iter()
                        .map(|provider| {
                            let device = Signal::derive(move || linked(provider));
                            let is_syncing = move || syncing.get() == Some(provider);
                            let any_syncing = move || syncing.get().is_some();
                            let on_connect = on_connect.clone();
                            let on_disconnect = on_disconnect.clone();
                            let on_sync = on_sync.clone();
                            view! {
                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body">
                                        <div class="flex flex-wrap items-center justify-between gap-4">
                                            <div>
                                                <h3 class="card-title text-lg">{provider.display_name()}</h3>
                                                {move || match device.get() {
                                                    Some(d) => view! {
                                                        <p class="text-sm text-base-content/70">
                                                            "Connected " {d.linked_at.clone()}
                                                            {d.last_sync
                                                                .as_ref()
                                                                .map(|ts| format!(", last sync {}", ts))
                                                                .unwrap_or_else(|| ", never synced".to_string())}
                                                        </p>
                                                    }
                                                    .into_any(),
                                                    None => view! {
                                                        <p class="text-sm text-base-content/50">"Not connected"</p>
                                                    }
                                                    .into_any(),
                                                }}
                                            </div>
                                            <div class="flex gap-2">
                                                <Show
                                                    when=move || device.get().is_some()
                                                    fallback={
                                                        let on_connect = on_connect.clone();
                                                        move || {
                                                            let on_connect = on_connect.clone();
                                                            view! {
                                                                <button
                                                                    class="btn btn-primary btn-sm gap-2"
                                                                    disabled=any_linked
                                                                    on:click=move |_| on_connect(provider)
                                                                >
                                                                    <LinkIcon attr:class="h-4 w-4" /> "Connect"
                                                                </button>
                                                            }
                                                        }
                                                    }
                                                >
                                                    <button
                                                        class="btn btn-outline btn-sm gap-2"
                                                        disabled=any_syncing
                                                        on:click={
                                                            let on_sync = on_sync.clone();
                                                            move |_| on_sync(provider)
                                                        }
                                                    >
                                                        <RefreshCw attr:class=move || if is_syncing() {
                                                            "h-4 w-4 animate-spin"
                                                        } else {
                                                            "h-4 w-4"
                                                        } />
                                                        {move || if is_syncing() { "Syncing..." } else { "Sync now" }}
                                                    </button>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click={
                                                            let on_disconnect = on_disconnect.clone();
                                                            move |_| on_disconnect(provider)
                                                        }
                                                    >
                                                        "Disconnect"
                                                    </button>
                                                </Show>
                                            </div>
                                        </div>

                                        // 虚拟设备支持指定步数与日期，便于演示和测试环境
                                        <Show when=move || {
                                            provider == DeviceProvider::Virtual && device.get().is_some()
                                        }>
                                            <div class="flex flex-wrap gap-2 mt-2">
                                                <input
                                                    type="number"
                                                    min="0"
                                                    placeholder="Steps (random if empty)"
                                                    on:input=move |ev| set_virtual_steps.set(event_target_value(&ev))
                                                    prop:value=virtual_steps
                                                    class="input input-bordered input-sm w-48"
                                                />
                                                <input
                                                    type="date"
                                                    on:input=move |ev| set_virtual_date.set(event_target_value(&ev))
                                                    prop:value=virtual_date
                                                    class="input input-bordered input-sm w-40"
                                                />
                                            </div>
                                        </Show>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

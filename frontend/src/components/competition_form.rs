//! 比赛创建/编辑页（管理员）
//!
//! 同一个表单服务创建与编辑两种模式。输入停顿 3 秒后自动把
//! 草稿存入 LocalStorage，下次进入同一表单时恢复，提交成功后
//! 丢弃。角色不足时渲染 AccessDenied 而不是重定向。

mod form_state;
mod sections;

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::Competition;
use stepsquad_shared::validate::GENERAL;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::cache::{keys, use_cache};
use crate::components::access_denied::AccessDenied;
use crate::components::shell::use_notify;
use crate::error::ApiError;
use crate::web::router::use_router;
use crate::web::storage::{KEY_FORM_DRAFT_PREFIX, LocalStorage};
use crate::web::timer::Timeout;
use form_state::{FormDraft, FormState};
use sections::{BasicInfoSection, LimitsSection, ScheduleSection};

/// 自动保存防抖间隔
const AUTOSAVE_DEBOUNCE_MS: u32 = 3_000;

fn draft_key(comp_id: Option<&str>) -> String {
    format!("{}{}", KEY_FORM_DRAFT_PREFIX, comp_id.unwrap_or("new"))
}

#[component]
pub fn CompetitionFormPage(#[prop(optional)] comp_id: Option<String>) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let auth = use_auth();
    let router = use_router();
    let notify = use_notify();

    let editing = comp_id.is_some();
    let key = draft_key(comp_id.as_deref());
    let is_admin = auth.is_admin_signal();

    let state = FormState::new();
    let (saving, set_saving) = signal(false);
    let (loading, set_loading) = signal(editing);

    // 编辑模式：拉取现有比赛填充表单
    if let Some(comp_id) = comp_id.clone() {
        let api = api.clone();
        let cache = cache.clone();
        let key = key.clone();
        spawn_local(async move {
            let cached = cache.get::<Competition>(&keys::competition(&comp_id));
            let result = match cached {
                Some(competition) => Ok(competition),
                None => api.get_competition(&comp_id).await,
            };
            match result {
                Ok(competition) => {
                    state.load(&competition);
                    restore_draft(state, &key, notify);
                }
                Err(e) => notify.error(e.user_message()),
            }
            set_loading.set(false);
        });
    } else {
        restore_draft(state, &key, notify);
    }

    // 自动保存：任一字段变化 3 秒后写入草稿，期间再次输入则重新计时
    let autosave_timer = StoredValue::new_local(Option::<Timeout>::None);
    {
        let key = key.clone();
        Effect::new(move |prev: Option<()>| {
            // 读出全部字段以建立依赖
            let draft = FormDraft {
                comp_id: state.comp_id.get(),
                name: state.name.get(),
                tz: state.tz.get(),
                registration_open_date: state.registration_open_date.get(),
                start_date: state.start_date.get(),
                end_date: state.end_date.get(),
                max_teams: state.max_teams.get(),
                max_members_per_team: state.max_members_per_team.get(),
            };
            // 首次运行是初始化，不算用户输入
            if prev.is_none() {
                return;
            }
            let key = key.clone();
            autosave_timer.set_value(Timeout::new(AUTOSAVE_DEBOUNCE_MS, move || {
                if let Ok(json) = serde_json_wasm::to_string(&draft) {
                    LocalStorage::set(&key, &json);
                }
            }));
        });
    }

    // Callback 是 Copy 的，嵌套的视图闭包可以随意捕获而保持 Fn
    let on_submit = {
        let api = api.clone();
        let cache = cache.clone();
        let key = key.clone();
        let comp_id = comp_id.clone();
        Callback::new(move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if !state.validate(editing) {
                return;
            }

            let api = api.clone();
            let cache = cache.clone();
            let key = key.clone();
            let comp_id = comp_id.clone();
            set_saving.set(true);
            spawn_local(async move {
                let result = match &comp_id {
                    None => match state.to_create_request() {
                        Some(req) => api.create_competition(&req).await.map(|r| r.comp_id),
                        None => {
                            set_saving.set(false);
                            return;
                        }
                    },
                    Some(comp_id) => match state.to_update_request() {
                        Some(req) => api
                            .update_competition(comp_id, &req)
                            .await
                            .map(|_| comp_id.clone()),
                        None => {
                            set_saving.set(false);
                            return;
                        }
                    },
                };

                match result {
                    Ok(saved_id) => {
                        LocalStorage::delete(&key);
                        cache.invalidate("competitions");
                        if editing {
                            notify.success("Competition updated");
                            crate::analytics::event("competition_updated", Some(&saved_id));
                        } else {
                            notify.success("Competition created");
                            crate::analytics::event("competition_created", Some(&saved_id));
                        }
                        router.navigate("/");
                    }
                    Err(ApiError::Conflict(detail)) => {
                        state.errors.update(|e| {
                            e.insert(GENERAL, detail);
                        });
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_saving.set(false);
            });
        })
    };

    let title = if editing {
        "Edit Competition"
    } else {
        "New Competition"
    };

    view! {
        <Show
            when=move || is_admin.get()
            fallback=|| view! { <AccessDenied /> }
        >
            <div class="max-w-3xl mx-auto">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">{title}</h2>
                        <p class="text-base-content/70 text-sm mb-2">
                            "Changes are drafted locally while you type."
                        </p>

                        <Show when=move || loading.get()>
                            <div class="text-center py-8">
                                <span class="loading loading-spinner loading-md"></span>
                            </div>
                        </Show>

                        <Show when=move || !loading.get()>
                            <form on:submit=move |ev| on_submit.run(ev) class="space-y-4">
                                <Show when=move || state.error_for(GENERAL).is_some()>
                                    <div role="alert" class="alert alert-error text-sm py-2">
                                        <span>{move || state.error_for(GENERAL).unwrap_or_default()}</span>
                                    </div>
                                </Show>

                                <BasicInfoSection state=state editing=editing />
                                <ScheduleSection state=state />
                                <LimitsSection state=state editing=editing />

                                <div class="card-actions justify-end mt-6">
                                    <button
                                        type="button"
                                        class="btn btn-ghost"
                                        on:click=move |_| router.navigate("/")
                                    >
                                        "Cancel"
                                    </button>
                                    <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                                        {move || if saving.get() {
                                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                        } else if editing {
                                            "Save changes".into_any()
                                        } else {
                                            "Create competition".into_any()
                                        }}
                                    </button>
                                </div>
                            </form>
                        </Show>
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// 有草稿则恢复并提示
fn restore_draft(state: FormState, key: &str, notify: crate::components::shell::Notify) {
    if let Some(json) = LocalStorage::get(key) {
        if let Ok(draft) = serde_json_wasm::from_str::<FormDraft>(&json) {
            state.apply_draft(draft);
            notify.success("Restored unsaved draft");
        }
    }
}

//! 我的步数标签页
//!
//! 手动录入当天步数并查看历史记录。同一天重复提交由服务端
//! 覆盖而非累加，设备同步的记录会标注来源。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::validate::{GENERAL, StepWindow, validate_steps};
use stepsquad_shared::{Competition, StepDate, StepIngestRequest, StepRecord};

use crate::api::use_api;
use crate::cache::{keys, use_cache};
use crate::components::icons::*;
use crate::components::shell::use_notify;

#[component]
pub fn StepsTab(competition: Competition) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let notify = use_notify();

    let comp_id = competition.comp_id.clone();
    let window = StepWindow {
        start_date: competition.start_date,
        end_date: competition.end_date,
        status: competition.status,
    };
    let accepts_steps = competition.status.accepts_steps();
    // 结束后的宽限期内仍可补录
    let window_hint = format!(
        "Entries accepted for {} through {}.",
        competition.start_date,
        competition.grace_end_date()
    );

    let (date, set_date) = signal(StepDate::today().to_string());
    let (steps, set_steps) = signal(String::new());
    let (errors, set_errors) = signal(stepsquad_shared::validate::FieldErrors::new());
    let (history, set_history) = signal(Vec::<StepRecord>::new());
    let (submitting, set_submitting) = signal(false);

    let error_for = move |field: &'static str| errors.with(|e| e.get(field).cloned());

    // 历史记录
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| {
            cache.track();
            let key = keys::my_steps(&comp_id);
            if let Some(cached) = cache.get::<Vec<StepRecord>>(&key) {
                set_history.set(cached);
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            spawn_local(async move {
                match api.my_steps(&comp_id).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_history.set(data);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    });

    let on_submit = {
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let raw_date = date.get();
            let raw_steps = steps.get();
            let found = validate_steps(&raw_date, &raw_steps, &window);
            if !found.is_empty() {
                set_errors.set(found);
                return;
            }
            // 校验通过后解析必然成功
            let (Some(parsed_date), Ok(parsed_steps)) =
                (StepDate::parse(raw_date.trim()), raw_steps.trim().parse::<u32>())
            else {
                return;
            };

            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            set_errors.set(Default::default());
            set_submitting.set(true);
            spawn_local(async move {
                let req = StepIngestRequest {
                    comp_id: comp_id.clone(),
                    date: parsed_date,
                    steps: parsed_steps,
                    provider: "manual".to_string(),
                };
                match api.submit_steps(&req).await {
                    Ok(_) => {
                        notify.success("Steps recorded");
                        crate::analytics::event("steps_submitted", Some(&comp_id));
                        set_steps.set(String::new());
                        cache.invalidate(&format!("steps/{}", comp_id));
                        cache.invalidate(&format!("leaderboard/{}", comp_id));
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_submitting.set(false);
            });
        }
    };

    let total_steps = move || history.with(|h| h.iter().map(|r| r.steps as u64).sum::<u64>());

    view! {
        <div class="grid lg:grid-cols-3 gap-6">
            // 录入表单
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title gap-2">
                        <Footprints attr:class="h-5 w-5 text-primary" /> "Record steps"
                    </h3>
                    <p class="text-xs text-base-content/50">{window_hint}</p>

                    {move || error_for(GENERAL).map(|message| view! {
                        <div role="alert" class="alert alert-warning text-sm py-2">
                            <span>{message}</span>
                        </div>
                    })}

                    <form on:submit=on_submit.clone() class="space-y-4">
                        <div class="form-control">
                            <label for="step_date" class="label">
                                <span class="label-text">"Date"</span>
                            </label>
                            <input id="step_date"
                                type="date"
                                on:input=move |ev| set_date.set(event_target_value(&ev))
                                prop:value=date
                                disabled=!accepts_steps
                                class="input input-bordered w-full"
                            />
                            {move || error_for("date").map(|message| view! {
                                <span class="label-text-alt text-error mt-1">{message}</span>
                            })}
                        </div>
                        <div class="form-control">
                            <label for="step_count" class="label">
                                <span class="label-text">"Steps"</span>
                            </label>
                            <input id="step_count"
                                type="number"
                                min="0"
                                placeholder="8000"
                                on:input=move |ev| set_steps.set(event_target_value(&ev))
                                prop:value=steps
                                disabled=!accepts_steps
                                class="input input-bordered w-full"
                            />
                            {move || error_for("steps").map(|message| view! {
                                <span class="label-text-alt text-error mt-1">{message}</span>
                            })}
                        </div>
                        <button
                            type="submit"
                            disabled=move || submitting.get() || !accepts_steps
                            class="btn btn-primary w-full"
                        >
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                            } else {
                                "Submit".into_any()
                            }}
                        </button>
                    </form>
                </div>
            </div>

            // 历史记录
            <div class="card bg-base-100 shadow-xl lg:col-span-2">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <h3 class="card-title">"History"</h3>
                        <span class="badge badge-outline font-mono">
                            {move || format!("{} total", total_steps())}
                        </span>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Date"</th>
                                    <th class="text-right">"Steps"</th>
                                    <th class="text-right">"Source"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || history.with(|h| h.is_empty())>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "No steps recorded yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || history.get()
                                    key=|r| (r.date, r.steps)
                                    children=|record: StepRecord| {
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{record.date.to_string()}</td>
                                                <td class="text-right font-mono">{record.steps}</td>
                                                <td class="text-right">
                                                    <span class="badge badge-ghost badge-sm">
                                                        {record.provider.clone().unwrap_or_else(|| "manual".to_string())}
                                                    </span>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

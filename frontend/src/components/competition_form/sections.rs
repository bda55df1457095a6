//! 比赛表单分区组件
//!
//! 纯粹的表单输入渲染，职责单一。校验错误从 `FormState` 读取，
//! 显示在对应字段下方。

use leptos::prelude::*;
use stepsquad_shared::CompetitionStatus;

use super::form_state::FormState;

fn field_error(state: FormState, field: &'static str) -> impl IntoView {
    view! {
        <Show when=move || state.error_for(field).is_some()>
            <label class="label">
                <span class="label-text-alt text-error">
                    {move || state.error_for(field).unwrap_or_default()}
                </span>
            </label>
        </Show>
    }
}

/// 基础信息：ID、名称、时区
#[component]
pub fn BasicInfoSection(state: FormState, editing: bool) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label for="comp_id" class="label">
                    <span class="label-text">"Competition ID"</span>
                </label>
                <input id="comp_id"
                    type="text"
                    placeholder="spring-2025"
                    disabled=editing
                    on:input=move |ev| state.comp_id.set(event_target_value(&ev))
                    prop:value=move || state.comp_id.get()
                    class="input input-bordered w-full font-mono"
                />
                {field_error(state, "comp_id")}
                <Show when=move || !editing>
                    <label class="label">
                        <span class="label-text-alt text-base-content/50">
                            "3-20 characters, cannot be changed later"
                        </span>
                    </label>
                </Show>
            </div>
            <div class="form-control">
                <label for="name" class="label">
                    <span class="label-text">"Name"</span>
                </label>
                <input id="name"
                    type="text"
                    placeholder="Spring Step Challenge"
                    on:input=move |ev| state.name.set(event_target_value(&ev))
                    prop:value=move || state.name.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "name")}
            </div>
        </div>

        <div class="form-control">
            <label for="tz" class="label">
                <span class="label-text">"Timezone"</span>
            </label>
            <input id="tz"
                type="text"
                placeholder="Europe/Bucharest"
                on:input=move |ev| state.tz.set(event_target_value(&ev))
                prop:value=move || state.tz.get()
                class="input input-bordered w-full font-mono"
            />
            <label class="label">
                <span class="label-text-alt text-base-content/50">
                    "IANA timezone used for daily step boundaries"
                </span>
            </label>
        </div>
    }
}

/// 日程：报名、开始、结束日期
#[component]
pub fn ScheduleSection(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-3 gap-4">
            <div class="form-control">
                <label for="registration_open_date" class="label">
                    <span class="label-text">"Registration opens"</span>
                </label>
                <input id="registration_open_date"
                    type="date"
                    on:input=move |ev| state.registration_open_date.set(event_target_value(&ev))
                    prop:value=move || state.registration_open_date.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "registration_open_date")}
            </div>
            <div class="form-control">
                <label for="start_date" class="label">
                    <span class="label-text">"Start date"</span>
                </label>
                <input id="start_date"
                    type="date"
                    on:input=move |ev| state.start_date.set(event_target_value(&ev))
                    prop:value=move || state.start_date.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "start_date")}
            </div>
            <div class="form-control">
                <label for="end_date" class="label">
                    <span class="label-text">"End date"</span>
                </label>
                <input id="end_date"
                    type="date"
                    on:input=move |ev| state.end_date.set(event_target_value(&ev))
                    prop:value=move || state.end_date.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "end_date")}
            </div>
        </div>
    }
}

/// 容量限制与状态
#[component]
pub fn LimitsSection(state: FormState, editing: bool) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label for="max_teams" class="label">
                    <span class="label-text">"Max teams"</span>
                </label>
                <input id="max_teams"
                    type="number" min="1" max="500"
                    on:input=move |ev| {
                        if let Ok(val) = event_target_value(&ev).parse::<u32>() {
                            state.max_teams.set(val);
                        }
                    }
                    prop:value=move || state.max_teams.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "max_teams")}
            </div>
            <div class="form-control">
                <label for="max_members_per_team" class="label">
                    <span class="label-text">"Max members per team"</span>
                </label>
                <input id="max_members_per_team"
                    type="number" min="1" max="200"
                    on:input=move |ev| {
                        if let Ok(val) = event_target_value(&ev).parse::<u32>() {
                            state.max_members_per_team.set(val);
                        }
                    }
                    prop:value=move || state.max_members_per_team.get()
                    class="input input-bordered w-full"
                />
                {field_error(state, "max_members_per_team")}
            </div>
        </div>

        // 状态只在编辑时开放，创建的比赛总是从 DRAFT 开始
        <Show when=move || editing>
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Status"</span>
                </label>
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| {
                        let status = match event_target_value(&ev).as_str() {
                            "REGISTRATION" => CompetitionStatus::Registration,
                            "ACTIVE" => CompetitionStatus::Active,
                            "ENDED" => CompetitionStatus::Ended,
                            "ARCHIVED" => CompetitionStatus::Archived,
                            _ => CompetitionStatus::Draft,
                        };
                        state.status.set(status);
                    }
                >
                    {[
                        CompetitionStatus::Draft,
                        CompetitionStatus::Registration,
                        CompetitionStatus::Active,
                        CompetitionStatus::Ended,
                        CompetitionStatus::Archived,
                    ]
                        .into_iter()
                        .map(|status| {
                            view! {
                                <option
                                    value=status.as_str()
                                    selected=move || state.status.get() == status
                                >
                                    {status.as_str()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
        </Show>
    }
}

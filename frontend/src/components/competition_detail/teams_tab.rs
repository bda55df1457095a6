//! 队伍标签页
//!
//! 建队、加入、退出与重命名。客户端先做同步校验与按钮禁用，
//! 容量竞态仍可能被服务端以 409 拒绝，按通知呈现。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::validate::{GENERAL, validate_team};
use stepsquad_shared::{Competition, Team, TeamCreateRequest, TeamJoinRequest, TeamRenameRequest};

use crate::api::use_api;
use crate::cache::use_cache;
use crate::components::icons::*;
use crate::components::shell::use_notify;

#[component]
pub fn TeamsTab(
    competition: Competition,
    teams: ReadSignal<Vec<Team>>,
    my_uid: Signal<String>,
    my_team: Signal<Option<Team>>,
) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let notify = use_notify();

    let comp_id = competition.comp_id.clone();
    let max_teams = competition.max_teams;
    let max_members = competition.max_members_per_team;
    let membership_open = competition.status.allows_membership_changes();

    let (dialog_open, set_dialog_open) = signal(false);
    let (team_name, set_team_name) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (busy, set_busy) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if dialog_open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let team_count = move || teams.with(|t| t.len() as u32);
    let at_capacity = move || team_count() >= max_teams;
    let in_a_team = move || my_team.get().is_some();

    // 写操作后让队伍与两种排行榜都重新加载
    let invalidate_team_data = {
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move || {
            cache.invalidate(&format!("teams/{}", comp_id));
            cache.invalidate(&format!("leaderboard/{}", comp_id));
        }
    };

    let on_create = {
        let api = api.clone();
        let comp_id = comp_id.clone();
        let invalidate = invalidate_team_data.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let name = team_name.get();
            let errors = validate_team(&name, team_count(), max_teams);
            if let Some(message) = errors
                .get("name")
                .or_else(|| errors.get(GENERAL))
                .cloned()
            {
                set_form_error.set(Some(message));
                return;
            }

            let api = api.clone();
            let comp_id = comp_id.clone();
            let invalidate = invalidate.clone();
            set_busy.set(true);
            set_form_error.set(None);
            spawn_local(async move {
                let req = TeamCreateRequest {
                    name: name.trim().to_string(),
                    comp_id: comp_id.clone(),
                    owner_uid: my_uid.get_untracked(),
                };
                match api.create_team(&req).await {
                    Ok(_) => {
                        notify.success("Team created");
                        crate::analytics::event("team_created", Some(&comp_id));
                        set_dialog_open.set(false);
                        set_team_name.set(String::new());
                        invalidate();
                    }
                    Err(e) => set_form_error.set(Some(e.user_message())),
                }
                set_busy.set(false);
            });
        }
    };

    let on_join = {
        let api = api.clone();
        let comp_id = comp_id.clone();
        let invalidate = invalidate_team_data.clone();
        move |team_id: String| {
            let api = api.clone();
            let comp_id = comp_id.clone();
            let invalidate = invalidate.clone();
            spawn_local(async move {
                let req = TeamJoinRequest {
                    team_id,
                    uid: my_uid.get_untracked(),
                };
                match api.join_team(&req).await {
                    Ok(_) => {
                        notify.success("Joined team");
                        crate::analytics::event("team_joined", Some(&comp_id));
                        invalidate();
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    let on_leave = {
        let api = api.clone();
        let invalidate = invalidate_team_data.clone();
        move |team_id: String| {
            let api = api.clone();
            let invalidate = invalidate.clone();
            spawn_local(async move {
                let req = TeamJoinRequest {
                    team_id,
                    uid: my_uid.get_untracked(),
                };
                match api.leave_team(&req).await {
                    Ok(_) => {
                        notify.success("Left team");
                        invalidate();
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    let on_rename = {
        let api = api.clone();
        let invalidate = invalidate_team_data.clone();
        move |team_id: String, current: String| {
            let entered = web_sys::window().and_then(|w| {
                w.prompt_with_message_and_default("New team name:", &current)
                    .ok()
                    .flatten()
            });
            let Some(name) = entered else { return };
            // 重命名不受容量约束，只校验名称本身
            let errors = validate_team(&name, 0, u32::MAX);
            if let Some(message) = errors.get("name") {
                notify.error(message.clone());
                return;
            }

            let api = api.clone();
            let invalidate = invalidate.clone();
            spawn_local(async move {
                let req = TeamRenameRequest {
                    name: name.trim().to_string(),
                };
                match api.rename_team(&team_id, &req).await {
                    Ok(_) => {
                        notify.success("Team renamed");
                        invalidate();
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title gap-2">
                            <Users attr:class="h-5 w-5 text-primary" /> "Teams"
                        </h3>
                        <p class="text-base-content/70 text-sm">
                            {move || format!("{} of {} teams", team_count(), max_teams)}
                        </p>
                    </div>
                    <button
                        class="btn btn-primary btn-sm gap-2"
                        disabled=move || !membership_open || at_capacity() || in_a_team()
                        on:click=move |_| set_dialog_open.set(true)
                    >
                        <Plus attr:class="h-4 w-4" /> "Create team"
                    </button>
                </div>

                <Show when=move || at_capacity()>
                    <div class="px-6">
                        <div class="alert alert-warning text-sm py-2">
                            <span>
                                {format!(
                                    "Maximum number of teams ({}) reached for this competition",
                                    max_teams
                                )}
                            </span>
                        </div>
                    </div>
                </Show>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Members"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || teams.with(|t| t.is_empty())>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        "No teams yet. Create the first one."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || teams.get()
                                key=|t| (t.team_id.clone(), t.name.clone(), t.members.len())
                                children={
                                    let on_join = on_join.clone();
                                    let on_leave = on_leave.clone();
                                    let on_rename = on_rename.clone();
                                    move |team: Team| {
                                        let uid = my_uid.get_untracked();
                                        let is_mine = team.has_member(&uid);
                                        let is_owner = team.owner_uid == uid;
                                        let full = team.is_full(max_members);
                                        let join_id = team.team_id.clone();
                                        let leave_id = team.team_id.clone();
                                        let rename_id = team.team_id.clone();
                                        let rename_current = team.name.clone();
                                        let on_join = on_join.clone();
                                        let on_leave = on_leave.clone();
                                        let on_rename = on_rename.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <span class="font-bold">{team.name.clone()}</span>
                                                    <Show when=move || is_mine>
                                                        <span class="badge badge-primary badge-sm ml-2">"yours"</span>
                                                    </Show>
                                                </td>
                                                <td class="font-mono text-sm">
                                                    {team.members.len()} " / " {max_members}
                                                </td>
                                                <td class="text-right space-x-1">
                                                    <Show when=move || is_owner>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square"
                                                            on:click={
                                                                let rename_id = rename_id.clone();
                                                                let rename_current = rename_current.clone();
                                                                let on_rename = on_rename.clone();
                                                                move |_| on_rename(rename_id.clone(), rename_current.clone())
                                                            }
                                                        >
                                                            <Pencil attr:class="h-4 w-4" />
                                                        </button>
                                                    </Show>
                                                    {if is_mine {
                                                        view! {
                                                            <button
                                                                class="btn btn-outline btn-error btn-sm"
                                                                disabled=!membership_open
                                                                on:click={
                                                                    let leave_id = leave_id.clone();
                                                                    let on_leave = on_leave.clone();
                                                                    move |_| on_leave(leave_id.clone())
                                                                }
                                                            >
                                                                "Leave"
                                                            </button>
                                                        }
                                                        .into_any()
                                                    } else {
                                                        view! {
                                                            <button
                                                                class="btn btn-outline btn-sm"
                                                                disabled=move || !membership_open || full || in_a_team()
                                                                on:click={
                                                                    let join_id = join_id.clone();
                                                                    let on_join = on_join.clone();
                                                                    move |_| on_join(join_id.clone())
                                                                }
                                                            >
                                                                {if full { "Full" } else { "Join" }}
                                                            </button>
                                                        }
                                                        .into_any()
                                                    }}
                                                </td>
                                            </tr>
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>

        // 建队模态框
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_dialog_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Create a team"</h3>
                <p class="py-2 text-base-content/70 text-sm">
                    "You will be the team captain."
                </p>
                <form on:submit=on_create class="space-y-4">
                    <Show when=move || form_error.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || form_error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <div class="form-control">
                        <label for="team_name" class="label">
                            <span class="label-text">"Team name"</span>
                        </label>
                        <input id="team_name"
                            type="text"
                            placeholder="Morning Pacers"
                            on:input=move |ev| set_team_name.set(event_target_value(&ev))
                            prop:value=team_name
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_dialog_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" disabled=move || busy.get() class="btn btn-primary">
                            {move || if busy.get() {
                                view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                            } else {
                                "Create".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

//! 排行榜标签页
//!
//! 个人榜分页，队伍榜一次拉全。排名与并列由服务端决定，
//! 这里只负责展示。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::{IndividualEntry, Page, TeamEntry};

use crate::api::use_api;
use crate::cache::{keys, use_cache};
use crate::components::icons::*;
use crate::components::shell::use_notify;

const PAGE_SIZE: u32 = 20;

/// 前三名的奖牌配色
fn rank_class(rank: u32) -> &'static str {
    match rank {
        1 => "font-bold text-yellow-500",
        2 => "font-bold text-slate-400",
        3 => "font-bold text-amber-700",
        _ => "",
    }
}

#[component]
pub fn LeaderboardTab(comp_id: String) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let notify = use_notify();

    let (page, set_page) = signal(1u32);
    let (individuals, set_individuals) = signal(Page::<IndividualEntry>::empty());
    let (team_board, set_team_board) = signal(Vec::<TeamEntry>::new());
    let (loading, set_loading) = signal(true);

    // 个人榜
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| {
            cache.track();
            let current = page.get();
            let key = keys::leaderboard_page(&comp_id, current);
            if let Some(cached) = cache.get::<Page<IndividualEntry>>(&key) {
                set_individuals.set(cached);
                set_loading.set(false);
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.individual_leaderboard(&comp_id, current, PAGE_SIZE).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_individuals.set(data);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_loading.set(false);
            });
        }
    });

    // 队伍榜
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| {
            cache.track();
            let key = keys::team_leaderboard(&comp_id);
            if let Some(cached) = cache.get::<Vec<TeamEntry>>(&key) {
                set_team_board.set(cached);
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            spawn_local(async move {
                match api.team_leaderboard(&comp_id).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_team_board.set(data);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    });

    let refresh = {
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| cache.invalidate(&format!("leaderboard/{}", comp_id))
    };

    view! {
        <div class="grid lg:grid-cols-3 gap-6">
            // 个人榜
            <div class="card bg-base-100 shadow-xl lg:col-span-2">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <h3 class="card-title gap-2">
                            <Trophy attr:class="h-5 w-5 text-primary" /> "Individuals"
                        </h3>
                        <button on:click=refresh class="btn btn-ghost btn-circle btn-sm">
                            <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                        </button>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th class="w-16">"Rank"</th>
                                    <th>"Participant"</th>
                                    <th class="text-right">"Steps"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || individuals.with(|p| p.rows.is_empty()) >
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "No steps submitted yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || individuals.get().rows
                                    key=|e| (e.user_id.clone(), e.rank, e.total_steps)
                                    children=|entry: IndividualEntry| {
                                        view! {
                                            <tr>
                                                <td class=rank_class(entry.rank)>{format!("#{}", entry.rank)}</td>
                                                <td>{entry.email.clone().unwrap_or_else(|| entry.user_id.clone())}</td>
                                                <td class="text-right font-mono">{entry.total_steps}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                    <div class="flex items-center justify-center gap-2 p-4">
                        <button
                            class="btn btn-sm btn-ghost"
                            disabled=move || !individuals.with(|p| p.has_prev())
                            on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1).max(1))
                        >
                            <ChevronLeft attr:class="h-4 w-4" />
                        </button>
                        <span class="text-sm text-base-content/70">
                            {move || individuals.with(|p| format!("Page {} of {}", p.page, p.total_pages.max(1)))}
                        </span>
                        <button
                            class="btn btn-sm btn-ghost"
                            disabled=move || !individuals.with(|p| p.has_next())
                            on:click=move |_| set_page.update(|p| *p += 1)
                        >
                            <ChevronRight attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>

            // 队伍榜
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title gap-2">
                            <Users attr:class="h-5 w-5 text-primary" /> "Teams"
                        </h3>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th class="w-16">"Rank"</th>
                                    <th>"Team"</th>
                                    <th class="text-right">"Steps"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || team_board.with(|t| t.is_empty())>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "No teams on the board yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || team_board.get()
                                    key=|e| (e.team_id.clone(), e.rank, e.total_steps)
                                    children=|entry: TeamEntry| {
                                        view! {
                                            <tr>
                                                <td class=rank_class(entry.rank)>{format!("#{}", entry.rank)}</td>
                                                <td>{entry.name.clone()}</td>
                                                <td class="text-right font-mono">{entry.total_steps}</td>
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

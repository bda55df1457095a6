//! 首页：比赛列表
//!
//! 分页展示比赛，支持按状态、时区和名称筛选，筛选条件随查询串
//! 传给后端。命中新鲜缓存则不发请求。管理员可从这里进入创建、
//! 编辑和删除。

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::{Competition, CompetitionStatus, Page};

use crate::api::{CompetitionFilter, use_api};
use crate::auth::use_auth;
use crate::cache::{keys, use_cache};
use crate::components::icons::*;
use crate::components::shell::use_notify;
use crate::web::router::use_router;

const PAGE_SIZE: u32 = 10;

/// 时区筛选的候选项
const TIMEZONES: [&str; 6] = [
    "Europe/Bucharest",
    "UTC",
    "America/New_York",
    "America/Los_Angeles",
    "Europe/London",
    "Asia/Tokyo",
];

fn status_badge_class(status: CompetitionStatus) -> &'static str {
    match status {
        CompetitionStatus::Draft => "badge badge-neutral",
        CompetitionStatus::Registration => "badge badge-info",
        CompetitionStatus::Active => "badge badge-success",
        CompetitionStatus::Ended => "badge badge-warning",
        CompetitionStatus::Archived => "badge badge-ghost",
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let auth = use_auth();
    let router = use_router();
    let notify = use_notify();

    let is_admin = auth.is_admin_signal();
    let (page, set_page) = signal(1u32);
    let (competitions, set_competitions) = signal(Page::<Competition>::empty());
    let (loading, set_loading) = signal(true);

    // 筛选条件；select 的空字符串表示"全部"
    let (status_filter, set_status_filter) = signal(String::new());
    let (tz_filter, set_tz_filter) = signal(String::new());
    let (search, set_search) = signal(String::new());

    let current_filter = move || CompetitionFilter {
        status: status_filter.with(|s| CompetitionStatus::parse(s)),
        tz: tz_filter.with(|tz| (!tz.is_empty()).then(|| tz.clone())),
        search: search.with(|q| {
            let q = q.trim();
            (!q.is_empty()).then(|| q.to_string())
        }),
    };
    let has_filters = move || !current_filter().is_empty();
    let clear_filters = move |_| {
        set_status_filter.set(String::new());
        set_tz_filter.set(String::new());
        set_search.set(String::new());
        set_page.set(1);
    };

    // 加载当前页：缓存命中直接用，否则拉取并回填缓存。
    // 缓存失效（track）、翻页和筛选变化都会重新触发。
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        move |_| {
            cache.track();
            let current = page.get();
            let filter = current_filter();
            let key = keys::competitions_page(current, &filter.query_suffix());

            if let Some(cached) = cache.get::<Page<Competition>>(&key) {
                set_competitions.set(cached);
                set_loading.set(false);
                return;
            }

            let api = api.clone();
            let cache = cache.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.list_competitions(current, PAGE_SIZE, &filter).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_competitions.set(data);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
                set_loading.set(false);
            });
        }
    });

    let handle_delete = {
        let api = api.clone();
        let cache = cache.clone();
        move |comp_id: String| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message(&format!(
                        "Delete competition \"{}\"? This cannot be undone.",
                        comp_id
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
                match api.delete_competition(&comp_id).await {
                    Ok(_) => {
                        notify.success("Competition deleted");
                        crate::analytics::event("competition_deleted", Some(&comp_id));
                        cache.invalidate("competitions");
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    };

    let refresh = {
        let cache = cache.clone();
        move |_| cache.invalidate("competitions")
    };

    let total = move || competitions.with(|c| c.rows.len());

    view! {
        <div class="space-y-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title gap-2">
                                <Trophy attr:class="h-5 w-5 text-primary" /> "Competitions"
                            </h3>
                            <p class="text-base-content/70 text-sm">
                                "Pick a competition to see the leaderboard and submit steps."
                            </p>
                        </div>
                        <button
                            on:click=refresh
                            disabled=move || loading.get()
                            class="btn btn-ghost btn-circle"
                        >
                            <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>

                    // 筛选栏：任一条件变化都回到第一页
                    <div class="flex flex-wrap items-center gap-2 px-6 pb-2">
                        <input
                            type="text"
                            placeholder="Search by name or ID..."
                            class="input input-bordered input-sm flex-1 min-w-48"
                            on:input=move |ev| {
                                set_search.set(event_target_value(&ev));
                                set_page.set(1);
                            }
                            prop:value=search
                        />
                        <select
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                set_status_filter.set(event_target_value(&ev));
                                set_page.set(1);
                            }
                            prop:value=status_filter
                        >
                            <option value="">"All statuses"</option>
                            {CompetitionStatus::ALL
                                .into_iter()
                                .map(|status| view! {
                                    <option value=status.as_str()>{status.as_str()}</option>
                                })
                                .collect_view()}
                        </select>
                        <select
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                set_tz_filter.set(event_target_value(&ev));
                                set_page.set(1);
                            }
                            prop:value=tz_filter
                        >
                            <option value="">"All timezones"</option>
                            {TIMEZONES
                                .into_iter()
                                .map(|tz| view! { <option value=tz>{tz}</option> })
                                .collect_view()}
                        </select>
                        <Show when=has_filters>
                            <button class="btn btn-ghost btn-sm" on:click=clear_filters>
                                "Clear"
                            </button>
                        </Show>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Status"</th>
                                    <th class="hidden md:table-cell">"Dates"</th>
                                    <th class="hidden md:table-cell">"Teams"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || total() == 0 && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            {move || if has_filters() {
                                                "No competitions match the current filters."
                                            } else {
                                                "No competitions yet."
                                            }}
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && total() == 0>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || competitions.get().rows
                                    key=|c| (c.comp_id.clone(), c.updated_at.clone())
                                    children={
                                        let handle_delete = handle_delete.clone();
                                        move |competition: Competition| {
                                            let comp_id = competition.comp_id.clone();
                                            let detail_id = comp_id.clone();
                                            let edit_id = comp_id.clone();
                                            let delete_id = comp_id.clone();
                                            let handle_delete = handle_delete.clone();
                                            view! {
                                                <tr class="hover cursor-pointer">
                                                    <td on:click=move |_| router.navigate(&format!("/competitions/{}", detail_id))>
                                                        <span class="font-bold">{competition.name.clone()}</span>
                                                        <div class="text-xs opacity-50 font-mono">{comp_id.clone()}</div>
                                                    </td>
                                                    <td>
                                                        <span class=status_badge_class(competition.status)>
                                                            {competition.status.as_str()}
                                                        </span>
                                                    </td>
                                                    <td class="hidden md:table-cell text-sm">
                                                        {competition.start_date.to_string()} " → " {competition.end_date.to_string()}
                                                    </td>
                                                    <td class="hidden md:table-cell text-sm">
                                                        "max " {competition.max_teams} " × " {competition.max_members_per_team}
                                                    </td>
                                                    <td class="text-right">
                                                        <Show when=move || is_admin.get()>
                                                            <button
                                                                class="btn btn-ghost btn-sm btn-square"
                                                                on:click={
                                                                    let edit_id = edit_id.clone();
                                                                    move |_| router.navigate(&format!("/competitions/{}/edit", edit_id))
                                                                }
                                                            >
                                                                <Pencil attr:class="h-4 w-4" />
                                                            </button>
                                                            <button
                                                                class="btn btn-ghost btn-sm btn-square text-error"
                                                                on:click={
                                                                    let delete_id = delete_id.clone();
                                                                    let handle_delete = handle_delete.clone();
                                                                    move |_| handle_delete(delete_id.clone())
                                                                }
                                                            >
                                                                <Trash2 attr:class="h-4 w-4" />
                                                            </button>
                                                        </Show>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    // 分页控制
                    <div class="flex items-center justify-center gap-2 p-4">
                        <button
                            class="btn btn-sm btn-ghost"
                            disabled=move || !competitions.with(|c| c.has_prev())
                            on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1).max(1))
                        >
                            <ChevronLeft attr:class="h-4 w-4" />
                        </button>
                        <span class="text-sm text-base-content/70">
                            {move || {
                                competitions.with(|c| {
                                    format!("Page {} of {}", c.page, c.total_pages.max(1))
                                })
                            }}
                        </span>
                        <button
                            class="btn btn-sm btn-ghost"
                            disabled=move || !competitions.with(|c| c.has_next())
                            on:click=move |_| set_page.update(|p| *p += 1)
                        >
                            <ChevronRight attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

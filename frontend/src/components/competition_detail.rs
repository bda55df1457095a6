//! 比赛详情页
//!
//! 排行榜、队伍和我的步数三个标签页。比赛与队伍数据在页面层
//! 加载一次，标签页通过信号消费；写操作通过缓存失效触发重载。

mod leaderboard_tab;
mod steps_tab;
mod teams_tab;

use leptos::prelude::*;
use leptos::task::spawn_local;
use stepsquad_shared::{Competition, CompetitionStatus, Team};

use crate::api::use_api;
use crate::auth::use_auth;
use crate::cache::{keys, use_cache};
use crate::components::shell::use_notify;
use leaderboard_tab::LeaderboardTab;
use steps_tab::StepsTab;
use teams_tab::TeamsTab;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Leaderboard,
    Teams,
    MySteps,
}

fn status_banner(status: CompetitionStatus) -> Option<&'static str> {
    match status {
        CompetitionStatus::Draft => Some("This competition is still a draft."),
        CompetitionStatus::Registration => {
            Some("Registration is open. Join a team before the start date.")
        }
        CompetitionStatus::Active => None,
        CompetitionStatus::Ended => {
            Some("This competition has ended. Steps within the grace period are still accepted by connected devices.")
        }
        CompetitionStatus::Archived => Some("This competition is archived."),
    }
}

#[component]
pub fn CompetitionDetailPage(comp_id: String) -> impl IntoView {
    let api = use_api();
    let cache = use_cache();
    let auth = use_auth();
    let notify = use_notify();

    let (competition, set_competition) = signal(Option::<Competition>::None);
    let (teams, set_teams) = signal(Vec::<Team>::new());
    let (tab, set_tab) = signal(Tab::Leaderboard);

    let my_uid = Signal::derive(move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.uid.clone()))
            .unwrap_or_default()
    });

    // 比赛本体
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| {
            cache.track();
            let key = keys::competition(&comp_id);
            if let Some(cached) = cache.get::<Competition>(&key) {
                set_competition.set(Some(cached));
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            spawn_local(async move {
                match api.get_competition(&comp_id).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_competition.set(Some(data));
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    });

    // 队伍列表（队伍标签页和"我的队伍"徽章共用）
    Effect::new({
        let api = api.clone();
        let cache = cache.clone();
        let comp_id = comp_id.clone();
        move |_| {
            cache.track();
            let key = keys::teams(&comp_id);
            if let Some(cached) = cache.get::<Vec<Team>>(&key) {
                set_teams.set(cached);
                return;
            }
            let api = api.clone();
            let cache = cache.clone();
            let comp_id = comp_id.clone();
            spawn_local(async move {
                match api.list_teams(&comp_id).await {
                    Ok(data) => {
                        cache.put(&key, &data);
                        set_teams.set(data);
                    }
                    Err(e) => notify.error(e.user_message()),
                }
            });
        }
    });

    let my_team = Signal::derive(move || {
        let uid = my_uid.get();
        teams.with(|list| list.iter().find(|t| t.has_member(&uid)).cloned())
    });

    let tab_class = move |this: Tab| {
        move || {
            if tab.get() == this {
                "tab tab-active"
            } else {
                "tab"
            }
        }
    };

    view! {
        <Show
            when=move || competition.get().is_some()
            fallback=|| view! {
                <div class="text-center py-16">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            {move || {
                let competition = match competition.get() {
                    Some(c) => c,
                    None => return ().into_any(),
                };
                let banner = status_banner(competition.status);
                let header = competition.clone();
                let comp_for_steps = competition.clone();
                let comp_for_teams = competition.clone();
                view! {
                    <div class="space-y-6">
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <div class="flex flex-wrap items-center justify-between gap-2">
                                    <div>
                                        <h2 class="card-title text-2xl">{header.name.clone()}</h2>
                                        <p class="text-sm text-base-content/70 font-mono">{header.comp_id.clone()}</p>
                                    </div>
                                    <div class="text-right">
                                        <span class="badge badge-lg badge-outline">{header.status.as_str()}</span>
                                        <p class="text-sm text-base-content/70 mt-1">
                                            {header.start_date.to_string()} " → " {header.end_date.to_string()}
                                        </p>
                                    </div>
                                </div>
                                {banner.map(|text| view! {
                                    <div class="alert alert-info text-sm py-2 mt-2">
                                        <span>{text}</span>
                                    </div>
                                })}
                                <Show when=move || my_team.get().is_some()>
                                    <div class="badge badge-primary badge-outline mt-2">
                                        "Your team: " {move || my_team.get().map(|t| t.name).unwrap_or_default()}
                                    </div>
                                </Show>
                            </div>
                        </div>

                        <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow">
                            <a role="tab" class=tab_class(Tab::Leaderboard) on:click=move |_| set_tab.set(Tab::Leaderboard)>
                                "Leaderboard"
                            </a>
                            <a role="tab" class=tab_class(Tab::Teams) on:click=move |_| set_tab.set(Tab::Teams)>
                                "Teams"
                            </a>
                            <a role="tab" class=tab_class(Tab::MySteps) on:click=move |_| set_tab.set(Tab::MySteps)>
                                "My Steps"
                            </a>
                        </div>

                        {move || match tab.get() {
                            Tab::Leaderboard => view! {
                                <LeaderboardTab comp_id=competition.comp_id.clone() />
                            }
                            .into_any(),
                            Tab::Teams => view! {
                                <TeamsTab
                                    competition=comp_for_teams.clone()
                                    teams=teams
                                    my_uid=my_uid
                                    my_team=my_team
                                />
                            }
                            .into_any(),
                            Tab::MySteps => view! {
                                <StepsTab competition=comp_for_steps.clone() />
                            }
                            .into_any(),
                        }}
                    </div>
                }
                .into_any()
            }}
        </Show>
    }
}

//! 比赛表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有与重置
//! - 同步校验（错误按字段归属）
//! - 数据到请求对象的转换
//! - 草稿的序列化（自动保存用）

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use stepsquad_shared::validate::{CompetitionInput, FieldErrors, validate_competition};
use stepsquad_shared::{
    Competition, CompetitionCreateRequest, CompetitionStatus, CompetitionUpdateRequest, StepDate,
};

const DEFAULT_TZ: &str = "Europe/Bucharest";

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub comp_id: RwSignal<String>,
    pub name: RwSignal<String>,
    pub tz: RwSignal<String>,
    pub registration_open_date: RwSignal<String>,
    pub start_date: RwSignal<String>,
    pub end_date: RwSignal<String>,
    pub max_teams: RwSignal<u32>,
    pub max_members_per_team: RwSignal<u32>,
    /// 仅编辑模式可改
    pub status: RwSignal<CompetitionStatus>,
    pub errors: RwSignal<FieldErrors>,
}

/// 本地草稿载荷（自动保存到 LocalStorage）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDraft {
    pub comp_id: String,
    pub name: String,
    pub tz: String,
    pub registration_open_date: String,
    pub start_date: String,
    pub end_date: String,
    pub max_teams: u32,
    pub max_members_per_team: u32,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            comp_id: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            tz: RwSignal::new(DEFAULT_TZ.to_string()),
            registration_open_date: RwSignal::new(String::new()),
            start_date: RwSignal::new(String::new()),
            end_date: RwSignal::new(String::new()),
            max_teams: RwSignal::new(10),
            max_members_per_team: RwSignal::new(10),
            status: RwSignal::new(CompetitionStatus::Draft),
            errors: RwSignal::new(FieldErrors::new()),
        }
    }

    /// 编辑模式：从已有比赛填充
    pub fn load(&self, competition: &Competition) {
        self.comp_id.set(competition.comp_id.clone());
        self.name.set(competition.name.clone());
        self.tz.set(competition.tz.clone());
        self.registration_open_date
            .set(competition.registration_open_date.to_string());
        self.start_date.set(competition.start_date.to_string());
        self.end_date.set(competition.end_date.to_string());
        self.max_teams.set(competition.max_teams);
        self.max_members_per_team
            .set(competition.max_members_per_team);
        self.status.set(competition.status);
        self.errors.set(FieldErrors::new());
    }

    /// 运行同步校验，错误写入 `errors`，全部通过返回 true
    pub fn validate(&self, editing: bool) -> bool {
        let errors = self.comp_id.with_untracked(|comp_id| {
            self.name.with_untracked(|name| {
                self.registration_open_date.with_untracked(|reg| {
                    self.start_date.with_untracked(|start| {
                        self.end_date.with_untracked(|end| {
                            validate_competition(&CompetitionInput {
                                comp_id,
                                name,
                                registration_open_date: reg,
                                start_date: start,
                                end_date: end,
                                max_teams: self.max_teams.get_untracked(),
                                max_members_per_team: self.max_members_per_team.get_untracked(),
                                editing,
                            })
                        })
                    })
                })
            })
        });
        let ok = errors.is_empty();
        self.errors.set(errors);
        ok
    }

    /// 取某字段的错误消息（视图绑定用）
    pub fn error_for(&self, field: &'static str) -> Option<String> {
        self.errors.with(|e| e.get(field).cloned())
    }

    /// 转换为创建请求，日期非法时返回 None（validate 先行保证不会发生）
    pub fn to_create_request(&self) -> Option<CompetitionCreateRequest> {
        Some(CompetitionCreateRequest {
            comp_id: self.comp_id.get_untracked().trim().to_string(),
            name: self.name.get_untracked().trim().to_string(),
            tz: self.tz.get_untracked(),
            registration_open_date: StepDate::parse(
                self.registration_open_date.get_untracked().trim(),
            )?,
            start_date: StepDate::parse(self.start_date.get_untracked().trim())?,
            end_date: StepDate::parse(self.end_date.get_untracked().trim())?,
            max_teams: self.max_teams.get_untracked(),
            max_members_per_team: self.max_members_per_team.get_untracked(),
            status: None,
        })
    }

    /// 转换为更新请求（全字段 PATCH，comp_id 不可变）
    pub fn to_update_request(&self) -> Option<CompetitionUpdateRequest> {
        Some(CompetitionUpdateRequest {
            name: Some(self.name.get_untracked().trim().to_string()),
            tz: Some(self.tz.get_untracked()),
            registration_open_date: Some(StepDate::parse(
                self.registration_open_date.get_untracked().trim(),
            )?),
            start_date: Some(StepDate::parse(self.start_date.get_untracked().trim())?),
            end_date: Some(StepDate::parse(self.end_date.get_untracked().trim())?),
            max_teams: Some(self.max_teams.get_untracked()),
            max_members_per_team: Some(self.max_members_per_team.get_untracked()),
            status: Some(self.status.get_untracked()),
        })
    }

    /// 从草稿恢复
    pub fn apply_draft(&self, draft: FormDraft) {
        self.comp_id.set(draft.comp_id);
        self.name.set(draft.name);
        self.tz.set(draft.tz);
        self.registration_open_date
            .set(draft.registration_open_date);
        self.start_date.set(draft.start_date);
        self.end_date.set(draft.end_date);
        self.max_teams.set(draft.max_teams);
        self.max_members_per_team.set(draft.max_members_per_team);
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: &FormState) -> FormDraft {
        FormDraft {
            comp_id: state.comp_id.get_untracked(),
            name: state.name.get_untracked(),
            tz: state.tz.get_untracked(),
            registration_open_date: state.registration_open_date.get_untracked(),
            start_date: state.start_date.get_untracked(),
            end_date: state.end_date.get_untracked(),
            max_teams: state.max_teams.get_untracked(),
            max_members_per_team: state.max_members_per_team.get_untracked(),
        }
    }

    fn filled() -> FormState {
        let state = FormState::new();
        state.comp_id.set("e2e-1".to_string());
        state.name.set("Test Comp".to_string());
        state.registration_open_date.set("2025-01-01".to_string());
        state.start_date.set("2025-02-01".to_string());
        state.end_date.set("2025-03-01".to_string());
        state
    }

    #[test]
    fn validate_gates_conversion() {
        let state = filled();
        assert!(state.validate(false));
        let req = state.to_create_request().unwrap();
        assert_eq!(req.comp_id, "e2e-1");
        assert_eq!(req.start_date, StepDate::parse("2025-02-01").unwrap());

        state.end_date.set("2025-01-15".to_string());
        assert!(!state.validate(false));
        assert!(state.errors.with_untracked(|e| e.contains_key("start_date")));
    }

    #[test]
    fn draft_round_trips() {
        let state = filled();
        let draft = snapshot(&state);
        let json = serde_json_wasm::to_string(&draft).unwrap();
        let restored: FormDraft = serde_json_wasm::from_str(&json).unwrap();

        let other = FormState::new();
        other.apply_draft(restored);
        assert_eq!(snapshot(&other), draft);
    }

    #[test]
    fn invalid_dates_never_build_requests() {
        let state = filled();
        state.start_date.set("not-a-date".to_string());
        assert!(state.to_create_request().is_none());
        assert!(state.to_update_request().is_none());
    }
}

//! 客户端表单校验模块
//!
//! 所有校验都是同步的，在任何网络调用之前执行，产出按字段分组的
//! 错误消息。它们只是服务端校验的镜像，不能替代后者：服务端
//! 仍可能以 409/422 拒绝，由 API 客户端的错误契约统一呈现。

use crate::{CompetitionStatus, MAX_DAILY_STEPS, StepDate};
use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

/// 字段名 -> 错误消息。"general" 键表示与具体字段无关的整体错误。
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const GENERAL: &str = "general";

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 80;
const COMP_ID_MIN: usize = 3;
const COMP_ID_MAX: usize = 20;
const MAX_TEAMS_LIMIT: u32 = 500;
const MAX_MEMBERS_LIMIT: u32 = 200;
const TEAM_NAME_MAX: usize = 50;

/// 比赛创建/编辑表单的原始输入
///
/// 日期保持字符串形式传入，以便区分"未填写"与"格式错误"。
#[derive(Debug, Clone, Default)]
pub struct CompetitionInput<'a> {
    pub comp_id: &'a str,
    pub name: &'a str,
    pub registration_open_date: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub max_teams: u32,
    pub max_members_per_team: u32,
    /// 编辑模式：comp_id 已固定，不再校验
    pub editing: bool,
}

/// 校验比赛表单
///
/// 规则：name 3-80；comp_id 3-20（仅创建时）；日期两两有序
/// registration_open <= start <= end（边界相等合法）；
/// max_teams 1-500；max_members_per_team 1-200。
pub fn validate_competition(input: &CompetitionInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !input.editing {
        let comp_id = input.comp_id.trim();
        if comp_id.is_empty() {
            errors.insert("comp_id", "Competition ID is required".to_string());
        } else if comp_id.len() < COMP_ID_MIN || comp_id.len() > COMP_ID_MAX {
            errors.insert(
                "comp_id",
                format!(
                    "Competition ID must be between {} and {} characters",
                    COMP_ID_MIN, COMP_ID_MAX
                ),
            );
        }
    }

    let name = input.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required".to_string());
    } else if name.chars().count() < NAME_MIN || name.chars().count() > NAME_MAX {
        errors.insert(
            "name",
            format!("Name must be between {} and {} characters", NAME_MIN, NAME_MAX),
        );
    }

    let reg = required_date(&mut errors, "registration_open_date", input.registration_open_date);
    let start = required_date(&mut errors, "start_date", input.start_date);
    let end = required_date(&mut errors, "end_date", input.end_date);

    // 三个日期都有效时才做两两比较
    if let (Some(reg), Some(start), Some(end)) = (reg, start, end) {
        if reg > start {
            errors.insert(
                "registration_open_date",
                "Registration open date must be before start date".to_string(),
            );
        }
        if start > end {
            errors.insert("start_date", "Start date must be before end date".to_string());
        }
    }

    if input.max_teams < 1 || input.max_teams > MAX_TEAMS_LIMIT {
        errors.insert(
            "max_teams",
            format!("Max teams must be between 1 and {}", MAX_TEAMS_LIMIT),
        );
    }
    if input.max_members_per_team < 1 || input.max_members_per_team > MAX_MEMBERS_LIMIT {
        errors.insert(
            "max_members_per_team",
            format!("Max members per team must be between 1 and {}", MAX_MEMBERS_LIMIT),
        );
    }

    errors
}

/// 校验建队表单
///
/// name 去空白后 1-50；队伍数达到上限时整体拒绝（按钮同时禁用，
/// 确保不会发出网络请求）。
pub fn validate_team(name: &str, current_team_count: u32, max_teams: u32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.insert("name", "Team name is required".to_string());
    } else if trimmed.chars().count() > TEAM_NAME_MAX {
        errors.insert(
            "name",
            format!("Team name must be at most {} characters", TEAM_NAME_MAX),
        );
    }

    if current_team_count >= max_teams {
        errors.insert(
            GENERAL,
            format!(
                "Maximum number of teams ({}) reached for this competition",
                max_teams
            ),
        );
    }

    errors
}

/// 步数提交的校验上下文：所属比赛的日期窗口与状态
#[derive(Debug, Clone, Copy)]
pub struct StepWindow {
    pub start_date: StepDate,
    pub end_date: StepDate,
    pub status: CompetitionStatus,
}

impl StepWindow {
    /// 宽限截止日：end_date + 2 天
    pub fn grace_end(&self) -> StepDate {
        self.end_date.plus_days(crate::GRACE_DAYS)
    }
}

/// 校验步数提交表单
///
/// 日期必须落在 [start_date, end_date + 2 天] 内；步数为
/// [0, 100000] 的整数；比赛非 ACTIVE 时整体拒绝。
pub fn validate_steps(date: &str, steps: &str, window: &StepWindow) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !window.status.accepts_steps() {
        errors.insert(
            GENERAL,
            format!(
                "Step submission is only available for ACTIVE competitions. Current status: {}",
                window.status.as_str()
            ),
        );
    }

    match required_date(&mut errors, "date", date) {
        Some(d) if d < window.start_date => {
            errors.insert(
                "date",
                format!(
                    "Date must be on or after competition start date ({})",
                    window.start_date
                ),
            );
        }
        Some(d) if d > window.grace_end() => {
            errors.insert(
                "date",
                format!(
                    "Date must be within competition end date + grace period ({})",
                    window.grace_end()
                ),
            );
        }
        _ => {}
    }

    let trimmed = steps.trim();
    if trimmed.is_empty() {
        errors.insert("steps", "Step count is required".to_string());
    } else {
        // 负数与非数字都会解析失败，统一走各自的错误分支
        match trimmed.parse::<i64>() {
            Err(_) => {
                errors.insert("steps", "Step count must be a whole number".to_string());
            }
            Ok(n) if n < 0 => {
                errors.insert("steps", "Step count cannot be negative".to_string());
            }
            Ok(n) if n > MAX_DAILY_STEPS as i64 => {
                errors.insert(
                    "steps",
                    format!("Step count cannot exceed {} steps per day", MAX_DAILY_STEPS),
                );
            }
            Ok(_) => {}
        }
    }

    errors
}

fn required_date(errors: &mut FieldErrors, field: &'static str, raw: &str) -> Option<StepDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, required_message(field));
        return None;
    }
    match StepDate::parse(raw) {
        Some(d) => Some(d),
        None => {
            errors.insert(field, format!("Invalid date, expected YYYY-MM-DD: {}", raw));
            None
        }
    }
}

fn required_message(field: &'static str) -> String {
    match field {
        "registration_open_date" => "Registration open date is required".to_string(),
        "start_date" => "Start date is required".to_string(),
        "end_date" => "End date is required".to_string(),
        "date" => "Date is required".to_string(),
        _ => "This field is required".to_string(),
    }
}

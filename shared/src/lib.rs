use serde::{Deserialize, Serialize};

pub mod date;
pub mod validate;

pub use date::StepDate;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 开发模式认证头，值为本地存储的邮箱标签
pub const HEADER_DEV_USER: &str = "X-Dev-User";
/// 生产模式认证头，值为 "Bearer <id_token>"
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 比赛结束后仍接受补录步数的宽限天数
pub const GRACE_DAYS: i64 = 2;
/// 单日步数上限
pub const MAX_DAILY_STEPS: u32 = 100_000;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "MEMBER")]
    Member,
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

/// 比赛生命周期状态，实践中单调前进，但客户端不强制只进不退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    Draft,
    Registration,
    Active,
    Ended,
    Archived,
}

impl CompetitionStatus {
    /// 全部状态，按生命周期顺序（筛选控件用）
    pub const ALL: [CompetitionStatus; 5] = [
        Self::Draft,
        Self::Registration,
        Self::Active,
        Self::Ended,
        Self::Archived,
    ];

    /// 从线上格式解析，未知值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Registration => "REGISTRATION",
            Self::Active => "ACTIVE",
            Self::Ended => "ENDED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// 只有 ACTIVE 状态接受步数提交
    pub fn accepts_steps(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// 加入与退出队伍在 REGISTRATION 和 ACTIVE 期间开放
    pub fn allows_membership_changes(&self) -> bool {
        matches!(self, Self::Registration | Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub comp_id: String,
    pub name: String,
    pub status: CompetitionStatus,
    /// IANA 时区，例如 "Europe/Bucharest"
    pub tz: String,
    pub registration_open_date: StepDate,
    pub start_date: StepDate,
    pub end_date: StepDate,
    pub max_teams: u32,
    pub max_members_per_team: u32,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Competition {
    /// 步数补录窗口的最后一天（结束日期 + 宽限期）
    pub fn grace_end_date(&self) -> StepDate {
        self.end_date.plus_days(GRACE_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub comp_id: String,
    pub name: String,
    pub owner_uid: String,
    /// 成员 uid 列表，队长隐含为成员
    #[serde(default)]
    pub members: Vec<String>,
}

impl Team {
    pub fn has_member(&self, uid: &str) -> bool {
        self.owner_uid == uid || self.members.iter().any(|m| m == uid)
    }

    pub fn is_full(&self, max_members_per_team: u32) -> bool {
        self.members.len() as u32 >= max_members_per_team
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProvider {
    Garmin,
    Fitbit,
    Virtual,
}

impl DeviceProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Garmin => "garmin",
            Self::Fitbit => "fitbit",
            Self::Virtual => "virtual",
        }
    }

    /// 展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Garmin => "Garmin",
            Self::Fitbit => "Fitbit",
            Self::Virtual => "Virtual Step Generator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub provider: DeviceProvider,
    /// ISO8601 绑定时间
    pub linked_at: String,
    /// 最近一次同步时间，从未同步则为 None
    #[serde(default)]
    pub last_sync: Option<String>,
}

/// 个人排行榜条目，排名由服务端计算，并列规则客户端不做假设
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualEntry {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub total_steps: u64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub team_id: String,
    pub name: String,
    pub total_steps: u64,
    pub rank: u32,
}

/// 单日步数记录（历史视图用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub date: StepDate,
    pub steps: u32,
    #[serde(default)]
    pub provider: Option<String>,
}

// =========================================================
// 分页 (Pagination)
// =========================================================

/// 后端统一的分页响应包络
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            page: 1,
            page_size: 0,
            total_pages: 0,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// 不分页的列表响应包络
///
/// `default` 必须给出显式路径，否则 derive 会给 `T` 附加
/// `Default` 约束，而行类型并不都实现它。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rows<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

// =========================================================
// 请求/响应载荷 (Request Payloads)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionCreateRequest {
    pub comp_id: String,
    pub name: String,
    pub tz: String,
    pub registration_open_date: StepDate,
    pub start_date: StepDate,
    pub end_date: StepDate,
    pub max_teams: u32,
    pub max_members_per_team: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompetitionStatus>,
}

/// PATCH 载荷：全部字段可选，comp_id 创建后不可变
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_open_date: Option<StepDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<StepDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<StepDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_teams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members_per_team: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompetitionStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCreateRequest {
    pub name: String,
    pub comp_id: String,
    pub owner_uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamJoinRequest {
    pub team_id: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRenameRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepIngestRequest {
    pub comp_id: String,
    pub date: StepDate,
    pub steps: u32,
    /// "manual" 或设备提供方标识
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualSyncRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<StepDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSyncResponse {
    pub provider: String,
    #[serde(default)]
    pub steps: u64,
    #[serde(default)]
    pub submitted_count: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fitbit 是标准 OAuth2 (code + state)；Garmin 走 OAuth1 风格的
/// token/verifier 对。交换统一经由后端完成，客户端不直连提供方。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OauthCallbackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_verifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OauthCallbackResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizeUrlResponse {
    pub authorization_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedCompetitionResponse {
    pub ok: bool,
    pub comp_id: String,
}

/// 后端错误包络：非 2xx 响应体中的 detail 字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // 行类型（Team 等）不实现 Default，包络也必须能解出来
    #[test]
    fn rows_envelope_decodes_for_non_default_row_types() {
        let body = r#"{"rows":[{"team_id":"t1","comp_id":"c1","name":"Alpha","owner_uid":"u1","members":["u1","u2"]}]}"#;
        let rows: Rows<Team> = serde_json_wasm::from_str(body).unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0].name, "Alpha");

        let empty: Rows<StepRecord> = serde_json_wasm::from_str("{}").unwrap();
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn grace_end_is_two_days_after_end() {
        let competition = Competition {
            comp_id: "c1".to_string(),
            name: "Test".to_string(),
            status: CompetitionStatus::Active,
            tz: "UTC".to_string(),
            registration_open_date: StepDate::parse("2025-01-01").unwrap(),
            start_date: StepDate::parse("2025-02-01").unwrap(),
            end_date: StepDate::parse("2025-03-01").unwrap(),
            max_teams: 10,
            max_members_per_team: 10,
            created_by: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(
            competition.grace_end_date(),
            StepDate::parse("2025-03-03").unwrap()
        );
    }
}

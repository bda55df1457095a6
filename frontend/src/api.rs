//! API 客户端模块
//!
//! 后端调用的唯一通道。统一负责：
//! - 每个请求恰好一个认证头（由会话网关产出）
//! - 非 2xx 的错误分类；401 清除凭证并触发会话失效回调
//! - GET 的一次网络级重试（写操作从不重试，避免重复提交）
//!
//! 请求不做取消：组件以"最后写入生效"的方式消费结果。

use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use stepsquad_shared::{
    AuthorizeUrlResponse, Competition, CompetitionCreateRequest, CompetitionStatus,
    CompetitionUpdateRequest, CreatedCompetitionResponse, DeviceListResponse, DeviceSyncResponse,
    IndividualEntry, OauthCallbackRequest, OauthCallbackResponse, OkResponse, Page, Rows,
    StepIngestRequest, StepRecord, Team, TeamCreateRequest, TeamEntry, TeamJoinRequest,
    TeamRenameRequest, User, VirtualSyncRequest,
};

use crate::error::{ApiError, classify};
use crate::provider::AuthFailure;
use crate::session::SessionGateway;
use crate::web::http::{HttpClient, HttpError, HttpMethod, HttpRequestBuilder, HttpResponse};

#[cfg(test)]
mod tests;

/// 比赛列表的可选筛选条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionFilter {
    pub status: Option<CompetitionStatus>,
    pub tz: Option<String>,
    pub search: Option<String>,
}

impl CompetitionFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tz.is_none() && self.search.is_none()
    }

    /// 追加在 page/page_size 之后的查询串片段，空筛选返回 ""。
    /// 同一片段也用作缓存键的一部分，保证不同筛选互不命中。
    pub fn query_suffix(&self) -> String {
        let mut suffix = String::new();
        if let Some(status) = self.status {
            suffix.push_str("&status=");
            suffix.push_str(status.as_str());
        }
        if let Some(tz) = &self.tz {
            suffix.push_str("&tz=");
            suffix.push_str(&encode_query_value(tz));
        }
        if let Some(search) = &self.search {
            suffix.push_str("&search=");
            suffix.push_str(&encode_query_value(search));
        }
        suffix
    }
}

/// 查询参数值的百分号编码（RFC 3986 unreserved 之外全部转义）
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// 每个请求都带 Content-Type 与恰好一个认证头，GET/DELETE 也不例外
fn request_builder(
    method: HttpMethod,
    url: &str,
    auth: &(&'static str, String),
) -> HttpRequestBuilder {
    HttpClient::request(method, url)
        .header("Content-Type", "application/json")
        .header(auth.0, &auth.1)
}

#[derive(Clone)]
pub struct StepSquadApi {
    base_url: String,
    gateway: Arc<SessionGateway>,
    /// 401 时触发：App 层据此把认证状态翻为未登录
    on_session_invalidated: Arc<dyn Fn() + Send + Sync>,
}

impl StepSquadApi {
    pub fn new(
        base_url: String,
        gateway: Arc<SessionGateway>,
        on_session_invalidated: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            gateway,
            on_session_invalidated,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 会话判死刑：清本地凭证并通知 App 层
    fn invalidate_session(&self) {
        self.gateway.clear_credentials();
        (self.on_session_invalidated)();
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        header: &(&'static str, String),
        body: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = request_builder(method, url, header);
        if let Some(body) = body {
            builder = builder.json_body(body.to_string());
        }
        builder.send().await
    }

    /// 核心发送逻辑，返回 2xx 的响应体文本
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let header = match self.gateway.auth_header().await {
            Ok(h) => h,
            Err(AuthFailure::Network(msg)) => {
                // 续期请求没出网不代表会话失效，保留凭证
                return Err(ApiError::Network(msg));
            }
            Err(_) => {
                self.invalidate_session();
                return Err(ApiError::Unauthorized);
            }
        };

        let url = self.url(path);
        let response = match self.dispatch(method, &url, &header, body.as_deref()).await {
            Ok(response) => response,
            Err(HttpError::NetworkError(first)) if method.is_idempotent_read() => {
                web_sys::console::log_1(
                    &format!("[Api] GET {} failed ({}), retrying once.", path, first).into(),
                );
                match self.dispatch(method, &url, &header, body.as_deref()).await {
                    Ok(response) => response,
                    Err(e) => return Err(map_http_error(e)),
                }
            }
            Err(e) => return Err(map_http_error(e)),
        };

        let status = response.status();
        let status_text = response.status_text();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        if (200..300).contains(&status) {
            return Ok(text);
        }
        if status == 401 {
            self.invalidate_session();
            return Err(ApiError::Unauthorized);
        }
        Err(classify(status, &status_text, &text))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(HttpMethod::Get, path, None).await?;
        parse_body(&text)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json_wasm::to_string(body)
            .map_err(|e| ApiError::Malformed(format!("request encoding: {}", e)))?;
        let text = self.send(method, path, Some(body)).await?;
        parse_body(&text)
    }

    // =========================================================
    // 用户
    // =========================================================

    /// 当前用户资料，同时充当会话有效性检查
    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.get_json("/api/users/me").await
    }

    // =========================================================
    // 比赛
    // =========================================================

    pub async fn list_competitions(
        &self,
        page: u32,
        page_size: u32,
        filter: &CompetitionFilter,
    ) -> Result<Page<Competition>, ApiError> {
        self.get_json(&format!(
            "/api/competitions?page={}&page_size={}{}",
            page,
            page_size,
            filter.query_suffix()
        ))
        .await
    }

    pub async fn get_competition(&self, comp_id: &str) -> Result<Competition, ApiError> {
        self.get_json(&format!("/api/competitions/{}", comp_id))
            .await
    }

    pub async fn create_competition(
        &self,
        req: &CompetitionCreateRequest,
    ) -> Result<CreatedCompetitionResponse, ApiError> {
        self.send_json(HttpMethod::Post, "/api/competitions", req)
            .await
    }

    pub async fn update_competition(
        &self,
        comp_id: &str,
        req: &CompetitionUpdateRequest,
    ) -> Result<OkResponse, ApiError> {
        self.send_json(
            HttpMethod::Patch,
            &format!("/api/competitions/{}", comp_id),
            req,
        )
        .await
    }

    pub async fn delete_competition(&self, comp_id: &str) -> Result<OkResponse, ApiError> {
        let text = self
            .send(
                HttpMethod::Delete,
                &format!("/api/competitions/{}", comp_id),
                None,
            )
            .await?;
        parse_body(&text)
    }

    // =========================================================
    // 队伍
    // =========================================================

    pub async fn list_teams(&self, comp_id: &str) -> Result<Vec<Team>, ApiError> {
        let rows: Rows<Team> = self
            .get_json(&format!("/api/teams?comp_id={}", comp_id))
            .await?;
        Ok(rows.rows)
    }

    pub async fn create_team(&self, req: &TeamCreateRequest) -> Result<Team, ApiError> {
        self.send_json(HttpMethod::Post, "/api/teams", req).await
    }

    pub async fn join_team(&self, req: &TeamJoinRequest) -> Result<OkResponse, ApiError> {
        self.send_json(HttpMethod::Post, "/api/teams/join", req)
            .await
    }

    pub async fn leave_team(&self, req: &TeamJoinRequest) -> Result<OkResponse, ApiError> {
        self.send_json(HttpMethod::Post, "/api/teams/leave", req)
            .await
    }

    pub async fn rename_team(
        &self,
        team_id: &str,
        req: &TeamRenameRequest,
    ) -> Result<OkResponse, ApiError> {
        self.send_json(HttpMethod::Patch, &format!("/api/teams/{}", team_id), req)
            .await
    }

    // =========================================================
    // 排行榜与步数
    // =========================================================

    pub async fn individual_leaderboard(
        &self,
        comp_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<IndividualEntry>, ApiError> {
        self.get_json(&format!(
            "/api/competitions/{}/leaderboard?page={}&page_size={}",
            comp_id, page, page_size
        ))
        .await
    }

    pub async fn team_leaderboard(&self, comp_id: &str) -> Result<Vec<TeamEntry>, ApiError> {
        let rows: Rows<TeamEntry> = self
            .get_json(&format!("/api/competitions/{}/leaderboard/teams", comp_id))
            .await?;
        Ok(rows.rows)
    }

    pub async fn submit_steps(&self, req: &StepIngestRequest) -> Result<OkResponse, ApiError> {
        self.send_json(HttpMethod::Post, "/api/steps", req).await
    }

    pub async fn my_steps(&self, comp_id: &str) -> Result<Vec<StepRecord>, ApiError> {
        let rows: Rows<StepRecord> = self
            .get_json(&format!("/api/steps/me?comp_id={}", comp_id))
            .await?;
        Ok(rows.rows)
    }

    // =========================================================
    // 设备
    // =========================================================

    pub async fn list_devices(&self) -> Result<DeviceListResponse, ApiError> {
        self.get_json("/api/devices").await
    }

    /// 取提供方授权页地址，随后整页跳转
    pub async fn device_authorize_url(
        &self,
        provider: &str,
    ) -> Result<AuthorizeUrlResponse, ApiError> {
        self.get_json(&format!("/api/devices/{}/authorize", provider))
            .await
    }

    /// 把回调参数原样转发给后端完成令牌交换
    pub async fn device_oauth_callback(
        &self,
        provider: &str,
        req: &OauthCallbackRequest,
    ) -> Result<OauthCallbackResponse, ApiError> {
        self.send_json(
            HttpMethod::Post,
            &format!("/api/devices/{}/callback", provider),
            req,
        )
        .await
    }

    pub async fn disconnect_device(&self, provider: &str) -> Result<OkResponse, ApiError> {
        let text = self
            .send(
                HttpMethod::Delete,
                &format!("/api/devices/{}", provider),
                None,
            )
            .await?;
        parse_body(&text)
    }

    /// 触发一次设备同步，虚拟设备可携带步数与日期
    pub async fn sync_device(
        &self,
        provider: &str,
        req: &VirtualSyncRequest,
    ) -> Result<DeviceSyncResponse, ApiError> {
        self.send_json(
            HttpMethod::Post,
            &format!("/api/devices/{}/sync", provider),
            req,
        )
        .await
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> StepSquadApi {
    use_context::<StepSquadApi>().expect("StepSquadApi should be provided")
}

fn map_http_error(e: HttpError) -> ApiError {
    match e {
        HttpError::NetworkError(msg) | HttpError::RequestBuildFailed(msg) => {
            ApiError::Network(msg)
        }
        HttpError::ResponseParseFailed(msg) => ApiError::Malformed(msg),
    }
}

/// 2xx 响应体必须匹配预期结构，否则按 Malformed 处理而不是
/// 把坏数据交给组件
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json_wasm::from_str(text).map_err(|e| ApiError::Malformed(e.to_string()))
}

//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、路径解析和守卫属性，便于在宿主环境下测试。

use std::fmt::Display;

#[cfg(test)]
mod tests;

/// 设备 OAuth 回调携带的查询参数
///
/// OAuth 2.0 (Fitbit) 使用 code/state，OAuth 1.0a (Garmin)
/// 使用 oauth_token/oauth_verifier，两套字段都保留原样转发给后端。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OauthParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
}

impl OauthParams {
    /// 两套授权参数一个都没有时，回调无法继续
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.oauth_token.is_none()
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页：比赛列表 (需要认证)
    #[default]
    Home,
    /// 登录页面
    Login,
    /// 新建比赛 (需要管理员)
    CompetitionNew,
    /// 编辑比赛 (需要管理员)
    CompetitionEdit(String),
    /// 比赛详情：排行榜、队伍、步数提交
    CompetitionDetail(String),
    /// 设备连接管理
    Devices,
    /// 设备 OAuth 授权回调，provider + 查询参数
    OauthCallback(String, OauthParams),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL（path 加可选的 "?query"）解析为路由枚举
    pub fn from_url(url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((p, q)) => (p, q),
            None => (url, ""),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["competitions", "new"] => Self::CompetitionNew,
            ["competitions", comp_id] => Self::CompetitionDetail(decode_component(comp_id)),
            ["competitions", comp_id, "edit"] => Self::CompetitionEdit(decode_component(comp_id)),
            ["devices"] => Self::Devices,
            ["auth", provider, "callback"] => {
                Self::OauthCallback(decode_component(provider), parse_oauth_query(query))
            }
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::CompetitionNew => "/competitions/new".to_string(),
            Self::CompetitionEdit(id) => format!("/competitions/{}/edit", id),
            Self::CompetitionDetail(id) => format!("/competitions/{}", id),
            Self::Devices => "/devices".to_string(),
            Self::OauthCallback(provider, _) => format!("/auth/{}/callback", provider),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    ///
    /// 除登录页外全部受保护。OAuth 回调也需要登录态，
    /// 否则无法把授权结果关联到用户。
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 解析查询字符串中与 OAuth 相关的键
fn parse_oauth_query(query: &str) -> OauthParams {
    let mut params = OauthParams::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, decode_component(v)),
            None => (pair, String::new()),
        };
        match key {
            "code" => params.code = Some(value),
            "state" => params.state = Some(value),
            "oauth_token" => params.oauth_token = Some(value),
            "oauth_verifier" => params.oauth_verifier = Some(value),
            _ => {}
        }
    }
    params
}

/// 百分号解码，'+' 按空格处理
///
/// 非法序列保留原文而不报错，回调参数最终由后端再次校验。
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            // 只按字节操作，'%' 后紧跟多字节字符时不能落回字符串切片
            b'%' => {
                let decoded = bytes
                    .get(i + 1)
                    .zip(bytes.get(i + 2))
                    .and_then(|(&hi, &lo)| Some((hex_digit(hi)? << 4) | hex_digit(lo)?));
                match decoded {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).unwrap_or_else(|_| s.to_string())
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

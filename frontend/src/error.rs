//! API 错误契约模块
//!
//! 所有后端调用的非 2xx 响应都经由 `classify` 归入统一的错误
//! 分类，组件只依赖分类而不是裸状态码。分类本身是纯函数，
//! 可在宿主环境下测试。

use stepsquad_shared::ApiErrorBody;

#[cfg(test)]
mod tests;

/// API 调用的统一错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401：凭证缺失或失效。调用方已清除本地凭证并触发会话失效回调
    Unauthorized,
    /// 403：已认证但权限不足，不影响会话
    Forbidden,
    /// 409：业务冲突（重复 ID、队伍满员等），携带服务端 detail
    Conflict(String),
    /// 2xx 但响应体无法按预期结构解析
    Malformed(String),
    /// 其他非 2xx 状态
    Http { status: u16, message: String },
    /// fetch 未得到任何响应（断网、CORS、DNS）
    Network(String),
}

impl ApiError {
    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden => "You do not have permission to perform this action.".to_string(),
            Self::Conflict(detail) => detail.clone(),
            Self::Malformed(_) => "The server returned an unexpected response.".to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Conflict(detail) => write!(f, "conflict: {}", detail),
            Self::Malformed(msg) => write!(f, "malformed response: {}", msg),
            Self::Http { status, message } => write!(f, "http {}: {}", status, message),
            Self::Network(msg) => write!(f, "network: {}", msg),
        }
    }
}

/// 将非 2xx 响应归类
///
/// 响应体若是 `{"detail": "..."}` 则取 detail 作为消息，
/// 否则回退到 "HTTP {status}: {reason}"。
pub fn classify(status: u16, status_text: &str, body: &str) -> ApiError {
    let detail = serde_json_wasm::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.detail);

    match status {
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden,
        409 => ApiError::Conflict(
            detail.unwrap_or_else(|| "Conflict with existing data".to_string()),
        ),
        _ => ApiError::Http {
            status,
            message: detail.unwrap_or_else(|| format!("HTTP {}: {}", status, status_text)),
        },
    }
}

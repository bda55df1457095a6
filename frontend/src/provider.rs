//! 身份提供方模块
//!
//! 生产模式下通过托管身份服务的 REST 接口换取 ID token：
//! 密码登录、注册和 refresh token 续期。trait 作为接缝注入
//! `SessionGateway`，宿主测试里用内存实现替代。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::web::HttpClient;

#[cfg(test)]
mod tests;

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// 一次成功认证换得的凭证
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTokens {
    pub id_token: String,
    pub refresh_token: String,
    pub email: Option<String>,
    /// ID token 有效期（秒）
    pub expires_in_secs: u64,
}

/// 身份服务的失败分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// 邮箱未注册。登录流程据此回退到注册
    UserNotFound,
    /// 密码错误
    WrongPassword,
    /// 账号被禁用
    UserDisabled,
    /// 尝试次数过多，稍后重试
    TooManyAttempts,
    /// 注册时邮箱已存在
    EmailExists,
    /// 密码强度不足，携带服务端说明
    WeakPassword(String),
    /// 邮箱格式无效
    InvalidEmail,
    /// 没有可用凭证（未登录或已清除）
    NotSignedIn,
    /// 请求未到达服务
    Network(String),
    /// 其他未归类错误
    Other(String),
}

impl AuthFailure {
    /// 登录/注册表单的提示文案
    pub fn user_message(&self) -> String {
        match self {
            Self::UserNotFound | Self::WrongPassword => {
                "Invalid email or password".to_string()
            }
            Self::UserDisabled => "This account has been disabled".to_string(),
            Self::TooManyAttempts => {
                "Too many attempts. Please try again later".to_string()
            }
            Self::EmailExists => "An account with this email already exists".to_string(),
            Self::WeakPassword(detail) => detail.clone(),
            Self::InvalidEmail => "Please enter a valid email address".to_string(),
            Self::NotSignedIn => "Please sign in to continue".to_string(),
            Self::Network(_) => "Network error. Please check your connection".to_string(),
            Self::Other(msg) => msg.clone(),
        }
    }
}

/// 把服务端错误码映射为失败分类
///
/// 消息形如 "WEAK_PASSWORD : Password should be at least 6 characters"，
/// 取第一个冒号前的码，冒号后的说明保留给 WeakPassword。
pub fn classify_identity_error(message: &str) -> AuthFailure {
    let (code, rest) = match message.split_once(':') {
        Some((c, r)) => (c.trim(), r.trim()),
        None => (message.trim(), ""),
    };

    match code {
        "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" => AuthFailure::UserNotFound,
        "INVALID_PASSWORD" => AuthFailure::WrongPassword,
        "USER_DISABLED" => AuthFailure::UserDisabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthFailure::TooManyAttempts,
        "EMAIL_EXISTS" => AuthFailure::EmailExists,
        "WEAK_PASSWORD" => AuthFailure::WeakPassword(if rest.is_empty() {
            "Password is too weak".to_string()
        } else {
            rest.to_string()
        }),
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthFailure::InvalidEmail,
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => AuthFailure::NotSignedIn,
        other => AuthFailure::Other(other.to_string()),
    }
}

/// 身份提供方接缝
///
/// 方法返回的 future 不要求 Send（在 `spawn_local` 上运行），
/// 但类型本身要求 Send + Sync 以便经 Context 跨闭包共享。
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityTokens, AuthFailure>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityTokens, AuthFailure>;
    async fn refresh(&self, refresh_token: &str) -> Result<IdentityTokens, AuthFailure>;
}

// =========================================================
// REST 实现
// =========================================================

#[derive(Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Deserialize)]
struct PasswordResponse {
    #[serde(rename = "idToken")]
    id_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(default)]
    email: Option<String>,
    /// 服务端返回字符串形式的秒数
    #[serde(rename = "expiresIn", default)]
    expires_in: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct IdentityErrorBody {
    error: IdentityErrorDetail,
}

#[derive(Deserialize)]
struct IdentityErrorDetail {
    message: String,
}

fn parse_expires(raw: Option<String>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(3600)
}

fn failure_from_body(body: &str) -> AuthFailure {
    match serde_json_wasm::from_str::<IdentityErrorBody>(body) {
        Ok(parsed) => classify_identity_error(&parsed.error.message),
        Err(_) => AuthFailure::Other("Authentication service returned an error".to_string()),
    }
}

/// 基于 REST 的身份提供方
pub struct RestIdentityProvider {
    api_key: String,
}

impl RestIdentityProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    async fn password_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<IdentityTokens, AuthFailure> {
        let url = format!("{}/accounts:{}?key={}", IDENTITY_BASE, action, self.api_key);
        let body = serde_json_wasm::to_string(&PasswordRequest {
            email,
            password,
            return_secure_token: true,
        })
        .map_err(|e| AuthFailure::Other(e.to_string()))?;

        let response = HttpClient::post(&url)
            .json_body(body)
            .send()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;

        let status_ok = response.ok();
        let text = response
            .text()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;

        if !status_ok {
            return Err(failure_from_body(&text));
        }

        let parsed: PasswordResponse = serde_json_wasm::from_str(&text)
            .map_err(|e| AuthFailure::Other(format!("unexpected auth response: {}", e)))?;
        Ok(IdentityTokens {
            id_token: parsed.id_token,
            refresh_token: parsed.refresh_token,
            email: parsed.email,
            expires_in_secs: parse_expires(parsed.expires_in),
        })
    }
}

#[async_trait(?Send)]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityTokens, AuthFailure> {
        self.password_call("signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityTokens, AuthFailure> {
        self.password_call("signUp", email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IdentityTokens, AuthFailure> {
        let url = format!("{}/token?key={}", TOKEN_BASE, self.api_key);
        let body = serde_json_wasm::to_string(&RefreshRequest {
            grant_type: "refresh_token",
            refresh_token,
        })
        .map_err(|e| AuthFailure::Other(e.to_string()))?;

        let response = HttpClient::post(&url)
            .json_body(body)
            .send()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;

        let status_ok = response.ok();
        let text = response
            .text()
            .await
            .map_err(|e| AuthFailure::Network(e.to_string()))?;

        if !status_ok {
            return Err(failure_from_body(&text));
        }

        let parsed: RefreshResponse = serde_json_wasm::from_str(&text)
            .map_err(|e| AuthFailure::Other(format!("unexpected token response: {}", e)))?;
        Ok(IdentityTokens {
            id_token: parsed.id_token,
            refresh_token: parsed.refresh_token,
            email: None,
            expires_in_secs: parse_expires(parsed.expires_in),
        })
    }
}

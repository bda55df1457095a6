//! 会话网关模块
//!
//! 管理登录凭证的唯一入口：登录（含注册回退）、凭证存取、
//! 注销，以及为每个 API 请求产出恰好一个认证头。
//! 开发模式用 X-Dev-User 标签头，生产模式用 Bearer ID token。
//!
//! 存储通过 `CredentialStore` 接缝注入，宿主测试用内存实现。

use std::sync::{Arc, Mutex, MutexGuard};

use stepsquad_shared::{HEADER_AUTHORIZATION, HEADER_DEV_USER};

use crate::provider::{AuthFailure, IdentityProvider, IdentityTokens};
use crate::web::storage::{KEY_ID_TOKEN, KEY_REFRESH_TOKEN, KEY_USER_EMAIL, LocalStorage};

#[cfg(test)]
mod tests;

/// 续期提前量：token 剩余有效期低于此值时视为过期
const EXPIRY_MARGIN_MS: f64 = 30.0 * 1000.0;

/// 凭证存储接缝
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// 浏览器 LocalStorage 实现
pub struct BrowserStore;

impl CredentialStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get(key)
    }

    fn set(&self, key: &str, value: &str) {
        LocalStorage::set(key, value);
    }

    fn delete(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// 当前毫秒时间戳
///
/// WASM 下走 `js_sys::Date::now`，宿主走系统时钟，便于测试。
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }
}

enum Mode {
    /// 开发模式：头的值是本地保存的邮箱标签
    DevTag,
    /// 生产模式：经提供方换取并续期 ID token
    Provider(Arc<dyn IdentityProvider>),
}

/// 内存中缓存的 ID token，避免每个请求都走一次续期
struct CachedToken {
    id_token: String,
    expires_at_ms: f64,
}

/// 会话网关
pub struct SessionGateway {
    mode: Mode,
    store: Arc<dyn CredentialStore>,
    cached: Mutex<Option<CachedToken>>,
}

impl SessionGateway {
    pub fn new_dev(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            mode: Mode::DevTag,
            store,
            cached: Mutex::new(None),
        }
    }

    pub fn new_with_provider(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            mode: Mode::Provider(provider),
            store,
            cached: Mutex::new(None),
        }
    }

    /// 单线程环境下锁不会真正竞争，毒化时直接取回内部值
    fn cached_token(&self) -> MutexGuard<'_, Option<CachedToken>> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 本地保存的邮箱（登录时写入）
    pub fn stored_email(&self) -> Option<String> {
        self.store.get(KEY_USER_EMAIL)
    }

    /// 是否存在可尝试的本地凭证
    ///
    /// 只说明"值得发起会话检查"，有效性由后端裁决。
    pub fn has_credentials(&self) -> bool {
        match &self.mode {
            Mode::DevTag => self.stored_email().is_some(),
            Mode::Provider(_) => {
                self.store.get(KEY_ID_TOKEN).is_some()
                    || self.store.get(KEY_REFRESH_TOKEN).is_some()
            }
        }
    }

    /// 清除全部本地凭证与缓存
    pub fn clear_credentials(&self) {
        self.store.delete(KEY_ID_TOKEN);
        self.store.delete(KEY_REFRESH_TOKEN);
        self.store.delete(KEY_USER_EMAIL);
        *self.cached_token() = None;
    }

    fn store_tokens(&self, tokens: &IdentityTokens, fallback_email: &str) {
        self.store.set(KEY_ID_TOKEN, &tokens.id_token);
        self.store.set(KEY_REFRESH_TOKEN, &tokens.refresh_token);
        let email = tokens.email.as_deref().unwrap_or(fallback_email);
        if !email.is_empty() {
            self.store.set(KEY_USER_EMAIL, email);
        }
        *self.cached_token() = Some(CachedToken {
            id_token: tokens.id_token.clone(),
            expires_at_ms: now_ms() + (tokens.expires_in_secs as f64) * 1000.0,
        });
    }

    /// 登录
    ///
    /// 生产模式先尝试密码登录，仅在"邮箱未注册"时回退为注册；
    /// 密码错误等其他失败原样返回，不会误创建账号。
    /// 返回登录成功的邮箱。
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthFailure> {
        match &self.mode {
            Mode::DevTag => {
                let email = email.trim();
                if email.is_empty() {
                    return Err(AuthFailure::InvalidEmail);
                }
                self.store.set(KEY_USER_EMAIL, email);
                Ok(email.to_string())
            }
            Mode::Provider(provider) => {
                let tokens = match provider.sign_in(email, password).await {
                    Ok(tokens) => tokens,
                    Err(AuthFailure::UserNotFound) => provider.sign_up(email, password).await?,
                    Err(e) => return Err(e),
                };
                self.store_tokens(&tokens, email);
                Ok(tokens.email.clone().unwrap_or_else(|| email.to_string()))
            }
        }
    }

    /// 注销：只清本地状态，不通知提供方
    pub fn logout(&self) {
        self.clear_credentials();
    }

    /// 为一个请求产出认证头 (名称, 值)
    ///
    /// 生产模式优先用未过期的缓存 token；过期则经 refresh token
    /// 续期；续期失败但本地还有旧 token 时，降级使用旧 token，
    /// 由后端的 401 做最终裁决。
    pub async fn auth_header(&self) -> Result<(&'static str, String), AuthFailure> {
        match &self.mode {
            Mode::DevTag => self
                .stored_email()
                .map(|email| (HEADER_DEV_USER, email))
                .ok_or(AuthFailure::NotSignedIn),
            Mode::Provider(provider) => {
                let fresh = self.cached_token().as_ref().and_then(|cached| {
                    (now_ms() + EXPIRY_MARGIN_MS < cached.expires_at_ms)
                        .then(|| cached.id_token.clone())
                });
                if let Some(token) = fresh {
                    return Ok((HEADER_AUTHORIZATION, bearer(&token)));
                }

                if let Some(refresh_token) = self.store.get(KEY_REFRESH_TOKEN) {
                    match provider.refresh(&refresh_token).await {
                        Ok(tokens) => {
                            self.store_tokens(&tokens, "");
                            return Ok((HEADER_AUTHORIZATION, bearer(&tokens.id_token)));
                        }
                        Err(e) => {
                            // 降级：续期失败不立即判死刑
                            if let Some(stored) = self.store.get(KEY_ID_TOKEN) {
                                return Ok((HEADER_AUTHORIZATION, bearer(&stored)));
                            }
                            return Err(e);
                        }
                    }
                }

                self.store
                    .get(KEY_ID_TOKEN)
                    .map(|token| (HEADER_AUTHORIZATION, bearer(&token)))
                    .ok_or(AuthFailure::NotSignedIn)
            }
        }
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// 从 Context 获取会话网关
pub fn use_gateway() -> Arc<SessionGateway> {
    leptos::prelude::use_context::<Arc<SessionGateway>>()
        .expect("SessionGateway should be provided")
}

//! 认证状态模块
//!
//! 管理"当前用户是谁"的响应式状态，与路由系统解耦：
//! 路由服务只消费注入的认证信号。凭证本身由 `session` 模块负责，
//! 这里只持有后端确认过的用户资料。

use std::sync::Arc;

use leptos::prelude::*;
use stepsquad_shared::User;

use crate::api::StepSquadApi;
use crate::cache::QueryCache;
use crate::error::ApiError;
use crate::session::SessionGateway;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 后端确认的用户资料，None 表示未登录
    pub user: Option<User>,
    /// 初始会话检查是否仍在进行
    pub is_loading: bool,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始处于"会话检查中"
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            user: None,
            is_loading: true,
        });
        Self { state, set_state }
    }

    /// 认证信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.is_some()))
    }

    /// 会话检查完成信号
    pub fn auth_ready_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| !s.is_loading))
    }

    /// 管理员信号（第二道门禁，由页面而非路由消费）
    pub fn is_admin_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || {
            state.with(|s| s.user.as_ref().map(|u| u.is_admin()).unwrap_or(false))
        })
    }

    fn set_user(&self, user: Option<User>) {
        self.set_state.update(|s| {
            s.user = user;
            s.is_loading = false;
        });
    }

    /// 会话失效回调（API 客户端在 401 时触发）
    pub fn on_session_invalidated(&self) {
        self.set_user(None);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时的会话检查
///
/// 本地有凭证则向后端要用户资料确认会话有效；凭证缺失或
/// 被 401 判死刑都落到未登录。网络故障时同样按未登录渲染，
/// 但保留凭证，刷新页面可重试。
pub async fn check_session(ctx: AuthContext, api: StepSquadApi, gateway: Arc<SessionGateway>) {
    if !gateway.has_credentials() {
        ctx.set_user(None);
        return;
    }

    match api.get_me().await {
        Ok(user) => ctx.set_user(Some(user)),
        Err(ApiError::Network(msg)) => {
            web_sys::console::log_1(
                &format!("[Auth] Session check unreachable: {}", msg).into(),
            );
            ctx.set_user(None);
        }
        Err(_) => ctx.set_user(None),
    }
}

/// 登录并拉取用户资料
///
/// # Returns
/// 失败时返回面向用户的错误文案
pub async fn login(
    ctx: AuthContext,
    api: StepSquadApi,
    gateway: Arc<SessionGateway>,
    email: String,
    password: String,
) -> Result<(), String> {
    gateway
        .login(&email, &password)
        .await
        .map_err(|e| e.user_message())?;

    match api.get_me().await {
        Ok(user) => {
            ctx.set_user(Some(user));
            Ok(())
        }
        Err(e) => {
            // 拿到了凭证却换不来资料，视为登录失败并回滚
            gateway.clear_credentials();
            Err(e.user_message())
        }
    }
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: AuthContext, gateway: &SessionGateway, cache: &QueryCache) {
    gateway.logout();
    cache.clear();
    ctx.set_user(None);
}

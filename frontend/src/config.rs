//! 应用配置模块
//!
//! 所有配置在编译期通过环境变量注入（Trunk/cargo 构建时设置），
//! 运行时没有配置文件。未设置时使用本地开发默认值。

/// 认证模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 开发模式：请求带 X-Dev-User 头，值为本地保存的邮箱标签
    DevTag,
    /// 生产模式：经身份提供方换取 ID token，请求带 Bearer 头
    Provider,
}

/// 后端 API 基地址，末尾斜杠会被去除
pub fn api_base_url() -> String {
    option_env!("STEPSQUAD_API_BASE_URL")
        .unwrap_or("http://localhost:8080")
        .trim_end_matches('/')
        .to_string()
}

/// 身份提供方的 Web API key，生产模式必需
pub fn identity_api_key() -> Option<&'static str> {
    match option_env!("STEPSQUAD_IDENTITY_API_KEY") {
        Some(key) if !key.is_empty() => Some(key),
        _ => None,
    }
}

/// 当前认证模式
///
/// 显式设置 STEPSQUAD_USE_DEV_AUTH 或缺少 API key 时走开发模式。
pub fn auth_mode() -> AuthMode {
    let dev_flag = matches!(
        option_env!("STEPSQUAD_USE_DEV_AUTH"),
        Some("1") | Some("true")
    );
    if dev_flag || identity_api_key().is_none() {
        AuthMode::DevTag
    } else {
        AuthMode::Provider
    }
}

/// 开发模式登录框的预填邮箱
pub fn dev_default_email() -> &'static str {
    option_env!("STEPSQUAD_DEV_EMAIL").unwrap_or("admin@stepsquad.club")
}

/// 分析埋点的 measurement id，未配置则埋点全部为 no-op
pub fn ga_measurement_id() -> Option<&'static str> {
    match option_env!("STEPSQUAD_GA_MEASUREMENT_ID") {
        Some(id) if !id.is_empty() => Some(id),
        _ => None,
    }
}

use super::*;
use futures::executor::block_on;
use std::collections::HashMap;

struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            values: Mutex::new(HashMap::new()),
        })
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn delete(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// 脚本化的提供方：记录调用并按预设返回
struct MockProvider {
    sign_in_result: Result<IdentityTokens, AuthFailure>,
    sign_up_result: Result<IdentityTokens, AuthFailure>,
    refresh_result: Result<IdentityTokens, AuthFailure>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            sign_in_result: Err(AuthFailure::Other("unset".into())),
            sign_up_result: Err(AuthFailure::Other("unset".into())),
            refresh_result: Err(AuthFailure::Other("unset".into())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

fn tokens(id: &str) -> IdentityTokens {
    IdentityTokens {
        id_token: id.to_string(),
        refresh_token: format!("refresh-{}", id),
        email: Some("runner@example.com".to_string()),
        expires_in_secs: 3600,
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for MockProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<IdentityTokens, AuthFailure> {
        self.calls.lock().unwrap().push("sign_in");
        self.sign_in_result.clone()
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<IdentityTokens, AuthFailure> {
        self.calls.lock().unwrap().push("sign_up");
        self.sign_up_result.clone()
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<IdentityTokens, AuthFailure> {
        self.calls.lock().unwrap().push("refresh");
        self.refresh_result.clone()
    }
}

fn gateway_with(provider: MockProvider) -> (SessionGateway, Arc<MemoryStore>) {
    let store = MemoryStore::new();
    let gateway = SessionGateway::new_with_provider(Arc::new(provider), store.clone());
    (gateway, store)
}

// =========================================================
// 登录
// =========================================================

#[test]
fn login_stores_tokens_and_email() {
    let mut provider = MockProvider::new();
    provider.sign_in_result = Ok(tokens("t1"));
    let (gateway, store) = gateway_with(provider);

    let email = block_on(gateway.login("runner@example.com", "pw")).unwrap();
    assert_eq!(email, "runner@example.com");
    assert_eq!(store.get(KEY_ID_TOKEN).as_deref(), Some("t1"));
    assert_eq!(store.get(KEY_REFRESH_TOKEN).as_deref(), Some("refresh-t1"));
    assert_eq!(
        store.get(KEY_USER_EMAIL).as_deref(),
        Some("runner@example.com")
    );
    assert!(gateway.has_credentials());
}

#[test]
fn login_falls_back_to_sign_up_only_for_unknown_email() {
    let mut provider = MockProvider::new();
    provider.sign_in_result = Err(AuthFailure::UserNotFound);
    provider.sign_up_result = Ok(tokens("fresh"));
    let store = MemoryStore::new();
    let provider = Arc::new(provider);
    let gateway = SessionGateway::new_with_provider(provider.clone(), store.clone());

    block_on(gateway.login("new@example.com", "pw")).unwrap();
    assert_eq!(&*provider.calls.lock().unwrap(), &["sign_in", "sign_up"]);
    assert_eq!(store.get(KEY_ID_TOKEN).as_deref(), Some("fresh"));
}

#[test]
fn wrong_password_does_not_trigger_sign_up() {
    let mut provider = MockProvider::new();
    provider.sign_in_result = Err(AuthFailure::WrongPassword);
    let store = MemoryStore::new();
    let provider = Arc::new(provider);
    let gateway = SessionGateway::new_with_provider(provider.clone(), store.clone());

    let err = block_on(gateway.login("runner@example.com", "bad")).unwrap_err();
    assert_eq!(err, AuthFailure::WrongPassword);
    assert_eq!(&*provider.calls.lock().unwrap(), &["sign_in"]);
    assert!(store.get(KEY_ID_TOKEN).is_none());
}

// =========================================================
// 认证头
// =========================================================

#[test]
fn dev_mode_uses_tag_header() {
    let store = MemoryStore::new();
    let gateway = SessionGateway::new_dev(store.clone());
    assert!(!gateway.has_credentials());

    block_on(gateway.login("dev@example.com", "")).unwrap();
    let (name, value) = block_on(gateway.auth_header()).unwrap();
    assert_eq!(name, stepsquad_shared::HEADER_DEV_USER);
    assert_eq!(value, "dev@example.com");
}

#[test]
fn cached_token_is_reused_without_refresh() {
    let mut provider = MockProvider::new();
    provider.sign_in_result = Ok(tokens("live"));
    let store = MemoryStore::new();
    let provider = Arc::new(provider);
    let gateway = SessionGateway::new_with_provider(provider.clone(), store);

    block_on(gateway.login("runner@example.com", "pw")).unwrap();
    let (name, value) = block_on(gateway.auth_header()).unwrap();
    assert_eq!(name, stepsquad_shared::HEADER_AUTHORIZATION);
    assert_eq!(value, "Bearer live");
    // 登录后的缓存仍有效，没有触发 refresh
    assert_eq!(&*provider.calls.lock().unwrap(), &["sign_in"]);
}

#[test]
fn refresh_runs_when_no_cached_token() {
    let mut provider = MockProvider::new();
    provider.refresh_result = Ok(tokens("renewed"));
    let (gateway, store) = gateway_with(provider);
    store.set(KEY_REFRESH_TOKEN, "old-refresh");

    let (_, value) = block_on(gateway.auth_header()).unwrap();
    assert_eq!(value, "Bearer renewed");
    // 续期结果回写存储
    assert_eq!(store.get(KEY_ID_TOKEN).as_deref(), Some("renewed"));
}

#[test]
fn refresh_failure_falls_back_to_stored_token() {
    let mut provider = MockProvider::new();
    provider.refresh_result = Err(AuthFailure::Network("offline".into()));
    let (gateway, store) = gateway_with(provider);
    store.set(KEY_REFRESH_TOKEN, "old-refresh");
    store.set(KEY_ID_TOKEN, "stale-but-present");

    let (_, value) = block_on(gateway.auth_header()).unwrap();
    assert_eq!(value, "Bearer stale-but-present");
}

#[test]
fn refresh_failure_without_stored_token_propagates() {
    let mut provider = MockProvider::new();
    provider.refresh_result = Err(AuthFailure::NotSignedIn);
    let (gateway, store) = gateway_with(provider);
    store.set(KEY_REFRESH_TOKEN, "revoked");

    let err = block_on(gateway.auth_header()).unwrap_err();
    assert_eq!(err, AuthFailure::NotSignedIn);
}

#[test]
fn missing_credentials_mean_not_signed_in() {
    let provider = MockProvider::new();
    let (gateway, _store) = gateway_with(provider);
    assert_eq!(
        block_on(gateway.auth_header()).unwrap_err(),
        AuthFailure::NotSignedIn
    );
}

#[test]
fn logout_clears_everything() {
    let mut provider = MockProvider::new();
    provider.sign_in_result = Ok(tokens("t1"));
    let (gateway, store) = gateway_with(provider);

    block_on(gateway.login("runner@example.com", "pw")).unwrap();
    gateway.logout();

    assert!(!gateway.has_credentials());
    assert!(store.get(KEY_ID_TOKEN).is_none());
    assert!(store.get(KEY_REFRESH_TOKEN).is_none());
    assert!(store.get(KEY_USER_EMAIL).is_none());
    assert_eq!(
        block_on(gateway.auth_header()).unwrap_err(),
        AuthFailure::NotSignedIn
    );
}

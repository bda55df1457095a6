//! 查询缓存模块
//!
//! 按资源键缓存 GET 响应（以 JSON 文本形式），写操作成功后按
//! 前缀失效。超过 5 分钟的条目视为过期，命中时忽略并重新拉取。
//! `CacheStore` 是纯数据结构，时间由调用方传入，便于宿主测试；
//! `QueryCache` 在其上包一层共享锁与版本信号驱动组件重新加载。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::now_ms;

#[cfg(test)]
mod tests;

/// 缓存条目的最大可用时长
pub const STALE_AFTER_MS: f64 = 5.0 * 60.0 * 1000.0;

/// 条目是否仍然新鲜
///
/// 时钟回拨时（now 早于写入时间）同样按过期处理。
pub fn is_fresh(fetched_at_ms: f64, now_ms: f64) -> bool {
    let age = now_ms - fetched_at_ms;
    (0.0..STALE_AFTER_MS).contains(&age)
}

struct Entry {
    json: String,
    fetched_at_ms: f64,
}

/// 纯缓存存储，键为资源路径风格的字符串
#[derive(Default)]
pub struct CacheStore {
    entries: HashMap<String, Entry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, json: String, now_ms: f64) {
        self.entries.insert(
            key.to_string(),
            Entry {
                json,
                fetched_at_ms: now_ms,
            },
        );
    }

    /// 取新鲜条目；过期条目顺手清除
    pub fn get_fresh(&mut self, key: &str, now_ms: f64) -> Option<&str> {
        let fresh = match self.entries.get(key) {
            Some(entry) => is_fresh(entry.fetched_at_ms, now_ms),
            None => return None,
        };
        if !fresh {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| e.json.as_str())
    }

    /// 按前缀删除，返回删除数量
    pub fn remove_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 组件层使用的响应式缓存
#[derive(Clone)]
pub struct QueryCache {
    store: Arc<Mutex<CacheStore>>,
    version: RwSignal<u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new())),
            version: RwSignal::new(0),
        }
    }

    // 单线程环境下锁不会真正竞争，毒化时直接取回内部值
    fn store(&self) -> MutexGuard<'_, CacheStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 读取新鲜的缓存值并反序列化，miss 或过期返回 None
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut store = self.store();
        let json = store.get_fresh(key, now_ms())?;
        serde_json_wasm::from_str(json).ok()
    }

    /// 写入一次成功的 GET 结果
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(json) = serde_json_wasm::to_string(value) {
            self.store().insert(key, json, now_ms());
        }
    }

    /// 按前缀失效并通知订阅者重新加载
    pub fn invalidate(&self, prefix: &str) {
        self.store().remove_prefix(prefix);
        self.version.update(|v| *v += 1);
    }

    /// 清空全部缓存（登出时）
    pub fn clear(&self) {
        self.store().clear();
        self.version.update(|v| *v += 1);
    }

    /// 在 Effect 内调用以订阅失效事件
    pub fn track(&self) {
        self.version.track();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取查询缓存
pub fn use_cache() -> QueryCache {
    use_context::<QueryCache>().expect("QueryCache should be provided")
}

/// 资源键构造，集中定义避免各组件拼错前缀
pub mod keys {
    /// `filter` 为 CompetitionFilter::query_suffix 产出的片段，
    /// 不同筛选条件各占一个缓存条目
    pub fn competitions_page(page: u32, filter: &str) -> String {
        format!("competitions?page={}{}", page, filter)
    }

    pub fn competition(comp_id: &str) -> String {
        format!("competitions/{}", comp_id)
    }

    pub fn teams(comp_id: &str) -> String {
        format!("teams/{}", comp_id)
    }

    pub fn leaderboard_page(comp_id: &str, page: u32) -> String {
        format!("leaderboard/{}?page={}", comp_id, page)
    }

    pub fn team_leaderboard(comp_id: &str) -> String {
        format!("leaderboard/{}/teams", comp_id)
    }

    pub fn my_steps(comp_id: &str) -> String {
        format!("steps/{}", comp_id)
    }

    pub fn devices() -> String {
        "devices".to_string()
    }
}

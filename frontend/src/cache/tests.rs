use super::*;

const T0: f64 = 1_000_000.0;

#[test]
fn freshness_window_is_five_minutes() {
    assert!(is_fresh(T0, T0));
    assert!(is_fresh(T0, T0 + STALE_AFTER_MS - 1.0));
    assert!(!is_fresh(T0, T0 + STALE_AFTER_MS));
    assert!(!is_fresh(T0, T0 + STALE_AFTER_MS + 1.0));
}

#[test]
fn clock_rollback_counts_as_stale() {
    assert!(!is_fresh(T0, T0 - 1.0));
}

#[test]
fn fresh_entries_are_returned() {
    let mut store = CacheStore::new();
    store.insert("competitions?page=1", r#"{"rows":[]}"#.to_string(), T0);
    assert_eq!(
        store.get_fresh("competitions?page=1", T0 + 1_000.0),
        Some(r#"{"rows":[]}"#)
    );
}

#[test]
fn stale_entries_are_evicted_on_read() {
    let mut store = CacheStore::new();
    store.insert("devices", "{}".to_string(), T0);
    assert!(store.get_fresh("devices", T0 + STALE_AFTER_MS).is_none());
    // 过期读取后条目已被移除
    assert!(store.is_empty());
}

#[test]
fn reinsert_resets_freshness() {
    let mut store = CacheStore::new();
    store.insert("me", "a".to_string(), T0);
    store.insert("me", "b".to_string(), T0 + STALE_AFTER_MS);
    assert_eq!(store.get_fresh("me", T0 + STALE_AFTER_MS + 1.0), Some("b"));
}

#[test]
fn prefix_invalidation_hits_pages_and_details() {
    let mut store = CacheStore::new();
    store.insert(&keys::competitions_page(1, ""), "p1".to_string(), T0);
    store.insert(
        &keys::competitions_page(1, "&status=ACTIVE"),
        "p1f".to_string(),
        T0,
    );
    store.insert(&keys::competitions_page(2, ""), "p2".to_string(), T0);
    store.insert(&keys::competition("e2e-1"), "c".to_string(), T0);
    store.insert(&keys::devices(), "d".to_string(), T0);

    assert_eq!(store.remove_prefix("competitions"), 4);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_fresh(&keys::devices(), T0), Some("d"));
}

#[test]
fn team_and_leaderboard_keys_share_competition_scope() {
    // 队伍变更会影响两种排行榜，键设计保证一个前缀就能全部失效
    assert!(keys::leaderboard_page("e2e-1", 1).starts_with("leaderboard/e2e-1"));
    assert!(keys::team_leaderboard("e2e-1").starts_with("leaderboard/e2e-1"));
    assert!(keys::teams("e2e-1").starts_with("teams/e2e-1"));
}

#[test]
fn clear_removes_everything() {
    let mut store = CacheStore::new();
    store.insert("a", "1".to_string(), T0);
    store.insert("b", "2".to_string(), T0);
    store.clear();
    assert!(store.is_empty());
}

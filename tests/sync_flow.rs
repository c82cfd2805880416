//! End-to-end tests for the synchronization engine
//!
//! These drive the full apply/remove/verify surface over the in-memory
//! mock browser and preset store. Run with: `cargo test --test sync_flow`

use std::sync::Arc;

use tabset::{
    CookieStore, MemoryPresetStore, MockBrowser, MockBrowserConfig, Preset, SetCookieParams,
    Setting, SettingKind, SyncConfig, SyncEngine, TabId,
};

const TAB: TabId = TabId(1);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

fn engine(browser: &MockBrowser, store: &MemoryPresetStore) -> SyncEngine {
    SyncEngine::new(
        Arc::new(browser.clone()),
        Arc::new(browser.clone()),
        Arc::new(browser.clone()),
        Arc::new(store.clone()),
    )
    .with_config(SyncConfig::immediate())
}

fn setup(url: &str) -> (MockBrowser, MemoryPresetStore, SyncEngine) {
    init_tracing();
    let browser = MockBrowser::new();
    browser.insert_tab(TAB, url);
    let store = MemoryPresetStore::new();
    let eng = engine(&browser, &store);
    (browser, store, eng)
}

#[tokio::test]
async fn query_only_preset_triggers_exactly_one_navigation() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset = Preset::new("flags")
        .with_setting(Setting::new(SettingKind::QueryParam, "a", "1"))
        .with_setting(Setting::new(SettingKind::QueryParam, "b", "2"))
        .with_setting(Setting::new(SettingKind::QueryParam, "c", "3"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);

    assert_eq!(browser.navigation_count(), 1);
    assert_eq!(
        browser.tab_url(TAB).as_deref(),
        Some("https://x.com/?a=1&b=2&c=3")
    );
}

#[tokio::test]
async fn mixed_preset_applies_query_then_cookie() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset = Preset::new("p1")
        .with_setting(Setting::new(SettingKind::QueryParam, "debug", "true"))
        .with_setting(Setting::new(SettingKind::Cookie, "session", "abc"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);

    assert_eq!(
        browser.tab_url(TAB).as_deref(),
        Some("https://x.com/?debug=true")
    );
    assert_eq!(
        browser.cookie_value("https://x.com", "session").as_deref(),
        Some("abc")
    );
    assert_eq!(browser.navigation_count(), 1);
    assert_eq!(browser.cookie_set_count(), 1);
}

#[tokio::test]
async fn local_entries_round_trip_through_the_page() {
    let (browser, store, engine) = setup("https://x.com/app");
    let preset = Preset::new("theme")
        .with_setting(Setting::new(SettingKind::LocalEntry, "theme", "dark"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);
    assert_eq!(browser.storage_value(TAB, "theme").as_deref(), Some("dark"));

    assert!(engine.remove_preset(TAB, id).await);
    assert!(browser.storage_value(TAB, "theme").is_none());
}

#[tokio::test]
async fn missing_preset_is_terminal_false() {
    let (_browser, _store, engine) = setup("https://x.com/");
    assert!(!engine.apply_preset(TAB, uuid::Uuid::new_v4()).await);
    assert!(!engine.remove_preset(TAB, uuid::Uuid::new_v4()).await);
}

#[tokio::test]
async fn remove_preset_is_idempotent() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset = Preset::new("p")
        .with_setting(Setting::new(SettingKind::QueryParam, "debug", "true"))
        .with_setting(Setting::new(SettingKind::Cookie, "session", "abc"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);
    assert!(engine.remove_preset(TAB, id).await);
    assert_eq!(browser.navigation_count(), 2);
    assert!(browser.cookie_value("https://x.com", "session").is_none());

    // Second removal succeeds without mutating anything further.
    assert!(engine.remove_preset(TAB, id).await);
    assert_eq!(browser.navigation_count(), 2);
    assert_eq!(browser.tab_url(TAB).as_deref(), Some("https://x.com/"));
}

#[tokio::test]
async fn removal_preserves_settings_claimed_by_other_active_presets() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset_a = Preset::new("a").with_setting(Setting::new(SettingKind::Cookie, "s", "1"));
    let preset_b = Preset::new("b").with_setting(Setting::new(SettingKind::Cookie, "s", "2"));
    let (id_a, id_b) = (preset_a.id, preset_b.id);
    store.insert(preset_a);
    store.insert(preset_b);

    assert!(engine.apply_preset(TAB, id_a).await);
    store.set_active(TAB, id_a);
    assert!(engine.apply_preset(TAB, id_b).await);
    store.set_active(TAB, id_b);
    assert_eq!(browser.cookie_value("https://x.com", "s").as_deref(), Some("2"));

    // B still claims (cookie, "s"), so removing A must leave it alone.
    assert!(engine.remove_preset(TAB, id_a).await);
    store.clear_active(TAB, id_a);
    assert_eq!(browser.cookie_value("https://x.com", "s").as_deref(), Some("2"));

    // With A gone, removing B has no claimants left and strips the cookie.
    assert!(engine.remove_preset(TAB, id_b).await);
    store.clear_active(TAB, id_b);
    assert!(browser.cookie_value("https://x.com", "s").is_none());
}

#[tokio::test]
async fn partial_failure_keeps_applied_settings_and_reports_false() {
    init_tracing();
    let browser = MockBrowser::new().with_config(MockBrowserConfig::default().failing_cookies());
    browser.insert_tab(TAB, "https://x.com/");
    let store = MemoryPresetStore::new();
    let engine = engine(&browser, &store);

    let preset = Preset::new("p")
        .with_setting(Setting::new(SettingKind::QueryParam, "debug", "true"))
        .with_setting(Setting::new(SettingKind::Cookie, "session", "abc"));
    let id = preset.id;
    store.insert(preset);

    // Cookie apply fails; the query parameter stays applied regardless.
    assert!(!engine.apply_preset(TAB, id).await);
    assert_eq!(
        browser.tab_url(TAB).as_deref(),
        Some("https://x.com/?debug=true")
    );
}

#[tokio::test]
async fn restricted_tab_swallows_errors_into_false() {
    init_tracing();
    let browser = MockBrowser::new();
    browser.insert_restricted_tab(TAB);
    let store = MemoryPresetStore::new();
    let engine = engine(&browser, &store);

    let setting = Setting::new(SettingKind::QueryParam, "debug", "true");
    assert!(!engine.apply_parameter(TAB, &setting).await);
    assert!(!engine.verify_parameter(TAB, &setting).await);
}

#[tokio::test]
async fn verify_preset_reports_per_setting_results() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset = Preset::new("p")
        .with_setting(Setting::new(SettingKind::QueryParam, "debug", "true"))
        .with_setting(Setting::new(SettingKind::Cookie, "session", "abc"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);
    let verification = engine.verify_preset(TAB, id).await;
    assert!(verification.all_verified);
    assert_eq!(verification.results.len(), 2);

    // Drift the cookie out from under the preset; only that check fails.
    CookieStore::set(
        &browser,
        SetCookieParams::scoped("https://x.com", "session", "drifted"),
    )
    .await
    .unwrap();
    let verification = engine.verify_preset(TAB, id).await;
    assert!(!verification.all_verified);
    let failed: Vec<_> = verification
        .results
        .iter()
        .filter(|r| !r.verified)
        .map(|r| r.setting.key.as_str())
        .collect();
    assert_eq!(failed, ["session"]);
}

#[tokio::test]
async fn verify_preset_on_missing_id_returns_empty_result() {
    let (_browser, _store, engine) = setup("https://x.com/");
    let verification = engine.verify_preset(TAB, uuid::Uuid::new_v4()).await;
    assert!(!verification.all_verified);
    assert!(verification.results.is_empty());
}

#[tokio::test]
async fn sync_parameter_retries_exactly_once_on_mismatch() {
    init_tracing();
    // First read-back misses, simulating slow cookie propagation.
    let browser =
        MockBrowser::new().with_config(MockBrowserConfig::default().with_flaky_reads(1));
    browser.insert_tab(TAB, "https://x.com/");
    let store = MemoryPresetStore::new();
    let engine = engine(&browser, &store);

    let setting = Setting::new(SettingKind::Cookie, "session", "abc");
    assert!(engine.sync_parameter(TAB, &setting).await);

    // Applied twice: the initial attempt and the single retry.
    assert_eq!(browser.cookie_set_count(), 2);
}

#[tokio::test]
async fn sync_parameter_gives_up_after_the_single_retry() {
    init_tracing();
    // Every read-back misses; the second verification decides, negatively.
    let browser =
        MockBrowser::new().with_config(MockBrowserConfig::default().with_flaky_reads(10));
    browser.insert_tab(TAB, "https://x.com/");
    let store = MemoryPresetStore::new();
    let engine = engine(&browser, &store);

    let setting = Setting::new(SettingKind::Cookie, "session", "abc");
    assert!(!engine.sync_parameter(TAB, &setting).await);
    assert_eq!(browser.cookie_set_count(), 2);
}

#[tokio::test]
async fn sync_parameter_skips_retry_when_initial_apply_fails() {
    init_tracing();
    let browser = MockBrowser::new().with_config(MockBrowserConfig::default().failing_cookies());
    browser.insert_tab(TAB, "https://x.com/");
    let store = MemoryPresetStore::new();
    let engine = engine(&browser, &store);

    let setting = Setting::new(SettingKind::Cookie, "session", "abc");
    assert!(!engine.sync_parameter(TAB, &setting).await);
    assert_eq!(browser.cookie_set_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn delays_are_real_suspension_points() {
    // Default 200ms/100ms delays, auto-advanced by paused time; the call
    // still runs through both sleeps rather than collapsing them.
    let browser = MockBrowser::new();
    browser.insert_tab(TAB, "https://x.com/");
    let store = MemoryPresetStore::new();
    let engine = SyncEngine::new(
        Arc::new(browser.clone()),
        Arc::new(browser.clone()),
        Arc::new(browser.clone()),
        Arc::new(store.clone()),
    );

    let start = tokio::time::Instant::now();
    let setting = Setting::new(SettingKind::QueryParam, "debug", "true");
    assert!(engine.apply_parameter(TAB, &setting).await);
    assert!(start.elapsed() >= engine.config().settle_delay);
}

#[tokio::test]
async fn duplicate_pairs_apply_in_order_last_write_wins() {
    let (browser, store, engine) = setup("https://x.com/");
    let preset = Preset::new("dup")
        .with_setting(Setting::new(SettingKind::QueryParam, "env", "dev"))
        .with_setting(Setting::new(SettingKind::QueryParam, "env", "prod"));
    let id = preset.id;
    store.insert(preset);

    assert!(engine.apply_preset(TAB, id).await);
    assert_eq!(browser.navigation_count(), 1);
    assert_eq!(browser.tab_url(TAB).as_deref(), Some("https://x.com/?env=prod"));
}

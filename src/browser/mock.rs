//! Mock browser for deterministic testing
//!
//! Implements [`TabProvider`], [`CookieStore`], and [`ScriptExecutor`] over
//! in-memory state so the sync engine can be exercised without a real
//! browser. Failure injection and call counters let tests assert on
//! batching, retry, and error-swallowing behavior.
//!
//! # Example
//! ```
//! use tabset::browser::{MockBrowser, MockBrowserConfig, TabId};
//!
//! let browser = MockBrowser::new()
//!     .with_config(MockBrowserConfig::default().with_flaky_reads(1));
//! browser.insert_tab(TabId(1), "https://example.com/");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::browser::cookies::{Cookie, CookieStore, CookieTarget, SetCookieParams};
use crate::browser::error::BrowserError;
use crate::browser::scripting::{PageScript, ScriptExecutor};
use crate::browser::tabs::{Tab, TabId, TabProvider};

/// Configuration for mock browser behavior
#[derive(Clone, Default)]
pub struct MockBrowserConfig {
    /// Whether navigation calls should fail
    pub fail_navigation: bool,
    /// Whether cookie calls should fail
    pub fail_cookies: bool,
    /// Whether script calls should fail
    pub fail_scripts: bool,
    /// Number of leading cookie/storage reads that report no value,
    /// simulating slow write propagation. Consumed one per read.
    pub flaky_reads: u32,
}

impl MockBrowserConfig {
    /// Configure navigation calls to fail
    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    /// Configure cookie calls to fail
    pub fn failing_cookies(mut self) -> Self {
        self.fail_cookies = true;
        self
    }

    /// Configure script calls to fail
    pub fn failing_scripts(mut self) -> Self {
        self.fail_scripts = true;
        self
    }

    /// Configure the first `n` cookie/storage reads to miss
    pub fn with_flaky_reads(mut self, n: u32) -> Self {
        self.flaky_reads = n;
        self
    }
}

#[derive(Default)]
struct MockState {
    /// Tab id -> current URL (`None` models a restricted page)
    tabs: HashMap<TabId, Option<String>>,
    /// (origin, name) -> value; the jar is origin-scoped like the real one
    cookies: HashMap<(String, String), String>,
    /// (tab, key) -> value; storage is page-scoped
    storage: HashMap<(TabId, String), String>,
    flaky_reads_left: u32,
    navigations: u32,
    cookie_sets: u32,
    cookie_removes: u32,
    script_calls: u32,
}

/// In-memory browser standing in for tab, cookie, and scripting APIs.
///
/// Cloning is cheap and shares state, so one instance can be handed to the
/// engine as all three collaborators.
#[derive(Clone)]
pub struct MockBrowser {
    config: MockBrowserConfig,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    pub fn new() -> Self {
        Self {
            config: MockBrowserConfig::default(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn with_config(mut self, config: MockBrowserConfig) -> Self {
        self.state.lock().flaky_reads_left = config.flaky_reads;
        self.config = config;
        self
    }

    /// Register a tab at the given URL.
    pub fn insert_tab(&self, tab: TabId, url: impl Into<String>) {
        self.state.lock().tabs.insert(tab, Some(url.into()));
    }

    /// Register a tab without a readable URL (restricted page).
    pub fn insert_restricted_tab(&self, tab: TabId) {
        self.state.lock().tabs.insert(tab, None);
    }

    /// Current URL of a tab, if registered and readable.
    pub fn tab_url(&self, tab: TabId) -> Option<String> {
        self.state.lock().tabs.get(&tab).cloned().flatten()
    }

    /// Cookie value for `(origin, name)`, if present.
    pub fn cookie_value(&self, origin: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .cookies
            .get(&(origin.to_string(), name.to_string()))
            .cloned()
    }

    /// Storage value for `(tab, key)`, if present.
    pub fn storage_value(&self, tab: TabId, key: &str) -> Option<String> {
        self.state
            .lock()
            .storage
            .get(&(tab, key.to_string()))
            .cloned()
    }

    /// Number of navigations issued so far.
    pub fn navigation_count(&self) -> u32 {
        self.state.lock().navigations
    }

    /// Number of cookie set calls issued so far.
    pub fn cookie_set_count(&self) -> u32 {
        self.state.lock().cookie_sets
    }

    /// Number of cookie remove calls issued so far.
    pub fn cookie_remove_count(&self) -> u32 {
        self.state.lock().cookie_removes
    }

    /// Number of script executions issued so far.
    pub fn script_call_count(&self) -> u32 {
        self.state.lock().script_calls
    }

    fn consume_flaky_read(&self) -> bool {
        let mut state = self.state.lock();
        if state.flaky_reads_left > 0 {
            state.flaky_reads_left -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl TabProvider for MockBrowser {
    async fn get(&self, tab: TabId) -> Result<Tab, BrowserError> {
        let state = self.state.lock();
        match state.tabs.get(&tab) {
            Some(url) => Ok(Tab {
                id: tab,
                url: url.clone(),
                title: None,
            }),
            None => Err(BrowserError::TabUnreachable(tab)),
        }
    }

    async fn navigate(&self, tab: TabId, url: &str) -> Result<Tab, BrowserError> {
        if self.config.fail_navigation {
            return Err(BrowserError::Rpc("navigation refused".to_string()));
        }
        let mut state = self.state.lock();
        if !state.tabs.contains_key(&tab) {
            return Err(BrowserError::TabUnreachable(tab));
        }
        state.navigations += 1;
        state.tabs.insert(tab, Some(url.to_string()));
        Ok(Tab {
            id: tab,
            url: Some(url.to_string()),
            title: None,
        })
    }
}

#[async_trait]
impl CookieStore for MockBrowser {
    async fn set(&self, params: SetCookieParams) -> Result<(), BrowserError> {
        if self.config.fail_cookies {
            return Err(BrowserError::PermissionDenied("cookies".to_string()));
        }
        let mut state = self.state.lock();
        state.cookie_sets += 1;
        state
            .cookies
            .insert((params.url, params.name), params.value);
        Ok(())
    }

    async fn get(&self, target: CookieTarget) -> Result<Option<Cookie>, BrowserError> {
        if self.config.fail_cookies {
            return Err(BrowserError::PermissionDenied("cookies".to_string()));
        }
        if self.consume_flaky_read() {
            return Ok(None);
        }
        let state = self.state.lock();
        Ok(state
            .cookies
            .get(&(target.url, target.name.clone()))
            .map(|value| Cookie {
                name: target.name,
                value: value.clone(),
                path: "/".to_string(),
            }))
    }

    async fn remove(&self, target: CookieTarget) -> Result<(), BrowserError> {
        if self.config.fail_cookies {
            return Err(BrowserError::PermissionDenied("cookies".to_string()));
        }
        let mut state = self.state.lock();
        state.cookie_removes += 1;
        state.cookies.remove(&(target.url, target.name));
        Ok(())
    }
}

#[async_trait]
impl ScriptExecutor for MockBrowser {
    async fn execute(&self, tab: TabId, script: PageScript) -> Result<Option<String>, BrowserError> {
        if self.config.fail_scripts {
            return Err(BrowserError::PermissionDenied("scripting".to_string()));
        }
        {
            let state = self.state.lock();
            match state.tabs.get(&tab) {
                // Scripts cannot be injected into restricted pages.
                Some(None) | None => return Err(BrowserError::TabUnreachable(tab)),
                Some(Some(_)) => {}
            }
        }
        match script {
            PageScript::StorageSet { key, value } => {
                let mut state = self.state.lock();
                state.script_calls += 1;
                state.storage.insert((tab, key), value);
                Ok(None)
            }
            PageScript::StorageRemove { key } => {
                let mut state = self.state.lock();
                state.script_calls += 1;
                state.storage.remove(&(tab, key));
                Ok(None)
            }
            PageScript::StorageGet { key } => {
                if self.consume_flaky_read() {
                    let mut state = self.state.lock();
                    state.script_calls += 1;
                    return Ok(None);
                }
                let mut state = self.state.lock();
                state.script_calls += 1;
                Ok(state.storage.get(&(tab, key)).cloned())
            }
        }
    }
}

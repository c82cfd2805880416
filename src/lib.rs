//! Preset-driven parameter synchronization for live browser tabs.
//!
//! A preset bundles URL query parameters, cookies, and page-local storage
//! entries under one name. [`SyncEngine`] applies such a bundle onto a tab,
//! retracts it without disturbing settings other active presets still claim,
//! and verifies live state against expected values with one bounded retry.
//!
//! The engine is stateless and talks to the browser only through the seams
//! in [`browser`] and [`store`], so it runs unchanged against a real
//! extension bridge or the in-memory [`browser::MockBrowser`].

pub mod browser;
pub mod preset;
pub mod store;
pub mod sync;

pub use browser::{
    BrowserError, Cookie, CookieStore, CookieTarget, MockBrowser, MockBrowserConfig, PageScript,
    ScriptExecutor, SetCookieParams, Tab, TabId, TabProvider,
};
pub use preset::{ApplyOutcome, Preset, PresetVerification, Setting, SettingKind, VerifyOutcome};
pub use store::{MemoryPresetStore, PresetRepository, StoreError};
pub use sync::{SyncConfig, SyncEngine};

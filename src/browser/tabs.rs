//! Tab identity and the tab-provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::browser::error::BrowserError;

/// Identifier of a live browser tab, as assigned by the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TabId {
    fn from(id: u32) -> Self {
        TabId(id)
    }
}

/// Snapshot of a tab as reported by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Absent on restricted pages the extension cannot read.
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Seam over the browser's tab API.
///
/// Implementations bridge to the host browser; [`crate::browser::MockBrowser`]
/// provides an in-memory one for tests.
#[async_trait]
pub trait TabProvider: Send + Sync {
    /// Fetch the current state of a tab.
    async fn get(&self, tab: TabId) -> Result<Tab, BrowserError>;

    /// Point the tab at a new URL, triggering a page load.
    async fn navigate(&self, tab: TabId, url: &str) -> Result<Tab, BrowserError>;
}

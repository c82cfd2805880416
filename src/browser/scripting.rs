//! Page-context script execution seam.
//!
//! Local storage lives inside the page, so the engine cannot touch it
//! directly; every read or write is one script invocation executed in the
//! tab's document. [`PageScript`] enumerates the scripts the engine runs.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::browser::error::BrowserError;
use crate::browser::tabs::TabId;

/// One script invocation inside a tab's page context.
#[derive(Debug, Clone, PartialEq)]
pub enum PageScript {
    /// `localStorage.setItem(key, value)`
    StorageSet { key: String, value: String },
    /// `localStorage.removeItem(key)`
    StorageRemove { key: String },
    /// `localStorage.getItem(key)`
    StorageGet { key: String },
}

impl PageScript {
    /// Name of the injected function, for diagnostics and real bridges.
    pub fn function_name(&self) -> &'static str {
        match self {
            PageScript::StorageSet { .. } => "setStorageItem",
            PageScript::StorageRemove { .. } => "removeStorageItem",
            PageScript::StorageGet { .. } => "getStorageItem",
        }
    }

    /// Argument list in the browser API's `{func, args}` wire shape.
    pub fn args(&self) -> Value {
        match self {
            PageScript::StorageSet { key, value } => json!([key, value]),
            PageScript::StorageRemove { key } => json!([key]),
            PageScript::StorageGet { key } => json!([key]),
        }
    }
}

/// Seam over the browser's script-injection API.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run the script in the tab's page and return its result, if any.
    ///
    /// Only [`PageScript::StorageGet`] produces a value; mutations resolve
    /// to `None`.
    async fn execute(&self, tab: TabId, script: PageScript) -> Result<Option<String>, BrowserError>;
}

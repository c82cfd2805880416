//! Error type for browser-facing collaborators.

use crate::browser::tabs::TabId;

/// Failure of an underlying browser call.
///
/// These never cross the engine's public boundary: every primitive operator
/// catches them, logs a diagnostic, and reports `false` instead.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// The tab does not exist or cannot be messaged.
    #[error("tab {0} is unreachable")]
    TabUnreachable(TabId),

    /// The tab exists but exposes no URL (e.g. a restricted internal page).
    #[error("tab {0} has no url")]
    MissingUrl(TabId),

    /// The tab's URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The browser refused the call (missing host or scripting permission).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other RPC failure reported by the browser.
    #[error("browser call failed: {0}")]
    Rpc(String),
}

//! Parameter synchronization engine.
//!
//! [`SyncEngine`] applies, removes, and verifies preset settings against a
//! live tab through the collaborator seams in [`crate::browser`] and
//! [`crate::store`]. Calls against different tabs may overlap freely; the
//! engine does not serialize concurrent calls against the same tab, so
//! callers must keep at most one apply/remove in flight per tab.

pub mod conflict;
pub mod engine;
mod ops;
pub mod url_batch;
mod verify;

pub use conflict::preserved_keys;
pub use engine::SyncEngine;
pub use url_batch::{rewrite_query, QueryMutation};

use std::time::Duration;

/// Default pause after a navigation, giving the new document time to begin
/// loading before cookie and storage calls target it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Default pause between a retry-apply and its verification read-back.
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_millis(100);

/// Timing knobs for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Wait after issuing a navigation before touching cookies or storage.
    pub settle_delay: Duration,
    /// Wait after a retry-apply before the second verification.
    pub propagation_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            propagation_delay: DEFAULT_PROPAGATION_DELAY,
        }
    }
}

impl SyncConfig {
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_propagation_delay(mut self, delay: Duration) -> Self {
        self.propagation_delay = delay;
        self
    }

    /// Zero delays, for tests that do not exercise timing.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            propagation_delay: Duration::ZERO,
        }
    }
}

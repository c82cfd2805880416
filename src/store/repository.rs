//! Preset repository seam.
//!
//! Persistence and CRUD of presets live outside the engine; it only reads
//! presets by id and the per-tab activation sets maintained by the caller.

use async_trait::async_trait;
use uuid::Uuid;

use crate::browser::tabs::TabId;
use crate::preset::Preset;

/// Failure of the backing preset store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend rejected or lost the request.
    #[error("preset store backend error: {0}")]
    Backend(String),
}

/// Read-only view of presets and per-tab activation state.
#[async_trait]
pub trait PresetRepository: Send + Sync {
    /// Look up a preset by id, `None` if it does not exist.
    async fn preset_by_id(&self, id: Uuid) -> Result<Option<Preset>, StoreError>;

    /// All known presets.
    async fn presets(&self) -> Result<Vec<Preset>, StoreError>;

    /// Ids of the presets currently active on a tab. Toggling activation is
    /// the caller's responsibility; the engine only reads this set to
    /// resolve removal conflicts.
    async fn active_presets_for_tab(&self, tab: TabId) -> Result<Vec<Uuid>, StoreError>;
}

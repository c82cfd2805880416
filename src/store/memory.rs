//! In-memory preset repository.
//!
//! Backs tests and embedders that keep presets in process. Cloning shares
//! state, so the same store can be handed to the engine and mutated by the
//! caller.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::browser::tabs::TabId;
use crate::preset::Preset;
use crate::store::repository::{PresetRepository, StoreError};

#[derive(Default)]
struct Inner {
    presets: HashMap<Uuid, Preset>,
    active: HashMap<TabId, HashSet<Uuid>>,
}

/// Shared in-memory implementation of [`PresetRepository`].
#[derive(Clone, Default)]
pub struct MemoryPresetStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a preset.
    pub fn insert(&self, preset: Preset) {
        self.inner.write().presets.insert(preset.id, preset);
    }

    /// Delete a preset, returning it if it existed.
    pub fn remove(&self, id: Uuid) -> Option<Preset> {
        self.inner.write().presets.remove(&id)
    }

    /// Mark a preset active on a tab.
    pub fn set_active(&self, tab: TabId, id: Uuid) {
        self.inner.write().active.entry(tab).or_default().insert(id);
    }

    /// Mark a preset inactive on a tab.
    pub fn clear_active(&self, tab: TabId, id: Uuid) {
        if let Some(set) = self.inner.write().active.get_mut(&tab) {
            set.remove(&id);
        }
    }
}

#[async_trait]
impl PresetRepository for MemoryPresetStore {
    async fn preset_by_id(&self, id: Uuid) -> Result<Option<Preset>, StoreError> {
        Ok(self.inner.read().presets.get(&id).cloned())
    }

    async fn presets(&self) -> Result<Vec<Preset>, StoreError> {
        Ok(self.inner.read().presets.values().cloned().collect())
    }

    async fn active_presets_for_tab(&self, tab: TabId) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .inner
            .read()
            .active
            .get(&tab)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}

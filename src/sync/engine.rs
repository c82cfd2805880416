//! Synchronizer orchestrating apply/remove passes over a tab.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::browser::{CookieStore, ScriptExecutor, TabId, TabProvider};
use crate::preset::{ApplyOutcome, Preset, Setting, SettingKind};
use crate::store::PresetRepository;
use crate::sync::conflict::preserved_keys;
use crate::sync::url_batch::QueryMutation;
use crate::sync::SyncConfig;

/// Stateless synchronization engine.
///
/// Holds no per-tab state of its own: every call reads the preset from the
/// repository and mutates the tab through the injected collaborators.
/// Concurrent calls against different tabs are safe; overlapping calls on
/// the same tab are the caller's responsibility to prevent.
pub struct SyncEngine {
    pub(crate) tabs: Arc<dyn TabProvider>,
    pub(crate) cookies: Arc<dyn CookieStore>,
    pub(crate) scripts: Arc<dyn ScriptExecutor>,
    pub(crate) repository: Arc<dyn PresetRepository>,
    pub(crate) config: SyncConfig,
}

/// A preset's settings split by kind, preserving in-kind order.
#[derive(Default)]
pub(crate) struct Partitioned<'a> {
    pub query: Vec<&'a Setting>,
    pub cookies: Vec<&'a Setting>,
    pub local: Vec<&'a Setting>,
}

impl<'a> Partitioned<'a> {
    pub(crate) fn split(settings: &'a [Setting]) -> Self {
        let mut parts = Self::default();
        for setting in settings {
            match setting.kind {
                SettingKind::QueryParam => parts.query.push(setting),
                SettingKind::Cookie => parts.cookies.push(setting),
                SettingKind::LocalEntry => parts.local.push(setting),
            }
        }
        parts
    }
}

impl SyncEngine {
    pub fn new(
        tabs: Arc<dyn TabProvider>,
        cookies: Arc<dyn CookieStore>,
        scripts: Arc<dyn ScriptExecutor>,
        repository: Arc<dyn PresetRepository>,
    ) -> Self {
        Self {
            tabs,
            cookies,
            scripts,
            repository,
            config: SyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Apply every setting of a preset to the tab.
    ///
    /// Query parameters go first through the batched URL mutator (at most
    /// one navigation), then cookies, then local entries, each sequentially.
    /// Returns the AND of every per-setting result; there is no rollback, so
    /// settings that succeeded stay applied even when the aggregate is
    /// `false`. A missing preset returns `false` immediately.
    pub async fn apply_preset(&self, tab: TabId, preset_id: Uuid) -> bool {
        let Some(preset) = self.load_preset(preset_id).await else {
            return false;
        };
        let parts = Partitioned::split(&preset.settings);
        let mut results: Vec<ApplyOutcome> = Vec::with_capacity(preset.settings.len());

        if !parts.query.is_empty() {
            let mutations: Vec<QueryMutation<'_>> = parts
                .query
                .iter()
                .map(|s| QueryMutation::Set {
                    key: &s.key,
                    value: &s.value,
                })
                .collect();
            // One navigation carries the whole batch, so its outcome is
            // shared by every query setting.
            let success = self.batch_navigate(tab, &mutations).await;
            results.extend(parts.query.iter().map(|s| ApplyOutcome {
                setting: (*s).clone(),
                success,
            }));
        }
        for setting in &parts.cookies {
            let success = self.apply_cookie(tab, setting).await;
            results.push(ApplyOutcome {
                setting: (*setting).clone(),
                success,
            });
        }
        for setting in &parts.local {
            let success = self.apply_local_entry(tab, setting).await;
            results.push(ApplyOutcome {
                setting: (*setting).clone(),
                success,
            });
        }

        let ok = results.iter().all(|r| r.success);
        tracing::info!(
            tab = %tab,
            preset = %preset.name,
            applied = results.iter().filter(|r| r.success).count(),
            total = results.len(),
            "preset apply finished"
        );
        ok
    }

    /// Remove a preset's settings from the tab, honoring conflicts.
    ///
    /// Settings still claimed by another preset active on the tab are left
    /// in place and count as vacuously successful. Same kind ordering and
    /// aggregation as [`Self::apply_preset`]; removing an already-removed
    /// preset is an idempotent success.
    pub async fn remove_preset(&self, tab: TabId, preset_id: Uuid) -> bool {
        let Some(preset) = self.load_preset(preset_id).await else {
            return false;
        };
        let preserved = self.claimed_by_others(tab, &preset).await;
        let is_preserved = |s: &Setting| preserved.contains(&(s.kind, s.key.clone()));

        let parts = Partitioned::split(&preset.settings);
        let mut results: Vec<ApplyOutcome> = Vec::with_capacity(preset.settings.len());

        let (removable, kept): (Vec<&Setting>, Vec<&Setting>) = parts
            .query
            .iter()
            .copied()
            .partition(|s| !is_preserved(s));
        if !removable.is_empty() {
            let mutations: Vec<QueryMutation<'_>> = removable
                .iter()
                .map(|s| QueryMutation::Delete { key: &s.key })
                .collect();
            let success = self.batch_navigate(tab, &mutations).await;
            results.extend(removable.iter().map(|s| ApplyOutcome {
                setting: (*s).clone(),
                success,
            }));
        }
        // Settings another active preset still claims were correctly left
        // alone, so they count as successes.
        results.extend(kept.iter().map(|s| ApplyOutcome {
            setting: (*s).clone(),
            success: true,
        }));

        for setting in &parts.cookies {
            if is_preserved(setting) {
                tracing::debug!(tab = %tab, key = %setting.key, "cookie still claimed, preserved");
                results.push(ApplyOutcome {
                    setting: (*setting).clone(),
                    success: true,
                });
                continue;
            }
            let success = self.remove_cookie(tab, setting).await;
            results.push(ApplyOutcome {
                setting: (*setting).clone(),
                success,
            });
        }
        for setting in &parts.local {
            if is_preserved(setting) {
                tracing::debug!(tab = %tab, key = %setting.key, "local entry still claimed, preserved");
                results.push(ApplyOutcome {
                    setting: (*setting).clone(),
                    success: true,
                });
                continue;
            }
            let success = self.remove_local_entry(tab, setting).await;
            results.push(ApplyOutcome {
                setting: (*setting).clone(),
                success,
            });
        }

        let ok = results.iter().all(|r| r.success);
        tracing::info!(
            tab = %tab,
            preset = %preset.name,
            preserved = preserved.len(),
            success = ok,
            "preset removal finished"
        );
        ok
    }

    /// Apply one setting, dispatching on its kind.
    pub async fn apply_parameter(&self, tab: TabId, setting: &Setting) -> bool {
        match setting.kind {
            SettingKind::QueryParam => {
                self.batch_navigate(
                    tab,
                    &[QueryMutation::Set {
                        key: &setting.key,
                        value: &setting.value,
                    }],
                )
                .await
            }
            SettingKind::Cookie => self.apply_cookie(tab, setting).await,
            SettingKind::LocalEntry => self.apply_local_entry(tab, setting).await,
        }
    }

    /// Remove one setting, dispatching on its kind.
    ///
    /// Single-setting removal does not consult the conflict resolver; that
    /// belongs to [`Self::remove_preset`].
    pub async fn remove_parameter(&self, tab: TabId, setting: &Setting) -> bool {
        match setting.kind {
            SettingKind::QueryParam => {
                self.batch_navigate(tab, &[QueryMutation::Delete { key: &setting.key }])
                    .await
            }
            SettingKind::Cookie => self.remove_cookie(tab, setting).await,
            SettingKind::LocalEntry => self.remove_local_entry(tab, setting).await,
        }
    }

    pub(crate) async fn load_preset(&self, id: Uuid) -> Option<Preset> {
        match self.repository.preset_by_id(id).await {
            Ok(Some(preset)) => Some(preset),
            Ok(None) => {
                tracing::warn!(preset_id = %id, "preset not found");
                None
            }
            Err(error) => {
                tracing::warn!(preset_id = %id, error = %error, "preset lookup failed");
                None
            }
        }
    }

    /// `(kind, key)` pairs of the target preset that another preset active
    /// on the tab still claims.
    async fn claimed_by_others(
        &self,
        tab: TabId,
        target: &Preset,
    ) -> HashSet<(SettingKind, String)> {
        let active = match self.repository.active_presets_for_tab(tab).await {
            Ok(ids) => ids,
            Err(error) => {
                tracing::warn!(tab = %tab, error = %error, "activation lookup failed");
                return HashSet::new();
            }
        };

        let mut others: Vec<Setting> = Vec::new();
        for id in active.into_iter().filter(|id| *id != target.id) {
            match self.repository.preset_by_id(id).await {
                Ok(Some(preset)) => others.extend(preset.settings),
                // Stale activation entry; nothing to claim.
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(preset_id = %id, error = %error, "claimant lookup failed");
                }
            }
        }

        preserved_keys(&target.settings, &others)
    }
}

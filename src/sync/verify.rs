//! Verification and the bounded retry coordinator.

use futures::future::join_all;
use uuid::Uuid;

use crate::browser::TabId;
use crate::preset::{PresetVerification, Setting, SettingKind, VerifyOutcome};
use crate::sync::engine::SyncEngine;

impl SyncEngine {
    /// Read back a setting's live value and compare it to the expected one.
    ///
    /// Strict string equality; an absent value or any read failure is
    /// `false`, never an error.
    pub async fn verify_parameter(&self, tab: TabId, setting: &Setting) -> bool {
        let read = match setting.kind {
            SettingKind::QueryParam => self.read_query_param(tab, &setting.key).await,
            SettingKind::Cookie => self.read_cookie(tab, &setting.key).await,
            SettingKind::LocalEntry => self.read_local_entry(tab, &setting.key).await,
        };

        match read {
            Ok(Some(value)) => value == setting.value,
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(
                    tab = %tab,
                    kind = %setting.kind,
                    key = %setting.key,
                    error = %error,
                    "verification read failed"
                );
                false
            }
        }
    }

    /// Verify every setting of a preset, concurrently.
    ///
    /// A missing preset yields `all_verified: false` with empty results
    /// rather than an error.
    pub async fn verify_preset(&self, tab: TabId, preset_id: Uuid) -> PresetVerification {
        let Some(preset) = self.load_preset(preset_id).await else {
            return PresetVerification::missing_preset();
        };

        let checks = preset.settings.iter().map(|setting| async move {
            VerifyOutcome {
                setting: setting.clone(),
                verified: self.verify_parameter(tab, setting).await,
            }
        });
        let results = join_all(checks).await;

        PresetVerification {
            all_verified: results.iter().all(|r| r.verified),
            results,
        }
    }

    /// Apply one setting with bounded self-healing.
    ///
    /// Apply, verify, and on a mismatch re-apply exactly once, wait out the
    /// propagation delay, and let the second verification decide. A failed
    /// initial apply short-circuits to `false` without verifying; there is
    /// never a second retry, so a permanently unreachable tab costs at most
    /// two apply attempts.
    pub async fn sync_parameter(&self, tab: TabId, setting: &Setting) -> bool {
        if !self.apply_parameter(tab, setting).await {
            tracing::warn!(
                tab = %tab,
                kind = %setting.kind,
                key = %setting.key,
                "initial apply failed, skipping verification"
            );
            return false;
        }

        if self.verify_parameter(tab, setting).await {
            return true;
        }

        tracing::debug!(
            tab = %tab,
            kind = %setting.kind,
            key = %setting.key,
            "verification mismatch, retrying once"
        );
        self.apply_parameter(tab, setting).await;
        tokio::time::sleep(self.config.propagation_delay).await;
        self.verify_parameter(tab, setting).await
    }
}

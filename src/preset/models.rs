//! Data models for presets and their settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of tab state a setting targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKind {
    /// URL query-string parameter.
    QueryParam,
    /// Cookie scoped to the tab's origin.
    Cookie,
    /// Key/value entry in the page's local storage.
    LocalEntry,
}

impl SettingKind {
    /// String representation for log fields and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::QueryParam => "query-param",
            SettingKind::Cookie => "cookie",
            SettingKind::LocalEntry => "local-entry",
        }
    }
}

impl std::fmt::Display for SettingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parameter a preset writes into a tab.
///
/// Identity for conflict resolution is the `(kind, key)` pair; two presets
/// may claim the same pair with different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Unique identifier
    pub id: Uuid,
    /// What part of tab state this setting targets
    pub kind: SettingKind,
    /// Parameter / cookie / storage key
    pub key: String,
    /// Value written on apply and expected on verify
    pub value: String,
    /// Optional free-form annotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Setting {
    pub fn new(kind: SettingKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            key: key.into(),
            value: value.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Identity used by the conflict resolver; value is deliberately excluded.
    pub fn conflict_key(&self) -> (SettingKind, &str) {
        (self.kind, self.key.as_str())
    }
}

/// A named, ordered bundle of settings.
///
/// The settings list is not deduplicated: duplicate `(kind, key)` pairs are
/// allowed and apply in iteration order, so the last occurrence wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description shown in the UI layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered settings applied by the synchronizer
    pub settings: Vec<Setting>,
    /// When the preset was created
    pub created_at: DateTime<Utc>,
    /// Last time the preset was modified
    pub updated_at: DateTime<Utc>,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            settings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_setting(mut self, setting: Setting) -> Self {
        self.settings.push(setting);
        self
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Per-setting result of one apply/remove pass. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub setting: Setting,
    pub success: bool,
}

/// Per-setting result of one verification pass.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutcome {
    pub setting: Setting,
    pub verified: bool,
}

/// Aggregate verification result for a whole preset.
#[derive(Debug, Clone, Serialize)]
pub struct PresetVerification {
    /// AND of every per-setting result
    pub all_verified: bool,
    /// One record per setting, in preset order
    pub results: Vec<VerifyOutcome>,
}

impl PresetVerification {
    /// Result reported when the preset id resolves to nothing.
    pub fn missing_preset() -> Self {
        Self {
            all_verified: false,
            results: Vec::new(),
        }
    }
}

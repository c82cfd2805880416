//! Ownership conflicts between overlapping presets.
//!
//! Two presets may both claim the same `(kind, key)` pair. Deactivating one
//! of them must not strip a setting a still-active preset depends on, so
//! removal first computes which keys another claimant holds and leaves those
//! untouched.

use std::collections::HashSet;

use crate::preset::{Setting, SettingKind};

/// Keys of the target settings that another active preset still claims.
///
/// A target setting is preserved when any setting in `others` shares its
/// `(kind, key)` identity; values play no part in the comparison. With no
/// other claimants the result is empty and removal is unconditionally safe.
pub fn preserved_keys(
    target: &[Setting],
    others: &[Setting],
) -> HashSet<(SettingKind, String)> {
    let claimed: HashSet<(SettingKind, &str)> =
        others.iter().map(Setting::conflict_key).collect();

    target
        .iter()
        .filter(|s| claimed.contains(&s.conflict_key()))
        .map(|s| (s.kind, s.key.clone()))
        .collect()
}

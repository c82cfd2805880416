pub mod models;

pub use models::{
    ApplyOutcome, Preset, PresetVerification, Setting, SettingKind, VerifyOutcome,
};

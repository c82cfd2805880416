pub mod memory;
pub mod repository;

pub use memory::MemoryPresetStore;
pub use repository::{PresetRepository, StoreError};

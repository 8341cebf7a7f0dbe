pub mod store;

pub use store::{read_seeded, FileSettingsStore, MemorySettingsStore, SettingsStore};

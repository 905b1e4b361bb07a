// src/services/mod.rs
pub mod settings;

pub use settings::{SettingsError, SettingsService};

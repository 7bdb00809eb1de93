//! Run configuration for acregrid: file loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{GridConfig, DEFAULT_CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};

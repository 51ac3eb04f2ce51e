//! Configuration system for the visual playground.
//!
//! Provides TOML-based configuration with:
//! - Context store settings (`[context]`: storage key, retention cap)
//! - Storage and export locations (`[storage]`, `[export]`)
//! - Config file layering (user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;

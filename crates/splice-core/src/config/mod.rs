//! Configuration
//!
//! - Generic YAML config loading/saving
//! - Standard config paths
//! - Export settings
//!
//! # Usage
//!
//! ```ignore
//! use splice_core::config::{load_config, default_config_path, SpliceConfig};
//!
//! let config: SpliceConfig = load_config(&default_config_path());
//! ```

mod export;
mod io;
mod paths;

pub use export::ExportConfig;
pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};

/// Root of `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpliceConfig {
    pub export: ExportConfig,
}

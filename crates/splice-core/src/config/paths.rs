//! Standard locations for splice configuration

use std::path::PathBuf;

/// Config file name inside [`default_config_dir`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Returns: `{config_dir}/splice` (e.g. `~/.config/splice` on Linux)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("splice")
}

/// Returns: `{config_dir}/splice/config.yaml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_layout() {
        let path = default_config_path();
        assert!(path.ends_with("splice/config.yaml"));
    }
}

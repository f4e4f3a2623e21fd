//! Export settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::{ProgressBudget, DEFAULT_FILE_NAME};

/// Where exports go and how progress is split between phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name of the merged WAV
    /// Default: "merged_audio.wav"
    pub output_file_name: String,

    /// Directory the merged WAV is written to
    /// Default: current directory
    pub output_dir: PathBuf,

    /// Share of overall progress covered by merging (0.0 to 1.0)
    /// Default: 0.5
    pub merge_progress_share: f32,

    /// Overall progress reported when encoding starts
    /// Default: 0.6
    pub encode_progress_mark: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_file_name: DEFAULT_FILE_NAME.to_string(),
            output_dir: PathBuf::from("."),
            merge_progress_share: 0.5,
            encode_progress_mark: 0.6,
        }
    }
}

impl ExportConfig {
    pub fn budget(&self) -> ProgressBudget {
        ProgressBudget::new(self.merge_progress_share, self.encode_progress_mark)
    }

    /// Full path of the exported file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.output_path(), PathBuf::from("./merged_audio.wav"));
        assert_eq!(config.budget(), ProgressBudget::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ExportConfig = serde_yaml::from_str("output_dir: /tmp/out\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.output_file_name, "merged_audio.wav");
        assert_eq!(config.encode_progress_mark, 0.6);
    }
}

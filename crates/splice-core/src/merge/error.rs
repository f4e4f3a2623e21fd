//! Merge error types

use thiserror::Error;

/// Errors that can occur while merging clips
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Merge called with no clips
    #[error("No audio clips to merge")]
    EmptyInput,

    /// Output buffer could not be allocated
    #[error("Cannot allocate output buffer for {frames} stereo frames")]
    Allocation { frames: u64 },
}

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

//! Merge-and-export workflow
//!
//! # Architecture
//!
//! ```text
//! Caller (CLI)
//!     │
//!     │ start_export(clips, sink)
//!     ▼
//! ExportService (named worker thread)
//!     │
//!     │ Merger::step() per clip, cancel checked in between
//!     │ wav::encode()
//!     │ ExportSink::deliver()
//!     │
//!     │ ExportProgress (crossbeam channel)
//!     ▼
//! Caller polls receiver until a terminal message
//! ```

mod error;
mod message;
mod pipeline;
mod service;
mod sink;

pub use error::{ExportError, Result};
pub use message::{ExportProgress, ProgressBudget};
pub use pipeline::{export_clips, ExportArtifact, DEFAULT_FILE_NAME};
pub use service::ExportService;
pub use sink::{DirectorySink, ExportSink};

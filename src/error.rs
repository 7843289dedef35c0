//! Error types for archgraph.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the analysis engine.
///
/// Every variant is fatal to the run: the engine never returns a partial
/// graph. Resolution gaps (unresolved calls, cross-package field types,
/// unhandled type shapes) are not errors; they are documented omissions
/// from the edge set.
#[derive(Debug, Error)]
pub enum ArchError {
    /// The analysis root could not be made absolute.
    #[error("failed to resolve path {}: {source}", .path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk failed (unreadable directory, I/O error).
    #[error("failed to walk directory: {0}")]
    Traversal(#[from] ignore::Error),

    /// A source file could not be read or parsed.
    #[error("failed to parse file {}: {message}", .file.display())]
    Parse { file: PathBuf, message: String },

    /// The caller requested a source dialect the engine does not implement.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

pub type Result<T> = std::result::Result<T, ArchError>;

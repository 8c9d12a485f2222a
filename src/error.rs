use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for a generation request.
///
/// A placeholder that never occurs in the template is deliberately absent
/// here: templates may legitimately omit fields they don't need, so the
/// substitution engine treats that case as a no-op rather than an error.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("incomplete input: {0}")]
    IncompleteInput(String),

    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    #[error("failed to write output container: {0}")]
    Serialize(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

//! Error types for the marginalia core

use thiserror::Error;

use crate::dom::path::PathError;
use crate::dom::DomError;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Top-level error type for highlight operations
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("document tree error: {0}")]
    Dom(#[from] DomError),

    #[error("range selector error: {0}")]
    Path(#[from] PathError),

    #[error("bounding box requested for an empty highlight batch")]
    EmptyBatch,

    #[error("no measurable geometry for the requested highlights")]
    NoGeometry,
}

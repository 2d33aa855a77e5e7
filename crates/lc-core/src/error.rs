//! Errors for malformed input handed to the core by an upstream
//! collaborator (persistence layer, template supplier).
//!
//! Interactive editing never produces these: stale ids and out-of-range
//! geometry are handled as no-ops or clamps instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("slide {slide} contains element id {element} more than once")]
    DuplicateElementId { slide: String, element: String },

    #[error("table {element} is malformed: {detail}")]
    TableShape { element: String, detail: String },

    #[error("slide order references unknown slide {0}")]
    UnknownSlide(String),

    #[error("slide {0} appears more than once in the slide order")]
    DuplicateSlide(String),
}

/// Failure to rehydrate a document from persisted data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

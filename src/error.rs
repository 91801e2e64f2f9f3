//! Error types for the question-paper-docx library.
//!
//! A single fatal error type, [`QuestionPaperError`], covers every way a
//! request can be rejected or fail:
//!
//! * **Structural** problems abort the whole request: an empty section list,
//!   an OCR response that is not a JSON object, an unreachable OCR service,
//!   or a DOCX package that could not be written.
//!
//! * **Field-level** problems never reach this type. A question whose marks
//!   arrive as `"2 marks"` or not at all is repaired in place by
//!   [`crate::pipeline::normalize`] and the document is still produced.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the question-paper-docx library.
#[derive(Debug, Error)]
pub enum QuestionPaperError {
    // ── Request errors ────────────────────────────────────────────────────
    /// The exam paper is not eligible for rendering (no sections, blank
    /// class/subject, or a body that does not match the exam model).
    #[error("Invalid exam paper: {reason}")]
    Validation { reason: String },

    // ── OCR collaborator errors ───────────────────────────────────────────
    /// The OCR/AI service could not be reached or answered with a failure.
    #[error("OCR service error ({status}): {message}")]
    Upstream { status: String, message: String },

    /// The OCR/AI service answered, but the body is not a JSON object.
    #[error("OCR response is not a structured object: {detail}")]
    MalformedInput { detail: String },

    /// An image selected for upload could not be read.
    #[error("Failed to read image '{path}': {source}")]
    ImageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The DOCX container could not be built.
    #[error("Failed to assemble DOCX: {detail}")]
    Assembly { detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl QuestionPaperError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        QuestionPaperError::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn assembly(detail: impl std::fmt::Display) -> Self {
        QuestionPaperError::Assembly {
            detail: detail.to_string(),
        }
    }
}

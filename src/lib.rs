//! # question-paper-docx
//!
//! Turn structured exam-paper data into a print-ready Word (`.docx`) document.
//!
//! Teachers either fill in a structured request or photograph an existing
//! paper. Photographed pages are read by an external OCR/AI service whose JSON
//! is loosely typed, so it is repaired before use. The paper is then laid out
//! with one of a small, closed set of school templates.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request JSON ─────────────────────────────┐
//!                                           ▼
//! images ─▶ OCR service ─▶ normalize ─▶ ExamPaper ─▶ classify ─▶ render ─▶ assemble ─▶ .docx
//!           (HTTP)         (repair +    (validated)  (template)   (blocks)   (zip+xml)
//!                           overrides)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use question_paper_docx::{generate_from_json, GeneratorConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let body = std::fs::read_to_string("paper.json")?;
//!     let doc = generate_from_json(&body, &GeneratorConfig::from_env())?;
//!     doc.write_to(&doc.file_name)?;
//!     eprintln!("{} ({} template)", doc.file_name, doc.template);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `qpaper` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! question-paper-docx = { version = "0.1", default-features = false }
//! ```
//!
//! ## Templates
//!
//! | Template | Selected when |
//! |----------|---------------|
//! | Generic | anything else |
//! | Std5 English II | class is `5`/`V`/`Class 5`/`Std V`… and subject is `English II`/`English 2`… |
//! | Legacy font | only when forced (`GeneratorConfig::template`) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::QuestionPaperError;
pub use generate::{
    generate, generate_at, generate_from_images, generate_from_images_sync, generate_from_json,
    generate_from_ocr_json, generate_to_file, suggested_file_name, DocumentSource,
    GeneratedDocument,
};
pub use model::{ExamPaper, Question, Section};
pub use pipeline::assemble::DOCX_CONTENT_TYPE;
pub use pipeline::classify::{classify, TemplateKind};
pub use pipeline::normalize::{normalize_ocr_response, repair_marks, TrustedOverrides};
pub use pipeline::ocr::OcrClient;

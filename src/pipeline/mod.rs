//! Pipeline stages for exam-paper-to-DOCX generation.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! ocr ──▶ normalize ──▶ classify ──▶ render ──▶ assemble
//! (HTTP)  (repair JSON)  (template)   (blocks)   (zip + xml)
//!                                        │
//!                                      format
//! ```
//!
//! 1. [`ocr`]       : upload page images to the OCR service; the only stage
//!    with network I/O, and only on the image path
//! 2. [`normalize`] : deterministic repair rules for loosely typed OCR JSON,
//!    then trusted form fields overwrite whatever the service guessed
//! 3. [`classify`]  : map class and subject labels to a [`classify::TemplateKind`]
//! 4. [`render`]    : lay the paper out as styled [`format::Block`]s
//! 5. [`format`]    : the paragraph/run builder every renderer goes through
//! 6. [`assemble`]  : write the blocks into an OOXML package

pub mod assemble;
pub mod classify;
pub mod format;
pub mod normalize;
pub mod ocr;
pub mod render;

//! Generation entry points: request in, `.docx` bytes out.
//!
//! | Entry point | Input |
//! |-------------|-------|
//! | [`generate`] | an already-built [`ExamPaper`] |
//! | [`generate_from_json`] | a JSON request body matching the model |
//! | [`generate_from_ocr_json`] | a raw OCR service response + trusted fields |
//! | [`generate_from_images`] | page images, sent to the OCR service first |
//!
//! All of them end in the same synchronous core: validate, pick a template,
//! render blocks, assemble the package.

use crate::config::GeneratorConfig;
use crate::error::QuestionPaperError;
use crate::model::ExamPaper;
use crate::pipeline::assemble::{self, DocumentInfo, DOCX_CONTENT_TYPE};
use crate::pipeline::classify::{classify, TemplateKind};
use crate::pipeline::normalize::{self, TrustedOverrides};
use crate::pipeline::ocr::OcrClient;
use crate::pipeline::render;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Where a paper came from; only affects the suggested file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Direct,
    Ocr,
}

/// A finished question paper.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
    pub template: TemplateKind,
}

impl GeneratedDocument {
    /// Write the document to `path` atomically.
    ///
    /// The bytes go to a temp file in the same directory which is then
    /// renamed over `path`, so readers never see a truncated file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), QuestionPaperError> {
        let path = path.as_ref();
        let write_failed = |source: std::io::Error| QuestionPaperError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(write_failed)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_failed)?;
        tmp.write_all(&self.bytes).map_err(write_failed)?;
        tmp.flush().map_err(write_failed)?;
        tmp.persist(path).map_err(|e| write_failed(e.error))?;

        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}

/// Render a validated paper with the template chosen by class and subject,
/// or the one forced in `config.template`.
pub fn generate(
    paper: &ExamPaper,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    generate_at(paper, DocumentSource::Direct, config, Utc::now())
}

/// Same as [`generate`] with an explicit source and clock, for reproducible
/// file names.
pub fn generate_at(
    paper: &ExamPaper,
    source: DocumentSource,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
) -> Result<GeneratedDocument, QuestionPaperError> {
    let start = Instant::now();
    paper.validate()?;

    let template = match config.template {
        Some(forced) => {
            debug!("Template forced by configuration: {forced}");
            forced
        }
        None => classify(&paper.class, &paper.subject),
    };
    info!(
        "Generating '{}' for class {} / {} with template {} ({} sections, {} questions)",
        paper.exam_title,
        paper.class,
        paper.subject,
        template,
        paper.sections.len(),
        paper.question_count()
    );

    let blocks = render::render(template, paper, config);
    let info = DocumentInfo {
        title: paper.exam_title.clone(),
        subject: paper.subject.clone(),
        created: Some(now),
    };
    let bytes = assemble::assemble(&blocks, &info, config)?;

    info!(
        "Generated {} bytes in {}ms",
        bytes.len(),
        start.elapsed().as_millis()
    );
    Ok(GeneratedDocument {
        bytes,
        file_name: suggested_file_name(paper, source, now),
        content_type: DOCX_CONTENT_TYPE,
        template,
    })
}

/// Parse a direct request body and render it.
pub fn generate_from_json(
    body: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    let paper = ExamPaper::from_json(body)?;
    generate(&paper, config)
}

/// Repair a raw OCR response, apply the trusted fields, and render it.
pub fn generate_from_ocr_json(
    raw: &str,
    overrides: &TrustedOverrides,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    let paper = normalize::normalize_ocr_response(raw, overrides)?;
    generate_at(&paper, DocumentSource::Ocr, config, Utc::now())
}

/// Send page images to the OCR service, then continue as
/// [`generate_from_ocr_json`].
pub async fn generate_from_images(
    images: &[PathBuf],
    overrides: &TrustedOverrides,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    let client = OcrClient::new(config)?;
    let raw = client.parse_question_paper(images, overrides).await?;
    generate_from_ocr_json(&raw, overrides, config)
}

/// Blocking wrapper around [`generate_from_images`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_from_images_sync(
    images: &[PathBuf],
    overrides: &TrustedOverrides,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| QuestionPaperError::InvalidConfig(format!("tokio runtime: {e}")))?
        .block_on(generate_from_images(images, overrides, config))
}

/// Render `paper` and write it to `path`.
pub fn generate_to_file(
    paper: &ExamPaper,
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<GeneratedDocument, QuestionPaperError> {
    let doc = generate(paper, config)?;
    doc.write_to(path)?;
    Ok(doc)
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// `QuestionPaper_{subject}_{stamp}.docx`, or with the class in front of the
/// subject for OCR-derived papers.
pub fn suggested_file_name(
    paper: &ExamPaper,
    source: DocumentSource,
    now: DateTime<Utc>,
) -> String {
    let stamp = now.format("%Y%m%d%H%M");
    let subject = file_name_part(&paper.subject);
    match source {
        DocumentSource::Direct => format!("QuestionPaper_{subject}_{stamp}.docx"),
        DocumentSource::Ocr => {
            let class = file_name_part(&paper.class);
            format!("QuestionPaper_{class}_{subject}_{stamp}.docx")
        }
    }
}

fn file_name_part(label: &str) -> String {
    let kept: String = label
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.' | '(' | ')'))
        .collect();
    let joined = WHITESPACE.replace_all(kept.trim(), "_");
    let cleaned = joined.trim_matches('.');
    if cleaned.is_empty() {
        "Paper".to_string()
    } else {
        cleaned.to_string()
    }
}

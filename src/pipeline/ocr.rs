//! Client for the OCR/AI extraction service.
//!
//! The service takes photographed or scanned question-paper pages and answers
//! with loosely structured JSON that still has to go through
//! [`crate::pipeline::normalize`]. This module only moves bytes: it reads the
//! images, posts them as `multipart/form-data`, and hands back the raw body.

use crate::config::GeneratorConfig;
use crate::error::QuestionPaperError;
use crate::pipeline::normalize::TrustedOverrides;
use futures::future::try_join_all;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const PARSE_PATH: &str = "/ocr/parse-question-paper";

/// Upload MIME type when the bytes are not a recognisable image.
const FALLBACK_MIME: &str = "image/jpeg";

/// Longest slice of an error body kept in [`QuestionPaperError::Upstream`].
const MAX_ERROR_BODY: usize = 500;

/// One image read from disk, ready to upload.
#[derive(Debug, Clone)]
struct ImageUpload {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

/// HTTP client bound to one OCR service base URL.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl OcrClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, QuestionPaperError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ocr_timeout_secs))
            .build()
            .map_err(|e| QuestionPaperError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint(&config.ocr_base_url),
            timeout_secs: config.ocr_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `images` with the trusted form fields and return the raw body.
    ///
    /// Every image is read before anything is sent; one unreadable file fails
    /// the whole call with [`QuestionPaperError::ImageReadFailed`].
    pub async fn parse_question_paper(
        &self,
        images: &[PathBuf],
        overrides: &TrustedOverrides,
    ) -> Result<String, QuestionPaperError> {
        if images.is_empty() {
            return Err(QuestionPaperError::validation(
                "at least one image is required for OCR extraction",
            ));
        }

        let uploads = try_join_all(images.iter().map(|p| read_image(p))).await?;
        let total: usize = uploads.iter().map(|u| u.bytes.len()).sum();
        info!(
            "Sending {} image(s) ({} bytes) to {}",
            uploads.len(),
            total,
            self.endpoint
        );

        let form = build_form(uploads, overrides)?;
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            warn!("OCR service answered {status}");
            return Err(QuestionPaperError::Upstream {
                status: format!("HTTP {status}"),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        debug!("OCR response: {} bytes", body.len());
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> QuestionPaperError {
        let status = if e.is_timeout() {
            format!("timed out after {}s", self.timeout_secs)
        } else if e.is_connect() {
            "unreachable".to_string()
        } else {
            "request failed".to_string()
        };
        warn!("OCR service {status}: {e}");
        QuestionPaperError::Upstream {
            status,
            message: format!("{}: {e}", self.endpoint),
        }
    }
}

fn endpoint(base_url: &str) -> String {
    format!("{}{PARSE_PATH}", base_url.trim_end_matches('/'))
}

async fn read_image(path: &Path) -> Result<ImageUpload, QuestionPaperError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| QuestionPaperError::ImageReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    let mime = mime_for(&bytes);
    debug!("Read {} ({mime}, {} bytes)", path.display(), bytes.len());
    Ok(ImageUpload {
        file_name,
        mime,
        bytes,
    })
}

fn mime_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

fn build_form(
    uploads: Vec<ImageUpload>,
    overrides: &TrustedOverrides,
) -> Result<Form, QuestionPaperError> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let mut form = Form::new()
        .text("schoolName", text(&overrides.school_name))
        .text("examTitle", text(&overrides.exam_title))
        .text("className", text(&overrides.class))
        .text("subject", text(&overrides.subject))
        .text("maxMarks", overrides.max_marks.unwrap_or(0).to_string())
        .text("duration", text(&overrides.duration));

    for upload in uploads {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime)
            .map_err(|e| QuestionPaperError::validation(format!("image MIME type: {e}")))?;
        form = form.part("files", part);
    }
    Ok(form)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

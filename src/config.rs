//! Configuration for exam-paper generation.
//!
//! Everything that used to be a literal buried in a template (the school
//! address printed on the Std V English II paper, the legacy Hindi font, the
//! OCR service URL) lives in [`GeneratorConfig`] with a documented default.
//! Build one via [`GeneratorConfig::builder()`], take the defaults, or overlay
//! environment variables with [`GeneratorConfig::from_env()`].

use crate::error::QuestionPaperError;
use crate::pipeline::classify::TemplateKind;
use serde::{Deserialize, Serialize};

/// Default OCR/AI collaborator location when nothing else is configured.
pub const DEFAULT_OCR_BASE_URL: &str = "http://localhost:8001";

/// Address line printed under the school name by the Std V English II layout.
pub const DEFAULT_SCHOOL_ADDRESS: &str = "Station Road, Ghazipur, Uttar Pradesh";

/// Legacy Devanagari font the Hindi template relies on.
pub const DEFAULT_LEGACY_FONT: &str = "Kruti Dev 010";

/// Usable text width of an A4 page with 1-inch margins, in twips.
pub const A4_TEXT_WIDTH_TWIPS: u32 = 9026;

/// Configuration for a single exam-paper generation.
///
/// # Example
/// ```rust
/// use question_paper_docx::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .school_address("Civil Lines, Prayagraj")
///     .separator_width(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.separator_width, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Address line for the Std V English II header. Default: [`DEFAULT_SCHOOL_ADDRESS`].
    pub school_address: String,

    /// Base URL of the OCR/AI service. Default: [`DEFAULT_OCR_BASE_URL`].
    pub ocr_base_url: String,

    /// Timeout for the OCR call in seconds. Default: 120.
    ///
    /// Vision models take tens of seconds on a multi-page handwritten paper.
    pub ocr_timeout_secs: u64,

    /// Font family forced on every run of the legacy-font template. Default: [`DEFAULT_LEGACY_FONT`].
    pub legacy_font: String,

    /// Document default font written to `styles.xml`. Default: "Times New Roman".
    pub default_font: String,

    /// Document default font size in half-points. Default: 24 (12 pt).
    pub font_size_half_points: u32,

    /// Number of dashes in header separator lines. Default: 60.
    pub separator_width: usize,

    /// Right tab stop used for "title … (marks)" lines, in twips. Default: 9000.
    pub right_tab_position: u32,

    /// Spacing after a non-compact paragraph, in twips. Default: 160 (8 pt).
    pub spacing_after: u32,

    /// Force a template instead of classifying by class/subject. Default: None.
    pub template: Option<TemplateKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            school_address: DEFAULT_SCHOOL_ADDRESS.to_string(),
            ocr_base_url: DEFAULT_OCR_BASE_URL.to_string(),
            ocr_timeout_secs: 120,
            legacy_font: DEFAULT_LEGACY_FONT.to_string(),
            default_font: "Times New Roman".to_string(),
            font_size_half_points: 24,
            separator_width: 60,
            right_tab_position: 9000,
            spacing_after: 160,
            template: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overlaid with environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `OCR_BASE_URL` | `ocr_base_url` |
    /// | `QPAPER_OCR_TIMEOUT` | `ocr_timeout_secs` |
    /// | `QPAPER_SCHOOL_ADDRESS` | `school_address` |
    /// | `QPAPER_LEGACY_FONT` | `legacy_font` |
    ///
    /// Unparseable numeric values are ignored and the default kept.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            ocr_base_url: env_string("OCR_BASE_URL").unwrap_or(default.ocr_base_url),
            ocr_timeout_secs: env_string("QPAPER_OCR_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.ocr_timeout_secs),
            school_address: env_string("QPAPER_SCHOOL_ADDRESS").unwrap_or(default.school_address),
            legacy_font: env_string("QPAPER_LEGACY_FONT").unwrap_or(default.legacy_font),
            ..default
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Start from an existing config (e.g. [`GeneratorConfig::from_env`]).
    pub fn from_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn school_address(mut self, address: impl Into<String>) -> Self {
        self.config.school_address = address.into();
        self
    }

    pub fn ocr_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.ocr_base_url = url.into();
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs;
        self
    }

    pub fn legacy_font(mut self, font: impl Into<String>) -> Self {
        self.config.legacy_font = font.into();
        self
    }

    pub fn default_font(mut self, font: impl Into<String>) -> Self {
        self.config.default_font = font.into();
        self
    }

    pub fn font_size_half_points(mut self, size: u32) -> Self {
        self.config.font_size_half_points = size;
        self
    }

    pub fn separator_width(mut self, width: usize) -> Self {
        self.config.separator_width = width;
        self
    }

    pub fn right_tab_position(mut self, twips: u32) -> Self {
        self.config.right_tab_position = twips;
        self
    }

    pub fn spacing_after(mut self, twips: u32) -> Self {
        self.config.spacing_after = twips;
        self
    }

    pub fn template(mut self, template: TemplateKind) -> Self {
        self.config.template = Some(template);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, QuestionPaperError> {
        let c = &self.config;
        if !c.ocr_base_url.starts_with("http://") && !c.ocr_base_url.starts_with("https://") {
            return Err(QuestionPaperError::InvalidConfig(format!(
                "OCR base URL must be http:// or https://, got '{}'",
                c.ocr_base_url
            )));
        }
        if c.ocr_timeout_secs == 0 {
            return Err(QuestionPaperError::InvalidConfig(
                "OCR timeout must be ≥ 1 second".into(),
            ));
        }
        if c.legacy_font.trim().is_empty() || c.default_font.trim().is_empty() {
            return Err(QuestionPaperError::InvalidConfig(
                "Font names must not be empty".into(),
            ));
        }
        if c.font_size_half_points < 2 || c.font_size_half_points > 3276 {
            return Err(QuestionPaperError::InvalidConfig(format!(
                "Font size must be 2–3276 half-points, got {}",
                c.font_size_half_points
            )));
        }
        if c.separator_width == 0 || c.separator_width > 200 {
            return Err(QuestionPaperError::InvalidConfig(format!(
                "Separator width must be 1–200, got {}",
                c.separator_width
            )));
        }
        if c.right_tab_position == 0 || c.right_tab_position > A4_TEXT_WIDTH_TWIPS {
            return Err(QuestionPaperError::InvalidConfig(format!(
                "Right tab stop must be 1–{} twips, got {}",
                A4_TEXT_WIDTH_TWIPS, c.right_tab_position
            )));
        }
        Ok(self.config)
    }
}

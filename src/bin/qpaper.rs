//! CLI binary for question-paper-docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GeneratorConfig` / `TrustedOverrides` and writes the `.docx`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use question_paper_docx::{
    generate_from_images, generate_from_json, generate_from_ocr_json, GeneratedDocument,
    GeneratorConfig, GeneratorConfigBuilder, TemplateKind, TrustedOverrides,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  qpaper paper.json                         render a structured request
  qpaper paper.json -o out/term1.docx       choose the output path
  cat paper.json | qpaper -                 read the request from stdin
  qpaper raw.json --ocr-json --max-marks 50 --duration "2 Hours"
  qpaper --image p1.jpg --image p2.jpg --class V --subject "English II" \
         --max-marks 50 --duration "2 Hours"

TEMPLATES:
  generic          default layout, questions renumbered Q1., Q2., … per section
  std5-english-ii  chosen automatically for Class V English II
  legacy-font      every run in the legacy Hindi font (--legacy-font)

ENVIRONMENT VARIABLES:
  OCR_BASE_URL            OCR service base URL (default http://localhost:8001)
  QPAPER_OCR_TIMEOUT      OCR request timeout in seconds
  QPAPER_SCHOOL_ADDRESS   Address line of the Class V header
  QPAPER_LEGACY_FONT      Font name used by the legacy-font template
  RUST_LOG                Overrides the log filter
"#;

/// Generate print-ready Word question papers from exam data.
#[derive(Parser, Debug)]
#[command(
    name = "qpaper",
    version,
    about = "Generate print-ready Word question papers from exam data",
    long_about = "Render a structured exam paper (JSON), a raw OCR service response, or \
photographed pages sent through the OCR service into a formatted .docx question paper.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Request JSON file, or `-` for stdin. Not used with --image.
    input: Option<String>,

    /// Write the document here instead of the suggested file name.
    #[arg(short, long, env = "QPAPER_OUTPUT")]
    output: Option<PathBuf>,

    /// Treat INPUT as a raw OCR service response and repair it.
    #[arg(long)]
    ocr_json: bool,

    /// Page image to send to the OCR service (repeatable).
    #[arg(long = "image", value_name = "FILE", conflicts_with = "input")]
    images: Vec<PathBuf>,

    /// Force a template instead of choosing by class and subject.
    #[arg(long, env = "QPAPER_TEMPLATE")]
    template: Option<TemplateKind>,

    // ── Trusted fields (OCR modes) ──────────────────────────────────────
    /// School name printed in the header.
    #[arg(long)]
    school: Option<String>,

    /// Exam title, e.g. "Half Yearly Examination 2025".
    #[arg(long)]
    title: Option<String>,

    /// Class label, e.g. "V" or "Class 7".
    #[arg(long)]
    class: Option<String>,

    /// Subject label, e.g. "English II".
    #[arg(long)]
    subject: Option<String>,

    /// Maximum marks.
    #[arg(long)]
    max_marks: Option<u32>,

    /// Duration as printed, e.g. "2 Hours".
    #[arg(long)]
    duration: Option<String>,

    // ── Configuration ───────────────────────────────────────────────────
    /// OCR service base URL.
    #[arg(long, env = "OCR_BASE_URL")]
    ocr_url: Option<String>,

    /// OCR request timeout in seconds.
    #[arg(long, env = "QPAPER_OCR_TIMEOUT")]
    ocr_timeout: Option<u64>,

    /// Address line under the school name (Class V header).
    #[arg(long, env = "QPAPER_SCHOOL_ADDRESS")]
    address: Option<String>,

    /// Font name for the legacy-font template.
    #[arg(long, env = "QPAPER_LEGACY_FONT")]
    legacy_font: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "QPAPER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "QPAPER_QUIET")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> Result<GeneratorConfig> {
        let mut builder = GeneratorConfigBuilder::from_config(GeneratorConfig::from_env());
        if let Some(url) = &self.ocr_url {
            builder = builder.ocr_base_url(url);
        }
        if let Some(secs) = self.ocr_timeout {
            builder = builder.ocr_timeout_secs(secs);
        }
        if let Some(address) = &self.address {
            builder = builder.school_address(address);
        }
        if let Some(font) = &self.legacy_font {
            builder = builder.legacy_font(font);
        }
        if let Some(template) = self.template {
            builder = builder.template(template);
        }
        builder.build().context("Invalid configuration")
    }

    fn overrides(&self) -> TrustedOverrides {
        TrustedOverrides {
            school_name: self.school.clone(),
            exam_title: self.title.clone(),
            class: self.class.clone(),
            subject: self.subject.clone(),
            max_marks: self.max_marks,
            duration: self.duration.clone(),
        }
    }

    fn has_overrides(&self) -> bool {
        self.school.is_some()
            || self.title.is_some()
            || self.class.is_some()
            || self.subject.is_some()
            || self.max_marks.is_some()
            || self.duration.is_some()
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read request from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("OCR");
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = cli.config()?;

    // ── Generate ─────────────────────────────────────────────────────────
    let doc: GeneratedDocument = if !cli.images.is_empty() {
        let overrides = cli.overrides();
        let bar = (!cli.quiet).then(|| {
            spinner(&format!(
                "Reading {} page(s) via {}…",
                cli.images.len(),
                config.ocr_base_url
            ))
        });
        let result = generate_from_images(&cli.images, &overrides, &config).await;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        result.context("OCR generation failed")?
    } else {
        let Some(input) = cli.input.as_deref() else {
            bail!("Provide an INPUT file (or `-` for stdin), or at least one --image");
        };
        let body = read_input(input)?;
        if cli.ocr_json {
            generate_from_ocr_json(&body, &cli.overrides(), &config)
                .context("Failed to generate from OCR response")?
        } else {
            if cli.has_overrides() && !cli.quiet {
                eprintln!(
                    "{}",
                    dim("note: --school/--title/--class/--subject/--max-marks/--duration apply to OCR input only")
                );
            }
            generate_from_json(&body, &config).context("Failed to generate question paper")?
        }
    };

    // ── Write ────────────────────────────────────────────────────────────
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&doc.file_name));
    doc.write_to(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if !cli.quiet {
        eprintln!(
            "{} {}  {}",
            green("✓"),
            path.display(),
            dim(&format!("{} template, {} bytes", doc.template, doc.bytes.len()))
        );
    }
    Ok(())
}

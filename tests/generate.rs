//! Integration tests for question-paper-docx.
//!
//! Every test drives a public entry point and reads the produced `.docx`
//! back: `zip` to open the package, `quick-xml` to walk `word/document.xml`
//! and recover the text of each paragraph. No network access is needed; the
//! OCR test points at a closed local port.
//!
//! Run with:
//!   cargo test --test generate

use question_paper_docx::{
    generate, generate_from_images, generate_from_json, generate_from_ocr_json, generate_to_file,
    ExamPaper, GeneratorConfig, QuestionPaperError, TemplateKind, TrustedOverrides,
    DOCX_CONTENT_TYPE,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use zip::ZipArchive;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("document is a zip package");
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("{name} missing from package"))
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Plain text of every `<w:p>` in body order; `<w:tab/>` runs become `\t`.
fn paragraphs(bytes: &[u8]) -> Vec<String> {
    let xml = part(bytes, "word/document.xml");
    let mut reader = Reader::from_str(&xml);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_props = false;
    let mut in_text = false;
    loop {
        match reader.read_event().expect("well-formed document.xml") {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:pPr" => in_props = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => out.push(std::mem::take(&mut current)),
                b"w:pPr" => in_props = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) if !in_props && e.name().as_ref() == b"w:tab" => current.push('\t'),
            Event::Text(t) if in_text => current.push_str(&t.unescape().unwrap()),
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

fn request(class: &str, subject: &str, sections: &str) -> String {
    format!(
        r#"{{
            "schoolName": "Indira Gandhi Memorial Public School",
            "examTitle": "1st Terminal Examination",
            "class": "{class}",
            "subject": "{subject}",
            "maxMarks": 50,
            "duration": "2 Hours",
            "sections": {sections}
        }}"#
    )
}

// ── Direct requests ──────────────────────────────────────────────────────────

#[test]
fn generic_paper_renumbers_questions() {
    let body = request(
        "VI",
        "Science",
        r#"[
            {"name": "Section A", "questions": [
                {"number": 5, "text": "What is a cell?", "marks": 2},
                {"number": 9, "text": "Name two gases.", "marks": 2}
            ]},
            {"name": "Section B", "questions": [
                {"number": 14, "text": "Explain osmosis.", "marks": 5}
            ]}
        ]"#,
    );
    let doc = generate_from_json(&body, &GeneratorConfig::default()).unwrap();
    assert_eq!(doc.template, TemplateKind::Generic);
    assert_eq!(doc.content_type, DOCX_CONTENT_TYPE);
    assert!(doc.file_name.starts_with("QuestionPaper_Science_"));
    assert!(doc.file_name.ends_with(".docx"));

    let paras = paragraphs(&doc.bytes);
    assert_eq!(paras[0], "Indira Gandhi Memorial Public School");
    assert!(paras.contains(&"Class: VI    Subject: Science".to_string()));
    assert!(paras.contains(&"Section A\t(2)".to_string()));
    assert!(paras.contains(&"Q1. What is a cell?".to_string()));
    assert!(paras.contains(&"Q2. Name two gases.".to_string()));
    assert!(paras.contains(&"Q1. Explain osmosis.".to_string()));
    assert!(!paras.iter().any(|p| p.starts_with("Q5.") || p.starts_with("Q14.")));
}

#[test]
fn std5_english_ii_round_trip() {
    let body = request(
        "5",
        "English II",
        r#"[{"name": "Q.No.1", "questions": [
            {"number": 1, "text": "Name the author", "marks": 10},
            {"number": 2, "text": "Define noun", "marks": 0}
        ]}]"#,
    );
    let doc = generate_from_json(&body, &GeneratorConfig::default()).unwrap();
    assert_eq!(doc.template, TemplateKind::Std5EnglishII);

    let paras = paragraphs(&doc.bytes);
    assert_eq!(paras[0], "Class – 5  Date: ______  Subject – English II");
    assert_eq!(paras[2], "Station Road, Ghazipur, Uttar Pradesh");
    let group = paras.iter().position(|p| p == "Q.No.1    (10)").unwrap();
    assert_eq!(paras[group + 1], "a) Name the author");
    assert_eq!(paras[group + 2], "b) Define noun");
    assert_eq!(paras[group + 3], "");
}

#[test]
fn section_marks_follow_first_question_only() {
    let body = request(
        "VI",
        "Science",
        r#"[{"name": "Section B", "questions": [
            {"number": 1, "text": "x", "marks": 0},
            {"number": 2, "text": "y", "marks": 5}
        ]}]"#,
    );
    let doc = generate_from_json(&body, &GeneratorConfig::default()).unwrap();
    let paras = paragraphs(&doc.bytes);
    assert!(paras.contains(&"Section B".to_string()));
    assert!(!paras.iter().any(|p| p.starts_with("Section B\t")));
}

#[test]
fn empty_sections_are_rejected() {
    let err = generate_from_json(&request("VI", "Science", "[]"), &GeneratorConfig::default())
        .unwrap_err();
    assert!(matches!(err, QuestionPaperError::Validation { .. }), "{err:?}");

    let err = generate_from_json(r#"{"class": "VI", "subject": "Maths"}"#, &GeneratorConfig::default())
        .unwrap_err();
    assert!(matches!(err, QuestionPaperError::Validation { .. }), "{err:?}");
}

#[test]
fn mistyped_request_is_rejected() {
    let body = request(
        "VI",
        "Science",
        r#"[{"name": "A", "questions": [{"number": 1, "text": "x", "marks": "two"}]}]"#,
    );
    let err = generate_from_json(&body, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, QuestionPaperError::Validation { .. }), "{err:?}");
}

#[test]
fn legacy_font_template_sets_font_on_runs() {
    let paper = ExamPaper::from_json(&request(
        "VII",
        "Hindi",
        r#"[{"name": "k[k.M v", "questions": [{"number": 3, "text": "laKk", "marks": 2}]}]"#,
    ))
    .unwrap();
    let config = GeneratorConfig::builder()
        .template(TemplateKind::LegacyFont)
        .build()
        .unwrap();
    let doc = generate(&paper, &config).unwrap();
    assert_eq!(doc.template, TemplateKind::LegacyFont);

    let xml = part(&doc.bytes, "word/document.xml");
    assert!(xml.contains(r#"w:ascii="Kruti Dev 010""#));
    assert!(xml.contains(r#"w:cs="Kruti Dev 010""#));
    assert!(paragraphs(&doc.bytes).contains(&"Q3. laKk   [2 Marks]".to_string()));
}

#[test]
fn package_metadata_and_special_characters() {
    let body = request(
        "VIII",
        "Maths & Logic",
        r#"[{"name": "A", "questions": [{"number": 1, "text": "Is 3 < 5 > 2?", "marks": 1}]}]"#,
    );
    let doc = generate_from_json(&body, &GeneratorConfig::default()).unwrap();
    let core = part(&doc.bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>1st Terminal Examination</dc:title>"));
    assert!(core.contains("<dc:subject>Maths &amp; Logic</dc:subject>"));
    assert!(paragraphs(&doc.bytes).contains(&"Q1. Is 3 < 5 > 2?".to_string()));
    assert!(doc.file_name.starts_with("QuestionPaper_Maths_Logic_"));
}

#[test]
fn generate_to_file_writes_package() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers").join("science.docx");
    let paper = ExamPaper::from_json(&request(
        "VI",
        "Science",
        r#"[{"name": "A", "questions": [{"number": 1, "text": "x", "marks": 1}]}]"#,
    ))
    .unwrap();
    let doc = generate_to_file(&paper, &path, &GeneratorConfig::default()).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, doc.bytes);
    assert!(paragraphs(&written).contains(&"Q1. x".to_string()));
}

// ── OCR input ────────────────────────────────────────────────────────────────

#[test]
fn ocr_response_is_repaired_and_overridden() {
    let raw = r#"```json
{
  "className": "Std V",
  "subject": "english 2",
  "maxMarks": 999,
  "duration": "??",
  "sections": {
    "name": "Q.No.1",
    "questions": [
      {"number": "1", "text": "Name the author", "marks": "10 marks"},
      {"text": "Define noun", "marks": null}
    ]
  }
}
```"#;
    let overrides = TrustedOverrides::new(80, "3 Hours");
    let doc = generate_from_ocr_json(raw, &overrides, &GeneratorConfig::default()).unwrap();
    assert_eq!(doc.template, TemplateKind::Std5EnglishII);
    assert!(doc.file_name.starts_with("QuestionPaper_Std_V_english_2_"));

    let paras = paragraphs(&doc.bytes);
    assert!(paras.contains(&"Time: 3 Hours  Full Marks: 80".to_string()));
    assert!(paras.contains(&"Q.No.1    (10)".to_string()));
    assert!(paras.contains(&"a) Name the author".to_string()));
    assert!(paras.contains(&"b) Define noun".to_string()));
}

#[test]
fn trusted_class_and_subject_drive_template() {
    let raw = r#"{"class": "VI", "subject": "Science", "sections": [
        {"name": "Q.No.1", "questions": [{"number": 1, "text": "Name the author", "marks": 10}]}
    ]}"#;
    let overrides = TrustedOverrides::new(50, "2 Hours")
        .class("V")
        .subject("English II");
    let doc = generate_from_ocr_json(raw, &overrides, &GeneratorConfig::default()).unwrap();
    assert_eq!(doc.template, TemplateKind::Std5EnglishII);
    assert!(doc.file_name.starts_with("QuestionPaper_V_English_II_"));
}

#[test]
fn non_object_ocr_response_is_malformed() {
    let err = generate_from_ocr_json(
        "Sorry, I could not read the image.",
        &TrustedOverrides::new(50, "2 Hours"),
        &GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QuestionPaperError::MalformedInput { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_ocr_service_is_upstream_error() {
    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(b"\x89PNG\r\n\x1a\nnot really a png").unwrap();

    // Port 9 (discard) is closed on loopback in test environments.
    let config = GeneratorConfig::builder()
        .ocr_base_url("http://127.0.0.1:9")
        .ocr_timeout_secs(5)
        .build()
        .unwrap();
    let images = vec![PathBuf::from(image.path())];
    let err = generate_from_images(&images, &TrustedOverrides::new(50, "2 Hours"), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, QuestionPaperError::Upstream { .. }), "{err:?}");
}

#[test]
fn missing_image_fails_before_upload() {
    let images = vec![PathBuf::from("/nonexistent/qpaper/page-1.jpg")];
    let err = tokio_test::block_on(generate_from_images(
        &images,
        &TrustedOverrides::new(50, "2 Hours"),
        &GeneratorConfig::default(),
    ))
    .unwrap_err();
    match err {
        QuestionPaperError::ImageReadFailed { path, .. } => assert_eq!(path, images[0]),
        other => panic!("expected ImageReadFailed, got {other:?}"),
    }
}

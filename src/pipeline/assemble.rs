//! DOCX assembly: styled blocks → in-memory OOXML package.
//!
//! A `.docx` is a ZIP archive of XML parts. We write the smallest set Word,
//! LibreOffice, and Google Docs all open without complaint:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml          title / subject / created
//! word/document.xml          one <w:p> per block, then <w:sectPr>
//! word/styles.xml            document default font and size
//! word/_rels/document.xml.rels
//! ```
//!
//! XML is produced with `quick_xml::Writer`, so text and attribute values are
//! escaped by the writer rather than by hand. Any failure aborts the whole
//! package; a half-written archive is never returned.

use crate::config::GeneratorConfig;
use crate::error::QuestionPaperError;
use crate::pipeline::format::{Alignment, Block, Run, RunContent, RunStyle};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a WordprocessingML document.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// A4 portrait with 1-inch margins, in twips.
const PAGE_WIDTH: &str = "11906";
const PAGE_HEIGHT: &str = "16838";
const PAGE_MARGIN: &str = "1440";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Package-level metadata written to `docProps/core.xml`.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    /// Omitted from the package when `None`, which keeps output byte-stable.
    pub created: Option<DateTime<Utc>>,
}

/// Build a complete `.docx` from `blocks`, preserving their order exactly.
pub fn assemble(
    blocks: &[Block],
    info: &DocumentInfo,
    config: &GeneratorConfig,
) -> Result<Vec<u8>, QuestionPaperError> {
    let document = document_xml(blocks)?;
    let styles = styles_xml(config)?;
    let core = core_xml(info)?;

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("docProps/core.xml", core.as_slice()),
        ("word/document.xml", document.as_slice()),
        ("word/styles.xml", styles.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in parts {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)
            .map_err(QuestionPaperError::assembly)?;
        zip.write_all(bytes).map_err(QuestionPaperError::assembly)?;
    }
    let bytes = zip
        .finish()
        .map_err(QuestionPaperError::assembly)?
        .into_inner();

    debug!("Assembled {} blocks into {} bytes of DOCX", blocks.len(), bytes.len());
    Ok(bytes)
}

// ── word/document.xml ───────────────────────────────────────────────────────

fn document_xml(blocks: &[Block]) -> Result<Vec<u8>, QuestionPaperError> {
    let mut xml = Xml::new()?;
    xml.open("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
    xml.open("w:body", &[])?;
    for block in blocks {
        write_paragraph(&mut xml, block)?;
    }
    xml.open("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", PAGE_WIDTH), ("w:h", PAGE_HEIGHT)])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", PAGE_MARGIN),
            ("w:right", PAGE_MARGIN),
            ("w:bottom", PAGE_MARGIN),
            ("w:left", PAGE_MARGIN),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;
    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn write_paragraph(xml: &mut Xml, block: &Block) -> Result<(), QuestionPaperError> {
    xml.open("w:p", &[])?;

    // Child order inside pPr is fixed by the schema: tabs, spacing, jc.
    xml.open("w:pPr", &[])?;
    if let Some(pos) = block.right_tab_stop {
        let pos = pos.to_string();
        xml.open("w:tabs", &[])?;
        xml.empty("w:tab", &[("w:val", "right"), ("w:pos", pos.as_str())])?;
        xml.close("w:tabs")?;
    }
    let after = block.spacing_after.to_string();
    xml.empty("w:spacing", &[("w:after", after.as_str())])?;
    if block.alignment == Alignment::Center {
        xml.empty("w:jc", &[("w:val", "center")])?;
    }
    xml.close("w:pPr")?;

    for run in &block.runs {
        write_run(xml, run)?;
    }
    xml.close("w:p")
}

fn write_run(xml: &mut Xml, run: &Run) -> Result<(), QuestionPaperError> {
    xml.open("w:r", &[])?;
    write_run_properties(xml, &run.style)?;
    match &run.content {
        RunContent::Tab => xml.empty("w:tab", &[])?,
        RunContent::Text(text) => {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    xml.empty("w:br", &[])?;
                }
                for (j, piece) in line.split('\t').enumerate() {
                    if j > 0 {
                        xml.empty("w:tab", &[])?;
                    }
                    xml.open("w:t", &[("xml:space", "preserve")])?;
                    xml.text(&xml_safe(piece))?;
                    xml.close("w:t")?;
                }
            }
        }
    }
    xml.close("w:r")
}

fn write_run_properties(xml: &mut Xml, style: &RunStyle) -> Result<(), QuestionPaperError> {
    if !style.bold && !style.italic && style.font.is_none() {
        return Ok(());
    }
    xml.open("w:rPr", &[])?;
    if let Some(font) = style.font.as_deref() {
        xml.empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
        )?;
    }
    if style.bold {
        xml.empty("w:b", &[])?;
        xml.empty("w:bCs", &[])?;
    }
    if style.italic {
        xml.empty("w:i", &[])?;
        xml.empty("w:iCs", &[])?;
    }
    xml.close("w:rPr")
}

/// Drop characters XML 1.0 cannot carry (stray OCR control codes, `\r`).
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| {
            matches!(*c,
                '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
        })
        .collect()
}

// ── word/styles.xml ─────────────────────────────────────────────────────────

fn styles_xml(config: &GeneratorConfig) -> Result<Vec<u8>, QuestionPaperError> {
    let font = config.default_font.as_str();
    let size = config.font_size_half_points.to_string();
    let size = size.as_str();
    let spacing = config.spacing_after.to_string();

    let mut xml = Xml::new()?;
    xml.open("w:styles", &[("xmlns:w", NS_W)])?;
    xml.open("w:docDefaults", &[])?;
    xml.open("w:rPrDefault", &[])?;
    xml.open("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:cs", font),
            ("w:eastAsia", font),
        ],
    )?;
    xml.empty("w:sz", &[("w:val", size)])?;
    xml.empty("w:szCs", &[("w:val", size)])?;
    xml.close("w:rPr")?;
    xml.close("w:rPrDefault")?;
    xml.open("w:pPrDefault", &[])?;
    xml.open("w:pPr", &[])?;
    xml.empty(
        "w:spacing",
        &[("w:after", spacing.as_str()), ("w:line", "259"), ("w:lineRule", "auto")],
    )?;
    xml.close("w:pPr")?;
    xml.close("w:pPrDefault")?;
    xml.close("w:docDefaults")?;
    xml.open(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.close("w:style")?;
    xml.close("w:styles")?;
    Ok(xml.finish())
}

// ── docProps/core.xml ───────────────────────────────────────────────────────

fn core_xml(info: &DocumentInfo) -> Result<Vec<u8>, QuestionPaperError> {
    let mut xml = Xml::new()?;
    xml.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.element("dc:title", &[], &xml_safe(&info.title))?;
    xml.element("dc:subject", &[], &xml_safe(&info.subject))?;
    xml.element("dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    if let Some(created) = info.created {
        let stamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        xml.element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    }
    xml.close("cp:coreProperties")?;
    Ok(xml.finish())
}

// ── XML writer wrapper ──────────────────────────────────────────────────────

struct Xml {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Xml {
    fn new() -> Result<Self, QuestionPaperError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(QuestionPaperError::assembly)?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), QuestionPaperError> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attrs {
            start.push_attribute((key, value));
        }
        self.writer
            .write_event(Event::Start(start))
            .map_err(QuestionPaperError::assembly)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), QuestionPaperError> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attrs {
            start.push_attribute((key, value));
        }
        self.writer
            .write_event(Event::Empty(start))
            .map_err(QuestionPaperError::assembly)
    }

    fn close(&mut self, name: &str) -> Result<(), QuestionPaperError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(QuestionPaperError::assembly)
    }

    fn text(&mut self, text: &str) -> Result<(), QuestionPaperError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(QuestionPaperError::assembly)
    }

    fn element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), QuestionPaperError> {
        self.open(name, attrs)?;
        self.text(text)?;
        self.close(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}

//! Template renderers: exam paper → ordered list of styled blocks.
//!
//! Each layout is a single linear pass over the paper with no state beyond a
//! counter. The set of layouts is closed, so dispatch is a `match` over
//! [`TemplateKind`] rather than a registry.
//!
//! | Template | Question line | Section title |
//! |----------|---------------|---------------|
//! | [`GenericRenderer`] | `Q{i}.` renumbered per section | `name<TAB>(marks)` when the first question carries marks |
//! | [`Std5EnglishRenderer`] | `a)`, `b)`, … from the question number | `name    (marks)` |
//! | [`LegacyFontRenderer`] | `Q{number}. … [n Marks]` | bold name, legacy font everywhere |

mod generic;
mod legacy_font;
mod std5_english;

pub use generic::GenericRenderer;
pub use legacy_font::LegacyFontRenderer;
pub use std5_english::Std5EnglishRenderer;

use crate::config::GeneratorConfig;
use crate::model::ExamPaper;
use crate::pipeline::classify::TemplateKind;
use crate::pipeline::format::{Block, BlockStyle, Formatter};

/// A layout that turns a paper into document blocks.
pub trait Renderer {
    fn render(&self, paper: &ExamPaper) -> Vec<Block>;
}

/// Render `paper` with the layout identified by `kind`.
pub fn render(kind: TemplateKind, paper: &ExamPaper, config: &GeneratorConfig) -> Vec<Block> {
    match kind {
        TemplateKind::Generic => GenericRenderer::new(config).render(paper),
        TemplateKind::Std5EnglishII => Std5EnglishRenderer::new(config).render(paper),
        TemplateKind::LegacyFont => LegacyFontRenderer::new(config).render(paper),
    }
}

/// School, title, class/subject, marks/duration, dashed rule.
///
/// Shared by the generic and legacy-font layouts; `font` is forced on every
/// run when set.
fn standard_header(
    paper: &ExamPaper,
    fmt: &Formatter,
    separator_width: usize,
    font: Option<&str>,
) -> Vec<Block> {
    let plain = BlockStyle::plain().font(font);
    let heading = plain.clone().bold().center();

    let mut blocks = Vec::with_capacity(6);
    if !paper.school_name.trim().is_empty() {
        blocks.push(fmt.paragraph(paper.school_name.as_str(), &heading));
    }
    if !paper.exam_title.trim().is_empty() {
        blocks.push(fmt.paragraph(paper.exam_title.as_str(), &heading));
    }
    blocks.push(fmt.blank(&plain));
    blocks.push(fmt.paragraph(
        format!("Class: {}    Subject: {}", paper.class, paper.subject),
        &plain,
    ));
    blocks.push(fmt.paragraph(
        format!("Max Marks: {}    Duration: {}", paper.max_marks, paper.duration),
        &plain,
    ));
    blocks.push(fmt.paragraph("-".repeat(separator_width), &plain));
    blocks
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn dispatch_matches_template() {
        let config = GeneratorConfig::default();
        let p = paper("V", "English II", vec![section("Q.No.1", vec![question(1, "Name the author", 10)])]);

        let generic = render(TemplateKind::Generic, &p, &config);
        assert!(generic.iter().any(|b| b.text() == "Q1. Name the author"));

        let std5 = render(TemplateKind::Std5EnglishII, &p, &config);
        assert!(std5.iter().any(|b| b.text() == "a) Name the author"));

        let legacy = render(TemplateKind::LegacyFont, &p, &config);
        assert!(legacy.iter().all(|b| b.font() == Some("Kruti Dev 010")));
    }

    #[test]
    fn header_skips_blank_school_and_title() {
        let config = GeneratorConfig::default();
        let mut p = paper("VI", "EVS", vec![section("A", vec![])]);
        p.school_name = "  ".into();
        p.exam_title.clear();
        let fmt = Formatter::new(&config);
        let header = standard_header(&p, &fmt, 60, None);
        assert_eq!(header[0].text(), "");
        assert_eq!(header[1].text(), "Class: VI    Subject: EVS");
        assert_eq!(header.len(), 4);
    }
}

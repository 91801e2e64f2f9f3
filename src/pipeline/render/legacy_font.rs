use super::{standard_header, Renderer};
use crate::config::GeneratorConfig;
use crate::model::{ExamPaper, Section};
use crate::pipeline::format::{Block, BlockStyle, Formatter};

/// Generic layout for papers typed in a legacy Devanagari font.
///
/// Text in these papers is stored in the font's private 8-bit mapping, so it
/// only reads as Hindi when every run is set in that exact font, in all three
/// font slots. Questions keep their stored numbers and show their own marks.
///
/// Not reachable from [`crate::pipeline::classify::classify`]; select it with
/// [`crate::TemplateKind::LegacyFont`].
#[derive(Debug, Clone)]
pub struct LegacyFontRenderer {
    fmt: Formatter,
    separator_width: usize,
    font: String,
}

impl LegacyFontRenderer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            fmt: Formatter::new(config),
            separator_width: config.separator_width,
            font: config.legacy_font.clone(),
        }
    }

    fn style(&self) -> BlockStyle {
        BlockStyle::plain().font(Some(self.font.as_str()))
    }

    fn section(&self, section: &Section, blocks: &mut Vec<Block>) {
        if !section.name.trim().is_empty() {
            blocks.push(self.fmt.paragraph(section.name.as_str(), &self.style().bold()));
        }
        if let Some(instructions) = section.instructions_text() {
            blocks.push(self.fmt.paragraph(instructions, &self.style().italic()));
        }
        for q in &section.questions {
            blocks.push(self.fmt.paragraph(
                format!("Q{}. {}   [{} Marks]", q.number, q.text, q.marks),
                &self.style(),
            ));
        }
        blocks.push(self.fmt.blank(&self.style()));
    }
}

impl Renderer for LegacyFontRenderer {
    fn render(&self, paper: &ExamPaper) -> Vec<Block> {
        let font = Some(self.font.as_str());
        let mut blocks = standard_header(paper, &self.fmt, self.separator_width, font);
        for section in &paper.sections {
            self.section(section, &mut blocks);
        }
        blocks
    }
}

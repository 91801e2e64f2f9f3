use super::{standard_header, Renderer};
use crate::config::GeneratorConfig;
use crate::model::{ExamPaper, Section};
use crate::pipeline::format::{Block, BlockStyle, Formatter};

/// Default layout for any class/subject without a dedicated template.
///
/// Questions are renumbered from `Q1.` inside every section; the stored
/// question number is ignored. The section title carries a right-aligned
/// `(marks)` only when the section's first question has positive marks.
#[derive(Debug, Clone)]
pub struct GenericRenderer {
    fmt: Formatter,
    separator_width: usize,
}

impl GenericRenderer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            fmt: Formatter::new(config),
            separator_width: config.separator_width,
        }
    }

    fn section(&self, section: &Section, blocks: &mut Vec<Block>) {
        let title = BlockStyle::plain().bold();
        let lead_marks = section.first_question_marks();
        if lead_marks > 0 {
            blocks.push(self.fmt.right_aligned_pair(
                section.name.as_str(),
                format!("({lead_marks})"),
                &title,
            ));
        } else if !section.name.trim().is_empty() {
            blocks.push(self.fmt.paragraph(section.name.as_str(), &title));
        }

        if let Some(instructions) = section.instructions_text() {
            blocks.push(self.fmt.paragraph(instructions, &BlockStyle::plain().italic()));
        }

        let question = BlockStyle::plain().compact();
        for (i, q) in section.questions.iter().enumerate() {
            blocks.push(self.fmt.paragraph(format!("Q{}. {}", i + 1, q.text), &question));
        }

        blocks.push(self.fmt.blank(&BlockStyle::plain()));
    }
}

impl Renderer for GenericRenderer {
    fn render(&self, paper: &ExamPaper) -> Vec<Block> {
        let mut blocks = standard_header(paper, &self.fmt, self.separator_width, None);
        for section in &paper.sections {
            self.section(section, &mut blocks);
        }
        blocks
    }
}

use super::Renderer;
use crate::config::GeneratorConfig;
use crate::model::{ExamPaper, Section};
use crate::pipeline::format::{Block, BlockStyle, Formatter};

/// Layout for the Class V English II paper.
///
/// Each section is one numbered question group (`Q.No.1    (10)`) and its
/// questions are lettered `a)`, `b)`, … from their stored number, which is
/// assumed to start at 1 within the group.
#[derive(Debug, Clone)]
pub struct Std5EnglishRenderer {
    fmt: Formatter,
    separator_width: usize,
    address: String,
}

impl Std5EnglishRenderer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            fmt: Formatter::new(config),
            separator_width: config.separator_width,
            address: config.school_address.clone(),
        }
    }

    fn header(&self, paper: &ExamPaper) -> Vec<Block> {
        let bold = BlockStyle::plain().bold();
        let centered = BlockStyle::plain().center();

        let mut blocks = vec![self.fmt.paragraph(
            format!(
                "Class – {}  Date: ______  Subject – {}",
                paper.class, paper.subject
            ),
            &bold,
        )];
        if !paper.school_name.trim().is_empty() {
            blocks.push(self.fmt.paragraph(paper.school_name.as_str(), &centered));
        }
        if !self.address.trim().is_empty() {
            blocks.push(self.fmt.paragraph(self.address.as_str(), &centered));
        }
        if !paper.exam_title.trim().is_empty() {
            blocks.push(self.fmt.paragraph(paper.exam_title.as_str(), &centered));
        }
        blocks.push(self.fmt.paragraph(
            format!("Time: {}  Full Marks: {}", paper.duration, paper.max_marks),
            &bold,
        ));
        blocks.push(self.fmt.paragraph("-".repeat(self.separator_width), &centered));
        blocks
    }

    fn group(&self, section: &Section, blocks: &mut Vec<Block>) {
        blocks.push(self.fmt.paragraph(
            format!("{}    ({})", section.name, section.first_question_marks()),
            &BlockStyle::plain().bold(),
        ));

        if let Some(instructions) = section.instructions_text() {
            blocks.push(self.fmt.paragraph(instructions, &BlockStyle::plain().italic()));
        }

        let item = BlockStyle::plain().compact();
        for q in &section.questions {
            blocks.push(
                self.fmt
                    .paragraph(format!("{}) {}", question_letter(q.number), q.text), &item),
            );
        }

        blocks.push(self.fmt.blank(&BlockStyle::plain()));
    }
}

impl Renderer for Std5EnglishRenderer {
    fn render(&self, paper: &ExamPaper) -> Vec<Block> {
        let mut blocks = self.header(paper);
        for section in &paper.sections {
            self.group(section, &mut blocks);
        }
        blocks
    }
}

/// `1 → "a"`, `2 → "b"`, … `26 → "z"`.
///
/// Numbers outside 1–26 cannot be lettered and are printed as digits.
fn question_letter(number: u32) -> String {
    match number {
        1..=26 => char::from(b'a' + (number - 1) as u8).to_string(),
        _ => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn render(paper: &ExamPaper) -> Vec<Block> {
        Std5EnglishRenderer::new(&GeneratorConfig::default()).render(paper)
    }

    #[test]
    fn question_letters() {
        assert_eq!(question_letter(1), "a");
        assert_eq!(question_letter(2), "b");
        assert_eq!(question_letter(26), "z");
        assert_eq!(question_letter(0), "0");
        assert_eq!(question_letter(27), "27");
    }

    #[test]
    fn header_layout() {
        let p = paper("V", "English II", vec![section("Q.No.1", vec![])]);
        let blocks = render(&p);
        assert_eq!(blocks[0].text(), "Class – V  Date: ______  Subject – English II");
        assert!(blocks[0].is_bold());
        assert_eq!(blocks[1].text(), "Indira Gandhi Memorial Public School");
        assert!(blocks[1].is_centered());
        assert!(!blocks[1].is_bold());
        assert_eq!(blocks[2].text(), GeneratorConfig::default().school_address);
        assert!(blocks[2].is_centered());
        assert_eq!(blocks[3].text(), "1st Terminal Examination 2025–2026");
        assert!(blocks[3].is_centered());
        assert!(!blocks[3].is_bold());
        assert_eq!(blocks[4].text(), "Time: 2 Hours  Full Marks: 100");
        assert!(blocks[4].is_bold());
        assert_eq!(blocks[5].text(), "-".repeat(60));
        assert!(blocks[5].is_centered());
    }

    #[test]
    fn configured_address_is_used() {
        let config = GeneratorConfig::builder()
            .school_address("Civil Lines, Prayagraj")
            .build()
            .unwrap();
        let blocks = Std5EnglishRenderer::new(&config).render(&paper("V", "English II", vec![]));
        assert_eq!(blocks[2].text(), "Civil Lines, Prayagraj");
    }

    #[test]
    fn question_group_round_trip() {
        let p = paper(
            "5",
            "English II",
            vec![section(
                "Q.No.1",
                vec![question(1, "Name the author", 10), question(2, "Define noun", 0)],
            )],
        );
        let blocks = render(&p);
        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts[6], "Q.No.1    (10)");
        assert!(blocks[6].is_bold());
        assert_eq!(texts[7], "a) Name the author");
        assert_eq!(texts[8], "b) Define noun");
        assert_eq!(texts[9], "");
    }

    #[test]
    fn unmarked_group_shows_zero() {
        let p = paper(
            "V",
            "English II",
            vec![section("Q.No.2", vec![question(1, "x", 0), question(2, "y", 4)])],
        );
        assert_eq!(render(&p)[6].text(), "Q.No.2    (0)");
    }
}

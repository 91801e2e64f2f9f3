//! Paragraph/run formatter: the only place that turns visual intent into blocks.
//!
//! Renderers say *what* a line should look like (bold, centred, compact, a
//! particular font, a "title … (marks)" pair) and get back a [`Block`]. They
//! never set tab positions or spacing values themselves, so every template
//! stays consistent with [`GeneratorConfig`].
//!
//! Text is stored verbatim. Exam papers rely on hand-spaced separators such as
//! `"Date: ______"` and runs of dashes, so nothing here trims or collapses
//! whitespace; the assembler writes every run with `xml:space="preserve"`.

use crate::config::GeneratorConfig;

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// Character formatting shared by every run in a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    /// Applied to the ascii, hAnsi, and complex-script font slots alike.
    pub font: Option<String>,
}

/// What a run contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Tab,
}

/// One run of uniformly formatted content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub content: RunContent,
    pub style: RunStyle,
}

/// One styled paragraph, the output primitive of every renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub alignment: Alignment,
    /// Space after the paragraph, in twips.
    pub spacing_after: u32,
    /// Right-aligned tab stop position, in twips.
    pub right_tab_stop: Option<u32>,
    pub runs: Vec<Run>,
}

impl Block {
    /// Plain text of the block; tabs are rendered as `\t`.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match &run.content {
                RunContent::Text(t) => t.as_str(),
                RunContent::Tab => "\t",
            })
            .collect()
    }

    /// True when every run is bold.
    pub fn is_bold(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(|r| r.style.bold)
    }

    /// True when every run is italic.
    pub fn is_italic(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(|r| r.style.italic)
    }

    /// True for centre-aligned paragraphs.
    pub fn is_centered(&self) -> bool {
        self.alignment == Alignment::Center
    }

    /// Font forced on every run, if they all agree on one.
    pub fn font(&self) -> Option<&str> {
        let first = self.runs.first()?.style.font.as_deref()?;
        self.runs
            .iter()
            .all(|r| r.style.font.as_deref() == Some(first))
            .then_some(first)
    }
}

/// Visual intent for one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStyle {
    pub bold: bool,
    pub italic: bool,
    pub center: bool,
    /// Zero space after the paragraph (dense question lists).
    pub compact: bool,
    pub font: Option<String>,
}

impl BlockStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn center(mut self) -> Self {
        self.center = true;
        self
    }

    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    pub fn font(mut self, font: Option<&str>) -> Self {
        self.font = font.map(str::to_string);
        self
    }

    fn run_style(&self) -> RunStyle {
        RunStyle {
            bold: self.bold,
            italic: self.italic,
            font: self.font.clone(),
        }
    }
}

/// Builds [`Block`]s using the spacing and tab settings of a config.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    spacing_after: u32,
    right_tab_position: u32,
}

impl Formatter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            spacing_after: config.spacing_after,
            right_tab_position: config.right_tab_position,
        }
    }

    /// A single-run paragraph.
    pub fn paragraph(&self, text: impl Into<String>, style: &BlockStyle) -> Block {
        Block {
            alignment: self.alignment(style),
            spacing_after: self.spacing(style),
            right_tab_stop: None,
            runs: vec![Run {
                content: RunContent::Text(text.into()),
                style: style.run_style(),
            }],
        }
    }

    /// An empty paragraph, used as a vertical gap.
    pub fn blank(&self, style: &BlockStyle) -> Block {
        self.paragraph("", style)
    }

    /// `title<TAB>value` with the value pushed against a right tab stop.
    pub fn right_aligned_pair(
        &self,
        title: impl Into<String>,
        value: impl Into<String>,
        style: &BlockStyle,
    ) -> Block {
        let run_style = style.run_style();
        Block {
            alignment: Alignment::Left,
            spacing_after: self.spacing(style),
            right_tab_stop: Some(self.right_tab_position),
            runs: vec![
                Run {
                    content: RunContent::Text(title.into()),
                    style: run_style.clone(),
                },
                Run {
                    content: RunContent::Tab,
                    style: run_style.clone(),
                },
                Run {
                    content: RunContent::Text(value.into()),
                    style: run_style,
                },
            ],
        }
    }

    fn spacing(&self, style: &BlockStyle) -> u32 {
        if style.compact {
            0
        } else {
            self.spacing_after
        }
    }

    fn alignment(&self, style: &BlockStyle) -> Alignment {
        if style.center {
            Alignment::Center
        } else {
            Alignment::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> Formatter {
        Formatter::new(&GeneratorConfig::default())
    }

    #[test]
    fn whitespace_is_preserved() {
        let block = formatter().paragraph("  Date: ______  ", &BlockStyle::plain());
        assert_eq!(block.text(), "  Date: ______  ");
    }

    #[test]
    fn compact_removes_spacing() {
        let f = formatter();
        assert_eq!(f.paragraph("x", &BlockStyle::plain()).spacing_after, 160);
        assert_eq!(f.paragraph("x", &BlockStyle::plain().compact()).spacing_after, 0);
    }

    #[test]
    fn style_flags_reach_runs() {
        let block = formatter().paragraph("Title", &BlockStyle::plain().bold().center());
        assert!(block.is_bold());
        assert!(block.is_centered());
        assert!(!block.is_italic());
        assert_eq!(block.font(), None);
    }

    #[test]
    fn font_override_on_every_run() {
        let style = BlockStyle::plain().font(Some("Kruti Dev 010"));
        let block = formatter().right_aligned_pair("Section A", "(5)", &style);
        assert_eq!(block.font(), Some("Kruti Dev 010"));
    }

    #[test]
    fn right_aligned_pair_layout() {
        let block = formatter().right_aligned_pair("Section A", "(10)", &BlockStyle::plain().bold());
        assert_eq!(block.text(), "Section A\t(10)");
        assert_eq!(block.right_tab_stop, Some(9000));
        assert_eq!(block.runs.len(), 3);
        assert_eq!(block.runs[1].content, RunContent::Tab);
        assert!(block.is_bold());
    }

    #[test]
    fn tab_stop_follows_config() {
        let config = GeneratorConfig::builder().right_tab_position(8000).build().unwrap();
        let block = Formatter::new(&config).right_aligned_pair("a", "b", &BlockStyle::plain());
        assert_eq!(block.right_tab_stop, Some(8000));
    }

    #[test]
    fn block_queries_need_every_run() {
        let run = |bold: bool, font: Option<&str>| Run {
            content: RunContent::Text("x".into()),
            style: RunStyle {
                bold,
                italic: false,
                font: font.map(str::to_string),
            },
        };
        let mixed = Block {
            alignment: Alignment::Left,
            spacing_after: 0,
            right_tab_stop: None,
            runs: vec![run(true, Some("A")), run(false, Some("B"))],
        };
        assert!(!mixed.is_bold());
        assert!(!mixed.is_italic());
        assert!(!mixed.is_centered());
        assert_eq!(mixed.font(), None);

        let empty = Block {
            runs: vec![],
            ..mixed
        };
        assert!(!empty.is_bold());
        assert_eq!(empty.font(), None);
    }
}

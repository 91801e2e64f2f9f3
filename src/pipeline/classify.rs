//! Template selection from class and subject labels.
//!
//! Teachers type class and subject freely ("V", "Std 5", "ENGLISH 2"), so both
//! labels are trimmed, lowercased, and whitespace-collapsed before being
//! matched against fixed spelling sets. The function is total: anything that
//! is not recognised falls back to [`TemplateKind::Generic`].
//!
//! Adding a layout means adding a variant here, a spelling set, and a
//! renderer in [`crate::pipeline::render`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The closed set of layouts a paper can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// School-neutral layout used for every unrecognised class/subject.
    #[default]
    Generic,
    /// Class V, English II paper with lettered sub-questions.
    #[serde(rename = "std5-english-ii")]
    Std5EnglishII,
    /// Generic layout with every run in a legacy Devanagari font.
    ///
    /// Never chosen by [`classify`]; select it explicitly.
    LegacyFont,
}

const STD5_CLASSES: &[&str] = &[
    "v",
    "5",
    "std v",
    "std 5",
    "std. v",
    "standard v",
    "standard 5",
    "class v",
    "class 5",
];

const ENGLISH_II_SUBJECTS: &[&str] = &[
    "english ii",
    "english 2",
    "english second",
    "english-ii",
    "english - ii",
];

/// Pick the template for a class/subject pair.
pub fn classify(class: &str, subject: &str) -> TemplateKind {
    let class = normalise_label(class);
    let subject = normalise_label(subject);

    let kind = if STD5_CLASSES.contains(&class.as_str())
        && ENGLISH_II_SUBJECTS.contains(&subject.as_str())
    {
        TemplateKind::Std5EnglishII
    } else {
        TemplateKind::Generic
    };
    debug!("Classified class={:?} subject={:?} as {}", class, subject, kind);
    kind
}

fn normalise_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl TemplateKind {
    /// Stable identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::Generic => "generic",
            TemplateKind::Std5EnglishII => "std5-english-ii",
            TemplateKind::LegacyFont => "legacy-font",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_label(s).as_str() {
            "generic" => Ok(TemplateKind::Generic),
            "std5-english-ii" | "std5" => Ok(TemplateKind::Std5EnglishII),
            "legacy-font" | "hindi" => Ok(TemplateKind::LegacyFont),
            other => Err(format!(
                "unknown template '{other}' (expected generic, std5-english-ii, legacy-font)"
            )),
        }
    }
}

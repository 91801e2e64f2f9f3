//! OCR response normalisation: repair loosely-typed AI output into the exam model.
//!
//! ## Why is normalisation necessary?
//!
//! The OCR/AI service is asked for JSON matching [`ExamPaper`], and mostly
//! complies. The exceptions are the problem:
//!
//! - wrapping the JSON in ` ```json … ``` ` fences
//! - marks written as `"2 marks"`, `"Marks: 5"`, `"five"` or left out
//! - question numbers as strings, snake_case keys, `className` for `class`
//! - a guessed `maxMarks` that contradicts what the user typed on the upload form
//!
//! The payload is parsed into a generic [`Value`], passed through pure
//! transforms (rename keys, set trusted fields, map over sections and
//! questions), and only then deserialised strictly. A single malformed
//! question degrades to defaults; it never aborts the rest of the paper.
//!
//! ## Rule Order
//!
//! Fences are stripped before parsing. Key aliases are canonicalised before
//! trusted overrides are written, so an override is never shadowed by an
//! alias. Scalar repair runs after overrides and is idempotent on them.

use crate::error::QuestionPaperError;
use crate::model::ExamPaper;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Values entered by the operator alongside the upload.
///
/// These are ground truth: every field that is `Some` replaces whatever the
/// OCR service returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedOverrides {
    pub school_name: Option<String>,
    pub exam_title: Option<String>,
    pub class: Option<String>,
    pub subject: Option<String>,
    pub max_marks: Option<u32>,
    pub duration: Option<String>,
}

impl TrustedOverrides {
    /// The minimal override set the upload form always supplies.
    pub fn new(max_marks: u32, duration: impl Into<String>) -> Self {
        Self {
            max_marks: Some(max_marks),
            duration: Some(duration.into()),
            ..Default::default()
        }
    }

    pub fn school_name(mut self, name: impl Into<String>) -> Self {
        self.school_name = Some(name.into());
        self
    }

    pub fn exam_title(mut self, title: impl Into<String>) -> Self {
        self.exam_title = Some(title.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let text = |key: &'static str, v: &Option<String>| {
            v.as_ref().map(|s| (key, Value::String(s.clone())))
        };
        [
            text(KEY_SCHOOL_NAME, &self.school_name),
            text(KEY_EXAM_TITLE, &self.exam_title),
            text(KEY_CLASS, &self.class),
            text(KEY_SUBJECT, &self.subject),
            self.max_marks.map(|m| (KEY_MAX_MARKS, Value::from(m))),
            text(KEY_DURATION, &self.duration),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

const KEY_SCHOOL_NAME: &str = "schoolName";
const KEY_EXAM_TITLE: &str = "examTitle";
const KEY_CLASS: &str = "class";
const KEY_SUBJECT: &str = "subject";
const KEY_MAX_MARKS: &str = "maxMarks";
const KEY_DURATION: &str = "duration";
const KEY_SECTIONS: &str = "sections";

/// Non-canonical spellings seen in AI output, mapped to the model's keys.
const TOP_LEVEL_ALIASES: &[(&str, &str)] = &[
    ("className", KEY_CLASS),
    ("class_name", KEY_CLASS),
    ("school_name", KEY_SCHOOL_NAME),
    ("exam_title", KEY_EXAM_TITLE),
    ("max_marks", KEY_MAX_MARKS),
];

/// Parse, repair, and deserialise an OCR response into an [`ExamPaper`].
///
/// The returned paper is *not* validated: an empty section list survives
/// normalisation and is rejected by [`ExamPaper::validate`] afterwards.
///
/// # Errors
/// [`QuestionPaperError::MalformedInput`] when the body is not JSON at all or
/// its root is not an object.
pub fn normalize_ocr_response(
    raw: &str,
    overrides: &TrustedOverrides,
) -> Result<ExamPaper, QuestionPaperError> {
    let repaired = normalize_value(raw, overrides)?;
    serde_json::from_value(repaired).map_err(|e| QuestionPaperError::MalformedInput {
        detail: format!("repaired payload still does not match the exam model: {e}"),
    })
}

/// Parse and repair an OCR response, returning the repaired tree.
pub fn normalize_value(raw: &str, overrides: &TrustedOverrides) -> Result<Value, QuestionPaperError> {
    let body = strip_code_fences(raw);
    let root: Value = serde_json::from_str(&body).map_err(|e| QuestionPaperError::MalformedInput {
        detail: format!("{e}; body starts with {:?}", preview(&body)),
    })?;

    let Value::Object(map) = root else {
        return Err(QuestionPaperError::MalformedInput {
            detail: format!("expected a JSON object at the top level, found {}", kind_of(&root)),
        });
    };

    let map = canonicalise_keys(map);
    let map = apply_overrides(map, overrides);
    let map = repair_scalars(map);
    let map = repair_sections(map);
    Ok(Value::Object(map))
}

/// Repair a single marks value.
///
/// Clean non-negative integers pass through. Anything else is reduced to the
/// first run of ASCII digits in its text form (`"2 marks"` → 2, `2.5` → 2).
/// Missing or digit-free values become 0, and so do negative ones in every
/// form (`-3`, `-2.5`, `"-3"`).
pub fn repair_marks(value: Option<&Value>) -> u32 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => u32::try_from(v).unwrap_or(0),
            None if n.as_f64().is_some_and(|f| f < 0.0) => 0,
            None if n.as_i64().is_some() => 0,
            None => first_number(&n.to_string()).unwrap_or(0),
        },
        Some(Value::String(s)) => marks_from_text(s),
        Some(_) => 0,
    }
}

// ── Rule 1: Strip outer code fences ─────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?si)^```[ \t]*(?:json)?[ \t]*\n?(.*?)\n?[ \t]*```$").unwrap());

fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim().trim_start_matches('\u{FEFF}');
    if let Some(caps) = RE_OUTER_FENCES.captures(trimmed) {
        caps[1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

// ── Rule 2: Canonicalise key aliases ────────────────────────────────────────

fn canonicalise_keys(mut map: Map<String, Value>) -> Map<String, Value> {
    for (alias, canonical) in TOP_LEVEL_ALIASES {
        if let Some(value) = map.remove(*alias) {
            if !map.contains_key(*canonical) {
                debug!("Renaming OCR key '{}' to '{}'", alias, canonical);
                map.insert((*canonical).to_string(), value);
            }
        }
    }
    map
}

// ── Rule 3: Trusted overrides always win ─────────────────────────────────────

fn apply_overrides(mut map: Map<String, Value>, overrides: &TrustedOverrides) -> Map<String, Value> {
    for (key, value) in overrides.fields() {
        if let Some(previous) = map.get(key) {
            if previous != &value {
                debug!("Trusted {} overrides OCR value {}", key, previous);
            }
        }
        map.insert(key.to_string(), value);
    }
    map
}

// ── Rule 4: Top-level scalars ───────────────────────────────────────────────

fn repair_scalars(mut map: Map<String, Value>) -> Map<String, Value> {
    for key in [KEY_SCHOOL_NAME, KEY_EXAM_TITLE, KEY_CLASS, KEY_SUBJECT, KEY_DURATION] {
        let text = text_of(map.get(key));
        map.insert(key.to_string(), Value::String(text));
    }
    let max_marks = repair_marks(map.get(KEY_MAX_MARKS));
    map.insert(KEY_MAX_MARKS.to_string(), Value::from(max_marks));
    map
}

// ── Rule 5: Sections and questions ──────────────────────────────────────────

fn repair_sections(mut map: Map<String, Value>) -> Map<String, Value> {
    let sections: Vec<Value> = as_list(map.remove(KEY_SECTIONS))
        .into_iter()
        .enumerate()
        .filter_map(|(idx, section)| match section {
            Value::Object(obj) => Some(Value::Object(repair_section(obj))),
            other => {
                debug!("Dropping section {}: expected an object, found {}", idx + 1, kind_of(&other));
                None
            }
        })
        .collect();
    map.insert(KEY_SECTIONS.to_string(), Value::Array(sections));
    map
}

fn repair_section(mut section: Map<String, Value>) -> Map<String, Value> {
    let name = text_of(section.get("name"));

    match section.remove("instructions") {
        Some(Value::Null) | None => {}
        Some(value) => {
            section.insert("instructions".into(), Value::String(text_of(Some(&value))));
        }
    }

    let questions: Vec<Value> = as_list(section.remove("questions"))
        .into_iter()
        .enumerate()
        .filter_map(|(idx, question)| {
            let position = idx as u32 + 1;
            match question {
                Value::Object(obj) => Some(Value::Object(repair_question(obj, position, &name))),
                Value::String(text) => {
                    let mut obj = Map::new();
                    obj.insert("text".into(), Value::String(text));
                    Some(Value::Object(repair_question(obj, position, &name)))
                }
                other => {
                    debug!(
                        "Section '{}': dropping question {} ({})",
                        name,
                        position,
                        kind_of(&other)
                    );
                    None
                }
            }
        })
        .collect();

    section.insert("name".into(), Value::String(name));
    section.insert("questions".into(), Value::Array(questions));
    section
}

fn repair_question(mut question: Map<String, Value>, position: u32, section: &str) -> Map<String, Value> {
    let raw_marks = question.get("marks");
    let marks = repair_marks(raw_marks);
    if !is_clean_integer(raw_marks) {
        debug!(
            "Section '{}', question {}: marks {:?} repaired to {}",
            section, position, raw_marks, marks
        );
    }

    let raw_number = question.get("number");
    let number = if is_clean_integer(raw_number) {
        repair_marks(raw_number)
    } else {
        raw_number
            .and_then(|v| match v {
                Value::String(s) => first_number(s),
                Value::Number(n) => first_number(&n.to_string()),
                _ => None,
            })
            .unwrap_or(position)
    };

    let text = text_of(question.get("text"));

    match question.remove("language") {
        Some(Value::String(lang)) => {
            question.insert("language".into(), Value::String(lang));
        }
        Some(_) | None => {}
    }

    question.insert("number".into(), Value::from(number));
    question.insert("text".into(), Value::String(text));
    question.insert("marks".into(), Value::from(marks));
    question
}

// ── Helpers ─────────────────────────────────────────────────────────────────

static RE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

static RE_SIGNED_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-)?([0-9]+)").unwrap());

/// Marks from free text: the first digit run, or 0 when a minus sign is
/// attached to it.
fn marks_from_text(text: &str) -> u32 {
    match RE_SIGNED_DIGITS.captures(text) {
        Some(caps) if caps.get(1).is_some() => 0,
        Some(caps) => caps[2].parse::<u32>().unwrap_or(0),
        None => 0,
    }
}

/// First contiguous run of ASCII digits, if it fits in a `u32`.
fn first_number(text: &str) -> Option<u32> {
    RE_DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

fn is_clean_integer(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(n)) if n.as_u64().is_some_and(|v| v <= u64::from(u32::MAX)))
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// A missing value is an empty list; a lone object is a one-element list.
fn as_list(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn preview(body: &str) -> String {
    body.chars().take(80).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

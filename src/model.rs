//! The exam-paper data model.
//!
//! These types are the single contract between the two inputs (a typed JSON
//! request, or an OCR response after [`crate::pipeline::normalize`]) and the
//! template renderers. Field names on the wire are camelCase to match the
//! upload form and the OCR service schema.

use crate::error::QuestionPaperError;
use serde::{Deserialize, Serialize};

/// One printable assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaper {
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub exam_title: String,
    /// Free text: "V", "5", "Std V", …
    #[serde(default, alias = "className")]
    pub class: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub max_marks: u32,
    /// Display string only; never parsed as a duration.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A named group of questions sharing instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A single question. `number` is taken as supplied and may repeat or skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ExamPaper {
    /// Parse a direct (typed) request body and validate it.
    ///
    /// A body that does not match the model (e.g. `marks: "two"`) is a
    /// validation failure: only the OCR path gets field repair.
    pub fn from_json(body: &str) -> Result<Self, QuestionPaperError> {
        let paper: ExamPaper = serde_json::from_str(body).map_err(|e| {
            QuestionPaperError::validation(format!("request body does not match the exam model: {e}"))
        })?;
        paper.validate()?;
        Ok(paper)
    }

    /// Check the business invariants that must hold before rendering.
    pub fn validate(&self) -> Result<(), QuestionPaperError> {
        if self.sections.is_empty() {
            return Err(QuestionPaperError::validation("exam paper has no sections"));
        }
        if self.class.trim().is_empty() {
            return Err(QuestionPaperError::validation("class is required"));
        }
        if self.subject.trim().is_empty() {
            return Err(QuestionPaperError::validation("subject is required"));
        }
        Ok(())
    }

    /// Total number of questions across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}

impl Section {
    /// Marks of the first question, which by convention stands for the
    /// whole section. Zero when the section has no questions.
    pub fn first_question_marks(&self) -> u32 {
        self.questions.first().map(|q| q.marks).unwrap_or(0)
    }

    /// Instructions, if present and not blank.
    pub fn instructions_text(&self) -> Option<&str> {
        self.instructions
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECT: &str = r#"{
        "schoolName": "Indira Gandhi Memorial Public School",
        "examTitle": "1st Terminal Examination",
        "class": "V",
        "subject": "English II",
        "maxMarks": 100,
        "duration": "2 Hours",
        "sections": [
            {"name": "Section A", "instructions": "Answer all", "questions": [
                {"number": 1, "text": "Define noun", "marks": 2, "language": "English"}
            ]}
        ]
    }"#;

    #[test]
    fn parses_direct_request() {
        let paper = ExamPaper::from_json(DIRECT).expect("valid request");
        assert_eq!(paper.class, "V");
        assert_eq!(paper.max_marks, 100);
        assert_eq!(paper.sections[0].questions[0].language.as_deref(), Some("English"));
        assert_eq!(paper.question_count(), 1);
    }

    #[test]
    fn accepts_class_name_alias() {
        let body = r#"{"className": "VI", "subject": "Maths", "sections": [{"name": "A"}]}"#;
        let paper = ExamPaper::from_json(body).unwrap();
        assert_eq!(paper.class, "VI");
    }

    #[test]
    fn missing_sections_is_validation_error() {
        let body = r#"{"class": "V", "subject": "EVS"}"#;
        let err = ExamPaper::from_json(body).unwrap_err();
        assert!(matches!(err, QuestionPaperError::Validation { .. }));
    }

    #[test]
    fn empty_sections_is_validation_error() {
        let body = r#"{"class": "V", "subject": "EVS", "sections": []}"#;
        let err = ExamPaper::from_json(body).unwrap_err();
        assert!(err.to_string().contains("no sections"));
    }

    #[test]
    fn blank_subject_is_validation_error() {
        let body = r#"{"class": "V", "subject": "  ", "sections": [{"name": "A"}]}"#;
        assert!(ExamPaper::from_json(body).is_err());
    }

    #[test]
    fn decorated_marks_rejected_on_direct_path() {
        let body = r#"{"class": "V", "subject": "EVS", "sections": [
            {"name": "A", "questions": [{"number": 1, "text": "x", "marks": "2 marks"}]}
        ]}"#;
        let err = ExamPaper::from_json(body).unwrap_err();
        assert!(matches!(err, QuestionPaperError::Validation { .. }));
    }

    #[test]
    fn first_question_marks_of_empty_section_is_zero() {
        assert_eq!(Section::default().first_question_marks(), 0);
    }

    #[test]
    fn blank_instructions_are_hidden() {
        let section = Section {
            instructions: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(section.instructions_text(), None);
    }
}

//! Test definition entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use proctor_core::error::AppError;
use proctor_core::types::{QuestionId, TestId};

use super::question::Question;

/// A test in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDefinition {
    /// Test identifier.
    pub id: TestId,
    /// Display title.
    pub title: String,
    /// Subject area.
    pub subject: String,
    /// Allotted time for each session.
    pub duration_seconds: u64,
    /// Ordered questions.
    pub questions: Vec<Question>,
}

impl ExamDefinition {
    /// The sample test shipped with the demo catalog.
    pub fn demo() -> Self {
        Self {
            id: TestId::new("1"),
            title: "General Knowledge".to_string(),
            subject: "General".to_string(),
            duration_seconds: 7200,
            questions: vec![
                Question::mcq("1", "What is 2 + 2?", &["3", "4", "5", "6"]),
                Question::mcq(
                    "2",
                    "What is the capital of France?",
                    &["London", "Berlin", "Paris", "Madrid"],
                ),
                Question::short("3", "Explain photosynthesis in brief."),
            ],
        }
    }

    /// Identifiers of all questions.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(|q| q.id.clone())
    }

    /// Look up a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Check the definition before it enters the catalog.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.is_blank() {
            return Err(AppError::validation("Test id must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Test title must not be empty"));
        }
        if self.duration_seconds == 0 {
            return Err(AppError::validation("Test duration must be positive"));
        }

        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(&q.id) {
                return Err(AppError::validation(format!(
                    "Duplicate question id '{}'",
                    q.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_valid() {
        let demo = ExamDefinition::demo();
        demo.validate().expect("valid demo");
        assert_eq!(demo.questions.len(), 3);
        assert_eq!(demo.duration_seconds, 7200);
        let q = demo.question(&QuestionId::from("2")).expect("question 2");
        assert!(q.accepts("Paris"));
        assert!(!q.accepts("Rome"));
    }

    #[test]
    fn test_duplicate_questions_rejected() {
        let mut def = ExamDefinition::demo();
        def.questions.push(Question::short("1", "again"));
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_question_serialization_is_flat() {
        let json = serde_json::to_value(Question::mcq("1", "2+2?", &["3", "4"])).expect("json");
        assert_eq!(json["type"], "mcq");
        assert_eq!(json["options"][1], "4");
    }
}

//! Question entity.

use serde::{Deserialize, Serialize};

use proctor_core::types::QuestionId;

/// Kind of question and its answer format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice.
    Mcq {
        /// Choices offered to the student.
        options: Vec<String>,
    },
    /// Free-text answer.
    Short,
}

/// A single question of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the test.
    pub id: QuestionId,
    /// Question text.
    pub text: String,
    /// Kind of question.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Multiple-choice question.
    pub fn mcq(id: impl Into<QuestionId>, text: impl Into<String>, options: &[&str]) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: QuestionKind::Mcq {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    /// Short-answer question.
    pub fn short(id: impl Into<QuestionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: QuestionKind::Short,
        }
    }

    /// Whether an answer is acceptable for this question.
    ///
    /// MCQ answers must be one of the options; short answers may be anything.
    pub fn accepts(&self, answer: &str) -> bool {
        match &self.kind {
            QuestionKind::Mcq { options } => options.iter().any(|o| o == answer),
            QuestionKind::Short => true,
        }
    }
}

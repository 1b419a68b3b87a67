//! Answer sheet: at most one answer per question id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use proctor_core::types::QuestionId;

/// Mapping from question identifier to the student's current answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<QuestionId, String>);

impl AnswerSheet {
    /// Store an answer, returning the one it replaced.
    pub fn record(&mut self, question_id: QuestionId, answer: String) -> Option<String> {
        self.0.insert(question_id, answer)
    }

    /// Current answer to a question.
    pub fn get(&self, question_id: &QuestionId) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been answered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owned copy of the answers.
    pub fn to_map(&self) -> BTreeMap<QuestionId, String> {
        self.0.clone()
    }
}

//! Test catalog entities.

pub mod definition;
pub mod question;

pub use definition::ExamDefinition;
pub use question::{Question, QuestionKind};

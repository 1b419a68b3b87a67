//! Test catalog.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_core::types::TestId;
use proctor_entity::exam::ExamDefinition;

/// Tests available to students, keyed by test id.
#[derive(Debug, Default)]
pub struct TestCatalog {
    tests: DashMap<TestId, ExamDefinition>,
}

impl TestCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the demo test.
    pub fn with_demo() -> Self {
        let catalog = Self::new();
        let demo = ExamDefinition::demo();
        catalog.tests.insert(demo.id.clone(), demo);
        catalog
    }

    /// Add a test; fails if the id is already taken.
    pub fn insert(&self, definition: ExamDefinition) -> AppResult<ExamDefinition> {
        definition.validate()?;

        match self.tests.entry(definition.id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Test '{}' already exists",
                definition.id
            ))),
            Entry::Vacant(slot) => {
                info!(
                    test_id = %definition.id,
                    questions = definition.questions.len(),
                    "Test added to catalog"
                );
                slot.insert(definition.clone());
                Ok(definition)
            }
        }
    }

    /// Look up a test.
    pub fn get(&self, id: &TestId) -> AppResult<ExamDefinition> {
        self.tests
            .get(id)
            .map(|t| t.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Test '{id}' not found")))
    }

    /// All tests ordered by id.
    pub fn list(&self) -> Vec<ExamDefinition> {
        let mut tests: Vec<_> = self.tests.iter().map(|t| t.value().clone()).collect();
        tests.sort_by(|a, b| a.id.cmp(&b.id));
        tests
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

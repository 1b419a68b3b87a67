//! Read-only reports of finished sessions.

use dashmap::DashMap;

use proctor_core::types::{SessionId, TestId};
use proctor_entity::session::{SessionReport, SubmissionState};

/// Reports of sessions that reached a terminal state.
#[derive(Debug, Default)]
pub struct SessionArchive {
    reports: DashMap<SessionId, SessionReport>,
}

impl SessionArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the report of a session.
    pub fn put(&self, report: SessionReport) {
        self.reports.insert(report.session.id(), report);
    }

    /// Report of a session.
    pub fn get(&self, id: &SessionId) -> Option<SessionReport> {
        self.reports.get(id).map(|r| r.value().clone())
    }

    /// Update only the submission state of an archived session.
    pub fn set_submission(&self, id: &SessionId, state: SubmissionState) -> bool {
        match self.reports.get_mut(id) {
            Some(mut report) => {
                report.submission = state;
                true
            }
            None => false,
        }
    }

    /// Reports of one test.
    pub fn for_test(&self, test_id: &TestId) -> Vec<SessionReport> {
        self.reports
            .iter()
            .filter(|r| r.session.test_id() == test_id)
            .map(|r| r.value().clone())
            .collect()
    }

    /// Number of archived sessions.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::types::StudentId;
    use proctor_entity::session::ExamSession;

    #[test]
    fn test_put_and_update_submission() {
        let mut session = ExamSession::new(TestId::new("1"), StudentId::new("s1"), 60, [])
            .expect("session");
        session.abandon().expect("abandon");
        let id = session.id();

        let archive = SessionArchive::new();
        archive.put(SessionReport {
            session,
            submission: SubmissionState::Pending,
        });

        assert!(archive.set_submission(
            &id,
            SubmissionState::Failed {
                error: "down".into(),
                attempts: 1
            }
        ));
        let report = archive.get(&id).expect("archived");
        assert!(report.submission.can_retry());
        assert_eq!(archive.for_test(&TestId::new("1")).len(), 1);
        assert!(archive.for_test(&TestId::new("2")).is_empty());
    }
}

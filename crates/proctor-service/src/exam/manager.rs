//! Registry of live exam sessions and hand-over of their results.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use tracing::{info, warn};

use proctor_core::config::AppConfig;
use proctor_core::error::AppError;
use proctor_core::events::ExamEvent;
use proctor_core::result::AppResult;
use proctor_core::traits::{
    CapabilityProvider, SignalClassifier, SubmissionPayload, SubmissionService,
};
use proctor_core::types::{
    QuestionId, SessionId, Severity, StudentId, TerminationReason, TestId, ViolationSource,
};
use proctor_entity::session::{
    ExamSession, SessionReport, SubmissionState, TickOutcome, ViolationOutcome,
};
use proctor_store::{SessionArchive, TestCatalog, ViolationStore};

use super::events::EventBus;
use super::handle::ExamSessionHandle;
use super::monitor::SignalPolicy;

type ActiveSessions = DashMap<SessionId, Arc<ExamSessionHandle>>;

/// Collaborators the session runtime needs.
#[derive(Debug, Clone)]
pub struct SessionDependencies {
    /// Camera and microphone grants.
    pub capability: Arc<dyn CapabilityProvider>,
    /// Classifiers to run as monitors; filtered by the enabled sources.
    pub monitors: Vec<Arc<dyn SignalClassifier>>,
    /// Receives final results.
    pub submissions: Arc<dyn SubmissionService>,
    /// Receives every accepted violation.
    pub violations: Arc<dyn ViolationStore>,
    /// Tests that sessions can be created for.
    pub catalog: Arc<TestCatalog>,
    /// Reports of finished sessions.
    pub archive: Arc<SessionArchive>,
    /// Lifecycle events.
    pub events: EventBus,
}

/// Runtime settings derived from configuration.
#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) tick_period: Duration,
    pub(crate) seconds_per_tick: u64,
    pub(crate) auto_tick: bool,
    pub(crate) heartbeat_timeout: Option<Duration>,
    pub(crate) sample_period: Duration,
    pub(crate) policy: SignalPolicy,
    pub(crate) sources: BTreeSet<ViolationSource>,
}

impl RuntimeSettings {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            tick_period: Duration::from_millis(config.exam.tick_interval_ms),
            seconds_per_tick: config.exam.seconds_per_tick,
            auto_tick: config.exam.auto_tick,
            heartbeat_timeout: match config.exam.heartbeat_timeout_seconds {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            sample_period: Duration::from_secs(config.monitoring.sample_interval_seconds),
            policy: SignalPolicy::from_config(&config.monitoring),
            sources: config.monitoring.enabled_sources.iter().copied().collect(),
        }
    }
}

/// Shared by every handle the manager creates.
pub(crate) struct SessionContext {
    pub(crate) settings: RuntimeSettings,
    pub(crate) capability: Arc<dyn CapabilityProvider>,
    pub(crate) monitors: Vec<Arc<dyn SignalClassifier>>,
    pub(crate) violations: Arc<dyn ViolationStore>,
    pub(crate) events: EventBus,
    pub(crate) finalizer: SessionFinalizer,
}

/// Moves terminal sessions out of the registry and submits their result.
pub(crate) struct SessionFinalizer {
    active: Arc<ActiveSessions>,
    archive: Arc<SessionArchive>,
    submissions: Arc<dyn SubmissionService>,
    events: EventBus,
}

impl SessionFinalizer {
    /// Archive, unregister, and submit a terminal session.
    pub(crate) async fn finalize(&self, session: ExamSession) {
        let id = session.id();
        let Some(payload) = session.submission_payload() else {
            warn!(session_id = %id, "Finalize called on a live session");
            return;
        };

        self.archive.put(SessionReport {
            session,
            submission: SubmissionState::Pending,
        });
        self.active.remove(&id);

        let state = self.deliver(&payload, 1).await;
        self.archive.set_submission(&id, state);
    }

    async fn deliver(&self, payload: &SubmissionPayload, attempt: u32) -> SubmissionState {
        let session_id = payload.session_id;
        match self.submissions.submit(payload).await {
            Ok(receipt) => {
                self.events.publish(ExamEvent::ResultAcknowledged {
                    session_id,
                    reference: receipt.reference.clone(),
                });
                SubmissionState::Acknowledged {
                    reference: receipt.reference,
                    accepted_at: receipt.accepted_at,
                }
            }
            Err(e) => {
                warn!(%session_id, attempt, error = %e, "Submission failed");
                self.events.publish(ExamEvent::ResultFailed {
                    session_id,
                    error: e.message.clone(),
                });
                SubmissionState::Failed {
                    error: e.message,
                    attempts: attempt,
                }
            }
        }
    }
}

/// Creates exam sessions and routes every operation to the right handle.
pub struct ExamSessionManager {
    active: Arc<ActiveSessions>,
    ctx: Arc<SessionContext>,
    catalog: Arc<TestCatalog>,
    archive: Arc<SessionArchive>,
}

impl fmt::Debug for ExamSessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSessionManager")
            .field("active", &self.active.len())
            .field("archived", &self.archive.len())
            .finish()
    }
}

impl ExamSessionManager {
    /// Creates a new session manager.
    pub fn new(config: &AppConfig, deps: SessionDependencies) -> Self {
        let settings = RuntimeSettings::from_config(config);
        let monitors = deps
            .monitors
            .into_iter()
            .filter(|m| settings.sources.contains(&m.source()))
            .collect();
        let active = Arc::new(ActiveSessions::new());

        let ctx = Arc::new(SessionContext {
            settings,
            capability: deps.capability,
            monitors,
            violations: deps.violations,
            events: deps.events.clone(),
            finalizer: SessionFinalizer {
                active: Arc::clone(&active),
                archive: Arc::clone(&deps.archive),
                submissions: deps.submissions,
                events: deps.events,
            },
        });

        Self {
            active,
            ctx,
            catalog: deps.catalog,
            archive: deps.archive,
        }
    }

    /// Event bus sessions publish on.
    pub fn events(&self) -> &EventBus {
        &self.ctx.events
    }

    /// Create a `NotStarted` session for a student.
    pub async fn create_session(
        &self,
        test_id: TestId,
        student_id: StudentId,
    ) -> AppResult<SessionReport> {
        if student_id.is_blank() {
            return Err(AppError::validation("studentId must not be empty"));
        }
        let definition = self.catalog.get(&test_id)?;

        let session = ExamSession::new(
            test_id,
            student_id,
            definition.duration_seconds,
            definition.question_ids(),
        )?;
        let handle = ExamSessionHandle::new(session.clone(), Arc::clone(&self.ctx));
        self.active.insert(handle.id(), handle);

        info!(
            session_id = %session.id(),
            test_id = %session.test_id(),
            student_id = %session.student_id(),
            "Exam session created"
        );
        self.ctx.events.publish(ExamEvent::Created {
            session_id: session.id(),
            test_id: session.test_id().clone(),
            student_id: session.student_id().clone(),
        });

        Ok(SessionReport::live(session))
    }

    /// Acquire the capability and start the session.
    pub async fn start(&self, id: &SessionId) -> AppResult<SessionReport> {
        let handle = self.live(id, "start")?;
        handle.start().await?;
        self.get(id).await
    }

    /// Advance the countdown by `elapsed_seconds`.
    pub async fn tick(&self, id: &SessionId, elapsed_seconds: u64) -> AppResult<TickOutcome> {
        self.live(id, "tick")?.tick(elapsed_seconds).await
    }

    /// Report a violation; severity defaults to the source's severity.
    pub async fn report_violation(
        &self,
        id: &SessionId,
        source: ViolationSource,
        severity: Option<Severity>,
        details: Option<String>,
    ) -> AppResult<ViolationOutcome> {
        let handle = self.live(id, "report a violation")?;
        let details = details.unwrap_or_else(|| format!("{source} violation reported"));
        handle
            .report_violation(
                source,
                severity.unwrap_or_else(|| source.default_severity()),
                details,
            )
            .await
    }

    /// Page visibility changed in the student's browser.
    ///
    /// Losing focus is a tab-visibility violation; regaining it is not.
    pub async fn visibility_changed(
        &self,
        id: &SessionId,
        hidden: bool,
    ) -> AppResult<Option<ViolationOutcome>> {
        let handle = self.live(id, "report a violation")?;
        if !hidden {
            return Ok(None);
        }
        handle
            .report_violation(
                ViolationSource::TabVisibility,
                ViolationSource::TabVisibility.default_severity(),
                "Exam page lost foreground focus",
            )
            .await
            .map(Some)
    }

    /// Record an answer; MCQ answers must be one of the options.
    pub async fn answer(
        &self,
        id: &SessionId,
        question_id: QuestionId,
        answer: String,
    ) -> AppResult<SessionReport> {
        let handle = self.live(id, "answer")?;
        let test_id = handle.snapshot().await.test_id().clone();
        if let Ok(definition) = self.catalog.get(&test_id) {
            if let Some(question) = definition.question(&question_id) {
                if !question.accepts(&answer) {
                    return Err(AppError::validation(format!(
                        "'{answer}' is not an option of question '{question_id}'"
                    )));
                }
            }
        }
        handle.answer(question_id, answer).await?;
        self.get(id).await
    }

    /// Note that the student's exam page is still open.
    pub async fn heartbeat(&self, id: &SessionId) -> AppResult<SessionReport> {
        self.live(id, "send a heartbeat")?.heartbeat().await?;
        self.get(id).await
    }

    /// Submit on the student's request.
    pub async fn submit(&self, id: &SessionId) -> AppResult<SessionReport> {
        self.live(id, "submit")?.submit().await?;
        self.get(id).await
    }

    /// Terminate on an administrator's request.
    pub async fn terminate(&self, id: &SessionId, note: Option<&str>) -> AppResult<SessionReport> {
        self.live(id, "terminate")?
            .terminate(TerminationReason::Administrative)
            .await?;
        info!(session_id = %id, note = note.unwrap_or(""), "Session terminated by admin");
        self.get(id).await
    }

    /// End the session because the student left the exam page.
    pub async fn abandon(&self, id: &SessionId) -> AppResult<SessionReport> {
        self.live(id, "abandon")?.abandon().await?;
        self.get(id).await
    }

    /// Re-send the result of a session whose submission failed.
    pub async fn retry_submission(&self, id: &SessionId) -> AppResult<SessionReport> {
        let report = self
            .archive
            .get(id)
            .ok_or_else(|| self.missing_or_live(id))?;
        if !report.submission.can_retry() {
            return Err(AppError::conflict(format!(
                "Submission of session '{id}' is not awaiting a retry"
            )));
        }
        let payload = report
            .session
            .submission_payload()
            .ok_or_else(|| AppError::internal("Archived session is not terminal"))?;

        let attempt = report.submission.attempts() + 1;
        info!(session_id = %id, attempt, "Retrying submission");
        let state = self.ctx.finalizer.deliver(&payload, attempt).await;
        self.archive.set_submission(id, state);
        self.get(id).await
    }

    /// Current view of a live or finished session.
    pub async fn get(&self, id: &SessionId) -> AppResult<SessionReport> {
        let handle = self.active.get(id).map(|h| Arc::clone(h.value()));
        if let Some(handle) = handle {
            let session = handle.snapshot().await;
            if !session.is_terminal() {
                return Ok(SessionReport::live(session));
            }
        }
        self.archive
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("Session '{id}' not found")))
    }

    /// Views of every live session.
    pub async fn list_active(&self) -> Vec<SessionReport> {
        let mut reports = Vec::new();
        for handle in self.handles() {
            reports.push(SessionReport::live(handle.snapshot().await));
        }
        reports.sort_by_key(|r| r.session.id());
        reports
    }

    /// Live and finished sessions of a test.
    pub async fn sessions_for_test(&self, test_id: &TestId) -> Vec<SessionReport> {
        let mut reports: Vec<_> = self
            .list_active()
            .await
            .into_iter()
            .filter(|r| r.session.test_id() == test_id)
            .collect();
        reports.extend(self.archive.for_test(test_id));
        reports
    }

    /// Number of live sessions.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Abandon every live session. Returns how many were ended.
    pub async fn shutdown(&self) -> usize {
        let handles = self.handles();
        let results = join_all(handles.iter().map(|h| h.abandon())).await;

        let mut ended = 0;
        for (handle, result) in handles.iter().zip(results) {
            match result {
                Ok(_) => ended += 1,
                Err(e) => warn!(session_id = %handle.id(), error = %e, "Could not abandon session"),
            }
        }
        info!(ended, "Live exam sessions abandoned");
        ended
    }

    fn handles(&self) -> Vec<Arc<ExamSessionHandle>> {
        self.active.iter().map(|h| Arc::clone(h.value())).collect()
    }

    fn live(&self, id: &SessionId, action: &str) -> AppResult<Arc<ExamSessionHandle>> {
        if let Some(handle) = self.active.get(id) {
            return Ok(Arc::clone(handle.value()));
        }
        match self.archive.get(id) {
            Some(report) => Err(report.session.rejection(action)),
            None => Err(AppError::not_found(format!("Session '{id}' not found"))),
        }
    }

    fn missing_or_live(&self, id: &SessionId) -> AppError {
        if self.active.contains_key(id) {
            AppError::conflict(format!("Session '{id}' has not ended yet"))
        } else {
            AppError::not_found(format!("Session '{id}' not found"))
        }
    }
}

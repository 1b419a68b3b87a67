//! A live exam session and the tasks that drive it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use proctor_core::error::{AppError, ErrorKind};
use proctor_core::events::ExamEvent;
use proctor_core::result::AppResult;
use proctor_core::traits::CapabilityLease;
use proctor_core::types::{
    QuestionId, SessionId, SessionStatus, Severity, TerminationReason, ViolationSource,
};
use proctor_entity::session::{ExamSession, TickOutcome, Transition, ViolationOutcome};
use proctor_entity::violation::NewViolation;

use super::manager::SessionContext;
use super::monitor::run_monitor;

/// Owns one [`ExamSession`] and serializes every transition on it.
///
/// The ticker, the monitors, and request handlers all mutate the session
/// through this handle. Each operation holds the session lock from the
/// status check to the end of the transition, including the terminal
/// bookkeeping, so no producer can act on a session that has just ended.
pub struct ExamSessionHandle {
    id: SessionId,
    session: Mutex<ExamSession>,
    lease: Mutex<Option<Arc<dyn CapabilityLease>>>,
    last_heartbeat: RwLock<Instant>,
    cancel: CancellationToken,
    ctx: Arc<SessionContext>,
}

impl fmt::Debug for ExamSessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSessionHandle")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl ExamSessionHandle {
    pub(crate) fn new(session: ExamSession, ctx: Arc<SessionContext>) -> Arc<Self> {
        Arc::new(Self {
            id: session.id(),
            session: Mutex::new(session),
            lease: Mutex::new(None),
            last_heartbeat: RwLock::new(Instant::now()),
            cancel: CancellationToken::new(),
            ctx,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Copy of the session as it is now.
    pub async fn snapshot(&self) -> ExamSession {
        self.session.lock().await.clone()
    }

    /// Whether the producer tasks have been told to stop.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Acquire the capability, then start the countdown and the monitors.
    ///
    /// A refused capability ends the session with `DeviceUnavailable`.
    pub async fn start(self: &Arc<Self>) -> AppResult<()> {
        let mut session = self.session.lock().await;
        if session.status() != SessionStatus::NotStarted {
            return Err(AppError::invalid_state(format!(
                "Cannot start while the session is {}",
                session.status()
            )));
        }

        let lease = match self.ctx.capability.acquire(&self.id).await {
            Ok(lease) => lease,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Capability acquisition failed");
                let transition = session.fail_start()?;
                self.finish(&session, transition).await;
                return Err(AppError::with_source(
                    ErrorKind::DeviceUnavailable,
                    "Camera and microphone access is required to take this exam",
                    e,
                ));
            }
        };

        if let Err(e) = session.start(self.ctx.settings.sources.iter().copied()) {
            lease.release().await;
            return Err(e);
        }
        *self.lease.lock().await = Some(Arc::clone(&lease));
        *self.last_heartbeat.write().await = Instant::now();

        info!(
            session_id = %self.id,
            test_id = %session.test_id(),
            student_id = %session.student_id(),
            duration_seconds = session.duration_seconds(),
            monitors = self.ctx.monitors.len(),
            "Exam started"
        );
        self.ctx.events.publish(ExamEvent::Started {
            session_id: self.id,
            duration_seconds: session.duration_seconds(),
        });

        self.spawn_producers(lease);
        Ok(())
    }

    /// Advance the countdown.
    pub async fn tick(&self, elapsed_seconds: u64) -> AppResult<TickOutcome> {
        let mut session = self.session.lock().await;
        let outcome = session.tick(elapsed_seconds)?;
        if outcome.transition.is_terminal() {
            info!(session_id = %self.id, "Time expired, submitting exam");
            self.finish(&session, outcome.transition).await;
        }
        Ok(outcome)
    }

    /// Record a violation from any producer.
    pub async fn report_violation(
        &self,
        source: ViolationSource,
        severity: Severity,
        details: impl Into<String>,
    ) -> AppResult<ViolationOutcome> {
        let mut session = self.session.lock().await;
        let outcome = session.report_violation(source, severity, details, Utc::now())?;

        let row = NewViolation::from_entry(session.test_id(), session.student_id(), &outcome.entry);
        if let Err(e) = self.ctx.violations.record(row).await {
            warn!(session_id = %self.id, error = %e, "Failed to store violation");
        }

        info!(
            session_id = %self.id,
            source = %source,
            severity = %severity,
            count = outcome.count,
            threshold = session.violation_threshold(),
            "Violation recorded"
        );
        self.ctx.events.publish(ExamEvent::ViolationRecorded {
            session_id: self.id,
            source,
            severity,
            count: outcome.count,
        });

        if outcome.transition.is_terminal() {
            self.finish(&session, outcome.transition).await;
        }
        Ok(outcome)
    }

    /// Record an answer.
    pub async fn answer(&self, question_id: QuestionId, answer: String) -> AppResult<()> {
        let mut session = self.session.lock().await;
        session.record_answer(question_id, answer)?;
        Ok(())
    }

    /// Record a client heartbeat.
    pub async fn heartbeat(&self) -> AppResult<()> {
        let session = self.session.lock().await;
        if session.is_terminal() {
            return Err(session.rejection("send a heartbeat"));
        }
        *self.last_heartbeat.write().await = Instant::now();
        Ok(())
    }

    /// Submit on the student's request.
    pub async fn submit(&self) -> AppResult<Transition> {
        self.apply(ExamSession::submit).await
    }

    /// Terminate for the given reason.
    pub async fn terminate(&self, reason: TerminationReason) -> AppResult<Transition> {
        self.apply(|s| s.terminate(reason)).await
    }

    /// End the session because the student left.
    pub async fn abandon(&self) -> AppResult<Transition> {
        self.apply(ExamSession::abandon).await
    }

    async fn apply<F>(&self, op: F) -> AppResult<Transition>
    where
        F: FnOnce(&mut ExamSession) -> AppResult<Transition>,
    {
        let mut session = self.session.lock().await;
        let transition = op(&mut session)?;
        if transition.is_terminal() {
            self.finish(&session, transition).await;
        }
        Ok(transition)
    }

    fn spawn_producers(self: &Arc<Self>, lease: Arc<dyn CapabilityLease>) {
        let settings = &self.ctx.settings;

        if settings.auto_tick {
            let handle = Arc::clone(self);
            let cancel = self.cancel.clone();
            let period = settings.tick_period;
            let step = settings.seconds_per_tick;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            match handle.tick(step).await {
                                Ok(outcome) if outcome.transition.is_terminal() => break,
                                Ok(_) => {}
                                Err(_) => break,
                            }
                        }
                    }
                }
                debug!(session_id = %handle.id, "Ticker stopped");
            });
        }

        if let Some(timeout) = settings.heartbeat_timeout {
            tokio::spawn(Arc::clone(self).run_watchdog(timeout, self.cancel.clone()));
        }

        for classifier in &self.ctx.monitors {
            tokio::spawn(run_monitor(
                Arc::clone(self),
                Arc::clone(&lease),
                Arc::clone(classifier),
                settings.policy,
                settings.sample_period,
                self.cancel.clone(),
            ));
        }
    }

    /// Abandon the session once the client stops sending heartbeats.
    async fn run_watchdog(self: Arc<Self>, timeout: Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval((timeout / 4).max(Duration::from_millis(250)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let silent = self.last_heartbeat.read().await.elapsed();
            if silent > timeout {
                warn!(
                    session_id = %self.id,
                    silent_seconds = silent.as_secs(),
                    "Client heartbeat lost, abandoning exam"
                );
                if let Err(e) = self.abandon().await {
                    debug!(session_id = %self.id, error = %e, "Session ended before abandon");
                }
                break;
            }
        }
        debug!(session_id = %self.id, "Heartbeat watchdog stopped");
    }

    /// Terminal bookkeeping. Runs once, under the session lock.
    async fn finish(&self, session: &ExamSession, transition: Transition) {
        self.cancel.cancel();

        let lease = self.lease.lock().await.take();
        if let Some(lease) = lease {
            lease.release().await;
            debug!(session_id = %self.id, "Capability released");
        }

        match transition {
            Transition::Submitted { time_expired } => {
                self.ctx.events.publish(ExamEvent::Submitted {
                    session_id: self.id,
                    time_expired,
                })
            }
            Transition::Terminated(reason) => {
                self.ctx.events.publish(ExamEvent::Terminated {
                    session_id: self.id,
                    reason,
                })
            }
            Transition::Continue => {}
        }

        self.ctx.finalizer.finalize(session.clone()).await;
    }
}

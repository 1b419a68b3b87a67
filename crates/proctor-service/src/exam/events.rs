//! In-process bus for exam session events.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use proctor_core::events::DomainEvent;
use proctor_core::events::exam::ExamEvent;

/// Broadcast channel carrying [`DomainEvent`]s to any number of listeners.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Events published with no subscriber are dropped.
    pub fn publish(&self, payload: ExamEvent) {
        let _ = self.tx.send(DomainEvent::new(payload));
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Log every event on the bus until cancelled.
///
/// Events already buffered when the token fires are still logged. The
/// task resolves to the number of events it logged.
pub fn spawn_audit_logger(bus: &EventBus, cancel: CancellationToken) -> JoinHandle<u64> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        let mut logged = 0u64;
        loop {
            tokio::select! {
                biased;
                received = rx.recv() => match received {
                    Ok(event) => {
                        log_event(&event);
                        logged += 1;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Audit logger lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => return logged,
                },
                _ = cancel.cancelled() => break,
            }
        }

        loop {
            match rx.try_recv() {
                Ok(event) => {
                    log_event(&event);
                    logged += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Audit logger lagged behind the event bus");
                }
                Err(_) => break,
            }
        }
        logged
    })
}

fn log_event(event: &DomainEvent) {
    let session_id = event.payload.session_id();
    match &event.payload {
        ExamEvent::Created {
            test_id, student_id, ..
        } => info!(target: "audit", %session_id, %test_id, %student_id, "Exam session created"),
        ExamEvent::Started {
            duration_seconds, ..
        } => info!(target: "audit", %session_id, duration_seconds, "Exam session started"),
        ExamEvent::ViolationRecorded {
            source,
            severity,
            count,
            ..
        } => info!(target: "audit", %session_id, %source, %severity, count, "Violation recorded"),
        ExamEvent::Submitted { time_expired, .. } => {
            info!(target: "audit", %session_id, time_expired, "Exam session submitted")
        }
        ExamEvent::Terminated { reason, .. } => {
            warn!(target: "audit", %session_id, %reason, "Exam session terminated")
        }
        ExamEvent::ResultAcknowledged { reference, .. } => {
            info!(target: "audit", %session_id, %reference, "Exam result acknowledged")
        }
        ExamEvent::ResultFailed { error, .. } => {
            warn!(target: "audit", %session_id, %error, "Exam result hand-over failed")
        }
    }
}

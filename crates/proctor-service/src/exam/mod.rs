//! Exam session runtime.

pub mod events;
pub mod handle;
pub mod manager;
pub mod monitor;

pub use events::{EventBus, spawn_audit_logger};
pub use handle::ExamSessionHandle;
pub use manager::{ExamSessionManager, SessionDependencies};
pub use monitor::{Detection, MonitorState, SignalPolicy};

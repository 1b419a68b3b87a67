//! # proctor-service
//!
//! Business logic service layer for Proctor Hub. The exam session runtime
//! drives each live session from its own producer tasks; the remaining
//! services are thin orchestration over the stores.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod detection;
pub mod exam;
pub mod report;
pub mod violation;

pub use auth::{LoginResult, LoginService};
pub use detection::{
    DetectionService, DetectionSuite, ScriptedClassifier, SimulatedCapabilityProvider,
    SimulatedClassifier,
};
pub use exam::{EventBus, ExamSessionHandle, ExamSessionManager, SessionDependencies};
pub use report::ReportService;
pub use violation::ViolationService;

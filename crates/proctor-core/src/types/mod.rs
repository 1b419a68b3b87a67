//! Core type definitions used across the Proctor Hub workspace.

pub mod detection;
pub mod id;
pub mod sample;
pub mod session;
pub mod violation;

pub use detection::{GazeDirection, ThreatLevel};
pub use id::*;
pub use sample::{Sample, SampleChannel};
pub use session::{SessionStatus, TerminationReason};
pub use violation::{Severity, ViolationEntry, ViolationSource};

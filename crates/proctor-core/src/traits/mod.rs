//! Collaborator traits defined in `proctor-core` and implemented by other crates.

pub mod capability;
pub mod classifier;
pub mod submission;

pub use capability::{CapabilityLease, CapabilityProvider};
pub use classifier::{Classification, SignalClassifier};
pub use submission::{SubmissionPayload, SubmissionReceipt, SubmissionService};

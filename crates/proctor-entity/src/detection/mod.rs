//! Results of the detection endpoints.

pub mod audio;
pub mod face;
pub mod rf;

pub use audio::AudioAnalysis;
pub use face::{DetectedViolation, FaceAnalysis};
pub use rf::{
    DeviceCount, Recommendation, RfDetection, RfHistorySummary, SignalAnalysis,
    UnauthorizedDevice,
};

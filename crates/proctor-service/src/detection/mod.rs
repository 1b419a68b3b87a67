//! Detection: classifiers, the simulated capability, and the analysis endpoints.

pub mod scripted;
pub mod service;
pub mod simulated;

use std::sync::Arc;

use proctor_core::config::DetectionConfig;
use proctor_core::traits::SignalClassifier;
use proctor_core::types::{SampleChannel, ViolationSource};

pub use scripted::ScriptedClassifier;
pub use service::DetectionService;
pub use simulated::{SimulatedCapabilityProvider, SimulatedClassifier, SimulatedLease};

/// Channel a source's samples are captured from.
pub fn channel_for(source: ViolationSource) -> SampleChannel {
    match source {
        ViolationSource::AudioLevel => SampleChannel::Audio,
        ViolationSource::RfSignal => SampleChannel::Radio,
        _ => SampleChannel::Video,
    }
}

/// One classifier per classifier-backed violation source.
#[derive(Debug, Clone)]
pub struct DetectionSuite {
    /// Face count.
    pub face: Arc<dyn SignalClassifier>,
    /// Gaze direction.
    pub gaze: Arc<dyn SignalClassifier>,
    /// Phone presence.
    pub phone: Arc<dyn SignalClassifier>,
    /// Audio level.
    pub audio: Arc<dyn SignalClassifier>,
    /// RF scan.
    pub rf: Arc<dyn SignalClassifier>,
}

impl DetectionSuite {
    /// Seeded simulated classifiers.
    ///
    /// With a configured seed each classifier gets `seed + index`, so runs
    /// are reproducible; otherwise they are seeded from entropy.
    pub fn simulated(config: &DetectionConfig) -> Self {
        let make = |index: u64, source: ViolationSource| -> Arc<dyn SignalClassifier> {
            let seed = config.seed.map(|s| s.wrapping_add(index));
            Arc::new(SimulatedClassifier::new(source, config, seed))
        };

        Self {
            face: make(0, ViolationSource::FacePresence),
            gaze: make(1, ViolationSource::EyeGaze),
            phone: make(2, ViolationSource::PhonePresence),
            audio: make(3, ViolationSource::AudioLevel),
            rf: make(4, ViolationSource::RfSignal),
        }
    }

    /// All classifiers, for use as session monitors.
    pub fn monitors(&self) -> Vec<Arc<dyn SignalClassifier>> {
        vec![
            Arc::clone(&self.face),
            Arc::clone(&self.gaze),
            Arc::clone(&self.phone),
            Arc::clone(&self.audio),
            Arc::clone(&self.rf),
        ]
    }
}

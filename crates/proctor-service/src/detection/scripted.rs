//! Classifier replaying a fixed script, for deterministic runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_core::traits::{Classification, SignalClassifier};
use proctor_core::types::{Sample, SampleChannel, ViolationSource};

use super::channel_for;

/// Returns scripted results in order, then the fallback.
///
/// A scripted `Err(message)` is reported as a transient sampling failure.
/// Without a fallback an exhausted script also fails transiently.
#[derive(Debug)]
pub struct ScriptedClassifier {
    source: ViolationSource,
    script: Mutex<VecDeque<Result<Classification, String>>>,
    fallback: Option<Classification>,
    calls: AtomicU32,
}

impl ScriptedClassifier {
    /// Empty script for `source`.
    pub fn new(source: ViolationSource) -> Self {
        Self {
            source,
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Result returned once the script runs out.
    pub fn with_fallback(mut self, fallback: Classification) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Script to replay.
    pub fn with_script(self, script: Vec<Result<Classification, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..self
        }
    }

    /// Classifications performed so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SignalClassifier for ScriptedClassifier {
    fn source(&self) -> ViolationSource {
        self.source
    }

    fn channel(&self) -> SampleChannel {
        channel_for(self.source)
    }

    async fn classify(&self, _sample: &Sample) -> AppResult<Classification> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        match self.script.lock().await.pop_front() {
            Some(Ok(classification)) => Ok(classification),
            Some(Err(message)) => Err(AppError::transient_sampling(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| AppError::transient_sampling("Script exhausted")),
        }
    }
}

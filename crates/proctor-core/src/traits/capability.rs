//! Camera/microphone capability provider.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::SessionId;
use crate::types::sample::{Sample, SampleChannel};

/// Grants or denies camera + microphone access for a session.
///
/// Acquisition is the only operation that may suspend for an external
/// grant (the browser permission prompt). A denial must be reported as
/// [`crate::error::ErrorKind::DeviceUnavailable`].
#[async_trait]
pub trait CapabilityProvider: Send + Sync + Debug + 'static {
    /// Acquire the capability for a session.
    async fn acquire(&self, session_id: &SessionId) -> AppResult<Arc<dyn CapabilityLease>>;
}

/// A granted capability. Must be released exactly once.
#[async_trait]
pub trait CapabilityLease: Send + Sync + Debug + 'static {
    /// Capture one sample from the given channel.
    ///
    /// Failures are transient: the caller skips the interval.
    async fn capture(&self, channel: SampleChannel) -> AppResult<Sample>;

    /// Stop every track held by the lease.
    async fn release(&self);
}

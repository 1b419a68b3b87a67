//! History of RF scans.

use tokio::sync::RwLock;

use proctor_core::types::TestId;
use proctor_entity::detection::{RfDetection, RfHistorySummary};

/// Append-only log of RF scans.
#[derive(Debug, Default)]
pub struct RfScanHistory {
    scans: RwLock<Vec<RfDetection>>,
}

impl RfScanHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scan.
    pub async fn push(&self, scan: RfDetection) {
        self.scans.write().await.push(scan);
    }

    /// Summarize the scans of one test, or of all tests.
    pub async fn summary(&self, test_id: Option<&TestId>) -> RfHistorySummary {
        let scans = self.scans.read().await;
        let matching: Vec<RfDetection> = scans
            .iter()
            .filter(|s| test_id.is_none_or(|t| *t == s.test_id))
            .cloned()
            .collect();
        RfHistorySummary::from_scans(test_id.cloned(), &matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::types::{StudentId, ThreatLevel};

    #[tokio::test]
    async fn test_summary_per_test() {
        let history = RfScanHistory::new();
        for (test, threat) in [
            ("1", ThreatLevel::Low),
            ("1", ThreatLevel::High),
            ("2", ThreatLevel::Low),
        ] {
            history
                .push(RfDetection::from_scan(
                    TestId::new(test),
                    StudentId::new("s1"),
                    4,
                    2400,
                    threat,
                    Vec::new(),
                ))
                .await;
        }

        let one = history.summary(Some(&TestId::new("1"))).await;
        assert_eq!(one.total_scans, 2);
        assert_eq!(one.anomalies_detected, 1);
        assert_eq!(history.summary(None).await.total_scans, 3);
    }
}

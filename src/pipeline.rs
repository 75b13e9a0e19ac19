//! Pipeline orchestration
//!
//! This module provides the public API for turning domain-signal JSON into
//! encoded snapshots. It orchestrates the stages: parse → score → trend →
//! encode. Insight generation stays a separate call so request handlers can
//! serve insights without re-encoding a snapshot.

use crate::engine::compute_ei;
use crate::error::ComputeError;
use crate::snapshot::SnapshotEncoder;
use crate::trend::TrendStore;
use crate::types::{DomainSignals, EiSnapshot};

/// Parse a domain-signals JSON object.
pub fn parse_signals(json: &str) -> Result<DomainSignals, ComputeError> {
    serde_json::from_str(json)
        .map_err(|e| ComputeError::ParseError(format!("Failed to parse domain signals: {}", e)))
}

/// Convert domain-signal JSON to snapshot JSON (stateless, one-shot).
///
/// Each call uses a fresh encoder and carries no trend context. Use
/// [`EiProcessor`] when snapshots should be read against recent history.
pub fn signals_to_snapshot(signals_json: &str, user_id: &str) -> Result<String, ComputeError> {
    let signals = parse_signals(signals_json)?;
    let result = compute_ei(&signals);

    let encoder = SnapshotEncoder::new();
    encoder.encode_to_json(user_id, &result)
}

/// Stateful processor for incremental scoring with a persistent trend window.
///
/// Use this when a sequence of computations for the same user should carry
/// rolling-average context (onboarding baseline, then periodic diagnostics).
pub struct EiProcessor {
    encoder: SnapshotEncoder,
    trend: TrendStore,
}

impl Default for EiProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl EiProcessor {
    /// Create a new processor with the default 28-snapshot trend window
    pub fn new() -> Self {
        Self {
            encoder: SnapshotEncoder::new(),
            trend: TrendStore::default(),
        }
    }

    /// Create a processor with a specific trend window size (snapshots)
    pub fn with_trend_window(snapshots: usize) -> Self {
        Self {
            encoder: SnapshotEncoder::new(),
            trend: TrendStore::new(snapshots),
        }
    }

    /// Score parsed signals and encode a snapshot with trend context.
    pub fn compute(&mut self, user_id: &str, signals: &DomainSignals) -> EiSnapshot {
        let result = compute_ei(signals);
        let trend = self.trend.update_and_contextualize(&result);
        self.encoder.encode(user_id, &result).with_trend(trend)
    }

    /// Process domain-signal JSON and return snapshot JSON.
    pub fn process(&mut self, user_id: &str, signals_json: &str) -> Result<String, ComputeError> {
        let signals = parse_signals(signals_json)?;
        let snapshot = self.compute(user_id, &signals);
        serde_json::to_string_pretty(&snapshot).map_err(ComputeError::JsonError)
    }

    /// Save trend state to JSON for persistence
    pub fn save_trend(&self) -> Result<String, ComputeError> {
        self.trend
            .to_json()
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Load trend state from JSON
    pub fn load_trend(&mut self, json: &str) -> Result<(), ComputeError> {
        self.trend =
            TrendStore::from_json(json).map_err(|e| ComputeError::ParseError(e.to_string()))?;
        Ok(())
    }

    /// Number of snapshots currently in the trend window
    pub fn snapshot_count(&self) -> usize {
        self.trend.snapshot_count()
    }

    /// Clear all trend data
    pub fn clear_trend(&mut self) {
        self.trend.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegulationState;

    fn sample_signals_json() -> &'static str {
        r#"{
            "timeOnTask": 100,
            "plannedTime": 100,
            "focusRating": 4,
            "recoveryTimes": [15, 25],
            "clarityRating": 4,
            "regulationRating": 4,
            "journalEntries": 2,
            "practiceMinutes": 45,
            "importantTasksCompleted": 1,
            "calendarDensity": 55
        }"#
    }

    #[test]
    fn test_signals_to_snapshot_stateless() {
        let json = signals_to_snapshot(sample_signals_json(), "user-1").unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot["userId"], "user-1");
        assert_eq!(snapshot["producer"]["name"], "ei-core");
        assert!(snapshot["score"].as_u64().unwrap() > 0);
        // Stateless call carries no trend context
        assert!(snapshot.get("trend").is_none());

        // All contract fields present
        for field in [
            "focusEfficiency",
            "recoveryLatency",
            "decisionClarity",
            "emotionRegulation",
            "supportUtilization",
            "strategicMomentum",
            "state",
        ] {
            assert!(snapshot.get(field).is_some(), "missing {}", field);
        }
    }

    #[test]
    fn test_onboarding_baseline_snapshot() {
        // Onboarding completes with no accumulated signals yet
        let json = signals_to_snapshot("{}", "user-1").unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot["score"], 62);
        assert_eq!(snapshot["supportUtilization"], 0);
        assert_eq!(snapshot["state"], "FIGHT");
    }

    #[test]
    fn test_processor_threads_trend() {
        let mut processor = EiProcessor::new();

        let first = processor.process("user-1", sample_signals_json()).unwrap();
        let first: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(first["trend"]["snapshotsInWindow"], 1);
        assert!(first["trend"]["scoreDeviationPct"].is_null());
        assert_eq!(processor.snapshot_count(), 1);

        let second = processor.process("user-1", sample_signals_json()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&second).unwrap();
        assert_eq!(second["trend"]["snapshotsInWindow"], 2);
        // Identical signals, identical score: zero deviation
        assert_eq!(second["trend"]["scoreDeviationPct"], 0.0);
    }

    #[test]
    fn test_processor_custom_window() {
        let mut processor = EiProcessor::with_trend_window(5);
        for _ in 0..8 {
            processor.process("user-1", sample_signals_json()).unwrap();
        }
        assert_eq!(processor.snapshot_count(), 5);
    }

    #[test]
    fn test_trend_serialization_round_trip() {
        let mut processor = EiProcessor::new();
        processor.process("user-1", sample_signals_json()).unwrap();

        let saved = processor.save_trend().unwrap();

        let mut restored = EiProcessor::new();
        restored.load_trend(&saved).unwrap();
        assert_eq!(restored.snapshot_count(), 1);

        restored.process("user-1", sample_signals_json()).unwrap();
        assert_eq!(restored.snapshot_count(), 2);
    }

    #[test]
    fn test_clear_trend() {
        let mut processor = EiProcessor::new();
        for _ in 0..4 {
            processor.process("user-1", sample_signals_json()).unwrap();
        }
        assert_eq!(processor.snapshot_count(), 4);

        processor.clear_trend();
        assert_eq!(processor.snapshot_count(), 0);
    }

    #[test]
    fn test_compute_returns_value_snapshot() {
        let mut processor = EiProcessor::new();
        let signals = parse_signals(sample_signals_json()).unwrap();
        let snapshot = processor.compute("user-1", &signals);

        assert_eq!(snapshot.state, RegulationState::Regulated);
        assert!(snapshot.trend.is_some());
    }

    #[test]
    fn test_invalid_json() {
        let result = signals_to_snapshot("not valid json", "user-1");
        assert!(result.is_err());

        let mut processor = EiProcessor::new();
        assert!(processor.process("user-1", "[1, 2]").is_err());
        // A failed parse never touches the trend window
        assert_eq!(processor.snapshot_count(), 0);
    }
}

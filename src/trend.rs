//! Score trend management
//!
//! Maintains a rolling window of recent aggregate scores so each new snapshot
//! can be read relative to the user's own recent history rather than in
//! isolation. The store is a plain value: callers persist it by serializing
//! to JSON and loading it back.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{EiResult, TrendSummary};

/// Default trend window in snapshots (one scheduled computation per day for
/// four weeks).
pub const DEFAULT_TREND_WINDOW: usize = 28;

/// Rolling window of aggregate scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStore {
    /// Rolling aggregate scores, oldest first
    scores: VecDeque<f64>,
    /// Maximum window size (number of snapshots)
    window_size: usize,
}

impl Default for TrendStore {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_WINDOW)
    }
}

impl TrendStore {
    /// Create a new store with the specified window size (number of snapshots)
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Fold a new result into the window and return its trend context.
    ///
    /// The deviation is measured against the window as it stood *before* this
    /// result entered it; the returned average includes it.
    pub fn update_and_contextualize(&mut self, result: &EiResult) -> TrendSummary {
        let prior_average = Self::rolling_average(&self.scores);
        let score = result.score as f64;

        let score_deviation_pct = match prior_average {
            Some(base) if base > 0.0 => Some(((score - base) / base) * 100.0),
            Some(_) if score > 0.0 => Some(100.0), // from zero to something
            Some(_) => Some(0.0),
            None => None,
        };

        self.scores.push_back(score);
        while self.scores.len() > self.window_size {
            self.scores.pop_front();
        }

        TrendSummary {
            average_score: Self::rolling_average(&self.scores),
            score_deviation_pct,
            snapshots_in_window: self.scores.len() as u32,
        }
    }

    fn rolling_average(scores: &VecDeque<f64>) -> Option<f64> {
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Load a store from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the store to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Number of snapshots currently in the window
    pub fn snapshot_count(&self) -> usize {
        self.scores.len()
    }

    /// Drop all recorded scores
    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegulationState;

    fn result_with_score(score: u8) -> EiResult {
        EiResult {
            score,
            focus_efficiency: score,
            recovery_latency: score,
            decision_clarity: score,
            emotion_regulation: score,
            support_utilization: score,
            strategic_momentum: score,
            state: RegulationState::Regulated,
        }
    }

    #[test]
    fn test_first_snapshot_has_no_deviation() {
        let mut store = TrendStore::new(10);
        let summary = store.update_and_contextualize(&result_with_score(70));

        assert!(summary.score_deviation_pct.is_none());
        assert_eq!(summary.average_score, Some(70.0));
        assert_eq!(summary.snapshots_in_window, 1);
    }

    #[test]
    fn test_deviation_against_prior_window() {
        let mut store = TrendStore::new(10);
        for _ in 0..5 {
            store.update_and_contextualize(&result_with_score(60));
        }

        // 72 against a baseline of 60 is +20 percent
        let summary = store.update_and_contextualize(&result_with_score(72));
        assert!((summary.score_deviation_pct.unwrap() - 20.0).abs() < 0.001);
        assert_eq!(summary.snapshots_in_window, 6);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut store = TrendStore::new(3);
        for score in [40u8, 50, 60, 70, 80] {
            store.update_and_contextualize(&result_with_score(score));
        }

        // Only 60, 70, 80 remain
        assert_eq!(store.snapshot_count(), 3);
        let summary = store.update_and_contextualize(&result_with_score(70));
        // Deviation against (60+70+80)/3 = 70
        assert!((summary.score_deviation_pct.unwrap() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = TrendStore::new(10);
        store.update_and_contextualize(&result_with_score(65));
        store.update_and_contextualize(&result_with_score(71));

        let json = store.to_json().unwrap();
        let mut loaded = TrendStore::from_json(&json).unwrap();

        assert_eq!(loaded.snapshot_count(), 2);
        let summary = loaded.update_and_contextualize(&result_with_score(68));
        assert_eq!(summary.snapshots_in_window, 3);
        assert_eq!(summary.average_score, Some((65.0 + 71.0 + 68.0) / 3.0));
    }

    #[test]
    fn test_clear() {
        let mut store = TrendStore::default();
        for _ in 0..5 {
            store.update_and_contextualize(&result_with_score(55));
        }
        assert_eq!(store.snapshot_count(), 5);

        store.clear();
        assert_eq!(store.snapshot_count(), 0);
        let summary = store.update_and_contextualize(&result_with_score(55));
        assert!(summary.score_deviation_pct.is_none());
    }
}

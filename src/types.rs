//! Core types for the EI compute engine
//!
//! This module defines the data structures that flow through the scoring
//! pipeline: domain signals, scored results, calendar summaries, insight
//! reports, and encoded snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Regulation state derived from the scored sub-indices.
///
/// Categorical label describing the inferred stress-response mode. Derived by
/// the scoring engine, never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegulationState {
    Fight,
    Flight,
    Freeze,
    Regulated,
}

impl RegulationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegulationState::Fight => "FIGHT",
            RegulationState::Flight => "FLIGHT",
            RegulationState::Freeze => "FREEZE",
            RegulationState::Regulated => "REGULATED",
        }
    }
}

/// Raw behavioral and calendar measurements for one scoring window.
///
/// Every field is optional; an absent field falls back to that sub-index's
/// documented baseline. Values are expected to be pre-validated by the
/// producing layer (see [`DomainSignals::validate`]); the engine itself
/// never rejects input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSignals {
    // Focus metrics
    /// Minutes actually spent on task
    pub time_on_task: Option<f64>,
    /// Minutes of focus time planned
    pub planned_time: Option<f64>,
    /// Subjective focus rating (1-5)
    pub focus_rating: Option<u8>,

    // Recovery metrics
    /// Number of stress spikes in the window
    pub stress_events: Option<u32>,
    /// Minutes to regulate after each spike, in spike order
    pub recovery_times: Vec<f64>,

    // Decision metrics
    /// Decisions made in the window
    pub decisions_made: Option<u32>,
    /// Times the user reported feeling stuck
    pub indecision_markers: Option<u32>,
    /// Subjective clarity rating (1-5)
    pub clarity_rating: Option<u8>,

    // Emotion regulation
    /// Variance-like measure of mood ratings
    pub mood_variability: Option<f64>,
    /// Minutes spent in rumination
    pub rumination_minutes: Option<f64>,
    /// Subjective regulation rating (1-5)
    pub regulation_rating: Option<u8>,

    // Support utilization
    /// Journal entries this period
    pub journal_entries: Option<u32>,
    /// Therapeutic practice minutes
    pub practice_minutes: Option<f64>,
    /// Program steps completed
    pub program_steps_completed: Option<u32>,

    // Strategic momentum
    /// "One important thing" completions
    pub important_tasks_completed: Option<u32>,
    /// Subjective progress rating (1-5)
    pub strategic_rating: Option<u8>,

    // Calendar context
    /// Percent of working time scheduled (may exceed 100)
    pub calendar_density: Option<f64>,
    /// Events starting in the evening
    pub evening_events: Option<u32>,
    /// Longest continuous meeting block (hours)
    pub peak_block_hours: Option<f64>,
}

impl DomainSignals {
    /// Fold a calendar summary into the calendar-context fields.
    pub fn with_calendar(mut self, summary: &CalendarSummary) -> Self {
        self.calendar_density = Some(summary.density);
        self.evening_events = Some(summary.evening_events);
        self.peak_block_hours = Some(summary.peak_block_hours);
        self
    }

    /// Caller-side range validation.
    ///
    /// The engine is total and will happily clamp semantically meaningless
    /// input; producers that want to reject such input up front can run this
    /// first. Ratings must lie in 1-5 and minute/variance measures must be
    /// non-negative.
    pub fn validate(&self) -> Result<(), ComputeError> {
        for (name, rating) in [
            ("focusRating", self.focus_rating),
            ("clarityRating", self.clarity_rating),
            ("regulationRating", self.regulation_rating),
            ("strategicRating", self.strategic_rating),
        ] {
            if let Some(r) = rating {
                if !(1..=5).contains(&r) {
                    return Err(ComputeError::InvalidSignal(format!(
                        "{} must be between 1 and 5, got {}",
                        name, r
                    )));
                }
            }
        }

        for (name, value) in [
            ("timeOnTask", self.time_on_task),
            ("plannedTime", self.planned_time),
            ("moodVariability", self.mood_variability),
            ("ruminationMinutes", self.rumination_minutes),
            ("practiceMinutes", self.practice_minutes),
            ("calendarDensity", self.calendar_density),
            ("peakBlockHours", self.peak_block_hours),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ComputeError::InvalidSignal(format!(
                        "{} must be a non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }

        if let Some(bad) = self
            .recovery_times
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0)
        {
            return Err(ComputeError::InvalidSignal(format!(
                "recoveryTimes entries must be non-negative, got {}",
                bad
            )));
        }

        Ok(())
    }
}

/// Scored result for one window: six sub-indices, the weighted aggregate,
/// and the derived regulation state. All scores are integers in 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiResult {
    /// Weighted aggregate score
    pub score: u8,
    pub focus_efficiency: u8,
    pub recovery_latency: u8,
    pub decision_clarity: u8,
    pub emotion_regulation: u8,
    pub support_utilization: u8,
    pub strategic_momentum: u8,
    pub state: RegulationState,
}

impl EiResult {
    /// Sub-index display names paired with their scores, in the fixed
    /// reporting order used throughout insight generation.
    pub fn sub_indices(&self) -> [(&'static str, u8); 6] {
        [
            ("Focus Efficiency", self.focus_efficiency),
            ("Recovery Latency", self.recovery_latency),
            ("Decision Clarity", self.decision_clarity),
            ("Emotion Regulation", self.emotion_regulation),
            ("Support Utilization", self.support_utilization),
            ("Strategic Momentum", self.strategic_momentum),
        ]
    }
}

/// A scheduled calendar event supplied by the caller.
///
/// All-day events (no concrete start/end clock time) should be filtered out
/// before summarization, matching how the upstream fetch layer treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Workload summary computed from calendar events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    /// Events in the horizon
    pub total_events: u32,
    /// Scheduled minutes in the horizon
    pub total_busy_minutes: f64,
    /// Percent of working time scheduled (0-100, capped)
    pub density: f64,
    /// Events starting at or after the evening cutoff
    pub evening_events: u32,
    /// Longest continuous block of back-to-back events (hours)
    pub peak_block_hours: f64,
}

/// Natural-language output of the insight generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Sub-index names scoring below 60, in fixed reporting order
    pub focus_areas: Vec<String>,
}

/// Producer metadata stamped onto encoded snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Rolling-window context attached to a snapshot when a trend store is in
/// play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// Rolling average score including the current snapshot
    pub average_score: Option<f64>,
    /// Deviation of the current score from the prior window average (percent)
    pub score_deviation_pct: Option<f64>,
    /// Snapshots currently in the window
    pub snapshots_in_window: u32,
}

/// Durable record of one scoring run, in the shape consumed by external
/// snapshot storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiSnapshot {
    /// Snapshot identifier (UUID)
    pub id: String,
    pub user_id: String,
    pub score: u8,
    pub focus_efficiency: u8,
    pub recovery_latency: u8,
    pub decision_clarity: u8,
    pub emotion_regulation: u8,
    pub support_utilization: u8,
    pub strategic_momentum: u8,
    pub state: RegulationState,
    pub producer: SnapshotProducer,
    /// When the snapshot was encoded (RFC3339)
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSummary>,
}

impl EiSnapshot {
    /// Attach rolling-window context.
    pub fn with_trend(mut self, trend: TrendSummary) -> Self {
        self.trend = Some(trend);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regulation_state_serialization() {
        let state = RegulationState::Regulated;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"REGULATED\"");

        let parsed: RegulationState = serde_json::from_str("\"FIGHT\"").unwrap();
        assert_eq!(parsed, RegulationState::Fight);
        assert_eq!(parsed.as_str(), "FIGHT");
    }

    #[test]
    fn test_domain_signals_deserialization() {
        let json = r#"{
            "timeOnTask": 90,
            "plannedTime": 120,
            "focusRating": 4,
            "recoveryTimes": [12.5, 30],
            "importantTasksCompleted": 1
        }"#;

        let signals: DomainSignals = serde_json::from_str(json).unwrap();
        assert_eq!(signals.time_on_task, Some(90.0));
        assert_eq!(signals.planned_time, Some(120.0));
        assert_eq!(signals.focus_rating, Some(4));
        assert_eq!(signals.recovery_times, vec![12.5, 30.0]);
        assert_eq!(signals.important_tasks_completed, Some(1));
        // Everything omitted stays absent
        assert!(signals.clarity_rating.is_none());
        assert!(signals.calendar_density.is_none());
    }

    #[test]
    fn test_empty_object_is_all_absent() {
        let signals: DomainSignals = serde_json::from_str("{}").unwrap();
        assert!(signals.time_on_task.is_none());
        assert!(signals.recovery_times.is_empty());
        assert!(signals.important_tasks_completed.is_none());
    }

    #[test]
    fn test_validate_accepts_sound_signals() {
        let signals = DomainSignals {
            focus_rating: Some(5),
            recovery_times: vec![10.0, 25.0],
            mood_variability: Some(1.5),
            ..Default::default()
        };
        assert!(signals.validate().is_ok());
        assert!(DomainSignals::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let signals = DomainSignals {
            clarity_rating: Some(0),
            ..Default::default()
        };
        let err = signals.validate().unwrap_err();
        assert!(err.to_string().contains("clarityRating"));

        let signals = DomainSignals {
            strategic_rating: Some(6),
            ..Default::default()
        };
        assert!(signals.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_measures() {
        let signals = DomainSignals {
            practice_minutes: Some(-5.0),
            ..Default::default()
        };
        assert!(signals.validate().is_err());

        let signals = DomainSignals {
            recovery_times: vec![10.0, -1.0],
            ..Default::default()
        };
        assert!(signals.validate().is_err());
    }

    #[test]
    fn test_with_calendar_folds_context() {
        let summary = CalendarSummary {
            total_events: 9,
            total_busy_minutes: 480.0,
            density: 82.0,
            evening_events: 3,
            peak_block_hours: 4.5,
        };

        let signals = DomainSignals::default().with_calendar(&summary);
        assert_eq!(signals.calendar_density, Some(82.0));
        assert_eq!(signals.evening_events, Some(3));
        assert_eq!(signals.peak_block_hours, Some(4.5));
    }

    #[test]
    fn test_snapshot_serializes_contract_fields() {
        let snapshot = EiSnapshot {
            id: "snap-1".to_string(),
            user_id: "user-1".to_string(),
            score: 62,
            focus_efficiency: 75,
            recovery_latency: 80,
            decision_clarity: 70,
            emotion_regulation: 75,
            support_utilization: 0,
            strategic_momentum: 65,
            state: RegulationState::Fight,
            producer: SnapshotProducer {
                name: "ei-core".to_string(),
                version: "0.1.0".to_string(),
                instance_id: "instance-1".to_string(),
            },
            created_at: "2024-01-15T14:00:00+00:00".to_string(),
            trend: None,
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(value["score"], 62);
        assert_eq!(value["focusEfficiency"], 75);
        assert_eq!(value["recoveryLatency"], 80);
        assert_eq!(value["decisionClarity"], 70);
        assert_eq!(value["emotionRegulation"], 75);
        assert_eq!(value["supportUtilization"], 0);
        assert_eq!(value["strategicMomentum"], 65);
        assert_eq!(value["state"], "FIGHT");
        assert_eq!(value["userId"], "user-1");
        // No trend attached, no trend key emitted
        assert!(value.get("trend").is_none());
    }
}

//! EI scoring engine
//!
//! Computes the six effectiveness sub-indices from domain signals, applies
//! calendar-context penalties, aggregates to a single weighted score, and
//! classifies the regulation state.
//!
//! [`compute_ei`] is a total function: any `DomainSignals` value, including
//! an all-absent one, produces a result. No I/O, no clock reads, no
//! randomness; identical input yields identical output.

use crate::types::{DomainSignals, EiResult, RegulationState};

// Sub-index baselines used when the corresponding signals are absent
const FOCUS_BASELINE: f64 = 75.0;
const RECOVERY_BASELINE: f64 = 80.0;
const DECISION_BASELINE: f64 = 70.0;
const EMOTION_BASELINE: f64 = 75.0;
const STRATEGIC_BASELINE: f64 = 65.0;

// Aggregate weights (sum to 1.0)
const WEIGHT_FOCUS: f64 = 0.20;
const WEIGHT_RECOVERY: f64 = 0.15;
const WEIGHT_DECISION: f64 = 0.15;
const WEIGHT_EMOTION: f64 = 0.20;
const WEIGHT_SUPPORT: f64 = 0.15;
const WEIGHT_STRATEGIC: f64 = 0.15;

// Calendar-context thresholds
const DENSITY_PENALTY_THRESHOLD: f64 = 70.0;
const EVENING_EVENT_ALLOWANCE: u32 = 2;

/// Compute the Effectiveness Index for one window of domain signals.
pub fn compute_ei(signals: &DomainSignals) -> EiResult {
    let mut focus_efficiency = compute_focus_efficiency(signals);
    let mut recovery_latency = compute_recovery_latency(signals);
    let decision_clarity = compute_decision_clarity(signals);
    let emotion_regulation = compute_emotion_regulation(signals);
    let support_utilization = compute_support_utilization(signals);
    let strategic_momentum = compute_strategic_momentum(signals);

    apply_calendar_context(signals, &mut focus_efficiency, &mut recovery_latency);

    let score = (focus_efficiency * WEIGHT_FOCUS
        + recovery_latency * WEIGHT_RECOVERY
        + decision_clarity * WEIGHT_DECISION
        + emotion_regulation * WEIGHT_EMOTION
        + support_utilization * WEIGHT_SUPPORT
        + strategic_momentum * WEIGHT_STRATEGIC)
        .round();

    // Classification reads the unrounded sub-indices; only the returned
    // integers are rounded.
    let state = classify(
        score,
        focus_efficiency,
        recovery_latency,
        decision_clarity,
        emotion_regulation,
        strategic_momentum,
    );

    EiResult {
        score: score as u8,
        focus_efficiency: focus_efficiency.round() as u8,
        recovery_latency: recovery_latency.round() as u8,
        decision_clarity: decision_clarity.round() as u8,
        emotion_regulation: emotion_regulation.round() as u8,
        support_utilization: support_utilization.round() as u8,
        strategic_momentum: strategic_momentum.round() as u8,
        state,
    }
}

/// Focus Efficiency: actual-vs-planned time ratio, adjusted by self-rating.
fn compute_focus_efficiency(signals: &DomainSignals) -> f64 {
    let mut focus = FOCUS_BASELINE;

    if let (Some(on_task), Some(planned)) = (signals.time_on_task, signals.planned_time) {
        // Zero planned time carries no ratio information
        if planned > 0.0 {
            let efficiency = (on_task / planned).min(1.2);
            focus = (efficiency * 80.0).round(); // ceiling 96
        }
    }

    if let Some(rating) = signals.focus_rating {
        let bonus = ((rating as f64 - 3.0) / 2.0) * 20.0; // -20 to +20
        focus = (focus + bonus).clamp(0.0, 100.0);
    }

    focus
}

/// Recovery Latency: higher is faster recovery.
///
/// Three-segment piecewise-linear decay over the mean minutes-to-regulate:
/// 0-30 min maps to 100-70, 30-120 min to 70-20, beyond 120 min to 20-0.
fn compute_recovery_latency(signals: &DomainSignals) -> f64 {
    if signals.recovery_times.is_empty() {
        return RECOVERY_BASELINE;
    }

    let avg =
        signals.recovery_times.iter().sum::<f64>() / signals.recovery_times.len() as f64;

    if avg <= 30.0 {
        (100.0 - (avg / 30.0) * 30.0).round()
    } else if avg <= 120.0 {
        (70.0 - ((avg - 30.0) / 90.0) * 50.0).round()
    } else {
        (20.0 - ((avg - 120.0) / 60.0).min(1.0) * 20.0).round()
    }
}

/// Decision Clarity: self-rating scaled to 0-100, penalized per stuck moment.
fn compute_decision_clarity(signals: &DomainSignals) -> f64 {
    let mut clarity = DECISION_BASELINE;

    if let Some(rating) = signals.clarity_rating {
        clarity = ((rating as f64 / 5.0) * 100.0).round();
    }

    if let Some(markers) = signals.indecision_markers {
        let penalty = (markers as f64 * 5.0).min(30.0);
        clarity = (clarity - penalty).max(0.0);
    }

    clarity
}

/// Emotion Regulation: self-rating scaled to 0-100, penalized by mood swing.
fn compute_emotion_regulation(signals: &DomainSignals) -> f64 {
    let mut regulation = EMOTION_BASELINE;

    if let Some(rating) = signals.regulation_rating {
        regulation = ((rating as f64 / 5.0) * 100.0).round();
    }

    if let Some(variability) = signals.mood_variability {
        let penalty = (variability * 10.0).min(40.0);
        regulation = (regulation - penalty).max(0.0);
    }

    regulation
}

/// Support Utilization: credit for journaling, practice time, and program
/// steps.
///
/// No additive baseline: with every support signal absent the sub-index is
/// exactly 0, unlike the other five. Journaling contributes up to 30,
/// practice up to 40, program steps up to 30.
fn compute_support_utilization(signals: &DomainSignals) -> f64 {
    let mut support = 0.0;

    if let Some(entries) = signals.journal_entries {
        support += (entries as f64 * 15.0).min(30.0);
    }
    if let Some(minutes) = signals.practice_minutes {
        support += ((minutes / 30.0) * 25.0).min(40.0);
    }
    if let Some(steps) = signals.program_steps_completed {
        support += (steps as f64 * 10.0).min(30.0);
    }

    support.min(100.0)
}

/// Strategic Momentum: step function over important-task completions,
/// adjusted by self-rating.
fn compute_strategic_momentum(signals: &DomainSignals) -> f64 {
    let mut momentum = STRATEGIC_BASELINE;

    // Some(0) is meaningful here: an explicit zero completions maps to 40
    if let Some(completed) = signals.important_tasks_completed {
        momentum = match completed {
            0 => 40.0,
            1 => 85.0,
            n => (85.0 + (n as f64 - 1.0) * 15.0).min(100.0),
        };
    }

    if let Some(rating) = signals.strategic_rating {
        let adjust = ((rating as f64 - 3.0) / 2.0) * 15.0; // -15 to +15
        momentum = (momentum + adjust).clamp(0.0, 100.0);
    }

    momentum
}

/// Calendar-context penalties on focus and recovery.
fn apply_calendar_context(signals: &DomainSignals, focus: &mut f64, recovery: &mut f64) {
    if let Some(density) = signals.calendar_density {
        if density > DENSITY_PENALTY_THRESHOLD {
            let overload = density - DENSITY_PENALTY_THRESHOLD;
            *focus = (*focus - overload).max(0.0);
            *recovery = (*recovery - overload * 0.5).max(0.0);
        }
    }

    if let Some(evening) = signals.evening_events {
        if evening > EVENING_EVENT_ALLOWANCE {
            *recovery =
                (*recovery - (evening - EVENING_EVENT_ALLOWANCE) as f64 * 5.0).max(0.0);
        }
    }
}

/// Ordered decision list for the regulation state; first match wins.
///
/// The rule-5 fallback takes the minimum over focus, recovery, clarity, and
/// emotion only; on ties recovery wins over clarity, which wins over the
/// freeze default.
fn classify(
    score: f64,
    focus_efficiency: f64,
    recovery_latency: f64,
    decision_clarity: f64,
    emotion_regulation: f64,
    strategic_momentum: f64,
) -> RegulationState {
    if score < 40.0 {
        return RegulationState::Freeze;
    }
    if recovery_latency < 40.0 && emotion_regulation < 50.0 {
        return RegulationState::Flight;
    }
    if decision_clarity < 40.0 && strategic_momentum < 50.0 {
        return RegulationState::Fight;
    }
    if score >= 70.0 {
        return RegulationState::Regulated;
    }

    let min_score = focus_efficiency
        .min(recovery_latency)
        .min(decision_clarity)
        .min(emotion_regulation);
    if min_score == recovery_latency {
        RegulationState::Flight
    } else if min_score == decision_clarity {
        RegulationState::Fight
    } else {
        RegulationState::Freeze
    }
}

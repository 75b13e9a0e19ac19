//! Insight generation
//!
//! Turns a scored [`EiResult`] into founder-facing natural-language insights,
//! recommendations, and a ranked list of weak areas. Pure and total, like the
//! engine: no I/O, no clock, no randomness.

use crate::types::{CalendarSummary, EiResult, InsightReport, RegulationState};

/// Sub-index scores below this threshold become focus areas.
const FOCUS_AREA_THRESHOLD: u8 = 60;

/// Calendar density (percent) above which buffer time is recommended.
const HIGH_DENSITY_THRESHOLD: f64 = 70.0;

/// Evening events above which extra recovery is recommended.
const EVENING_EVENT_THRESHOLD: u32 = 2;

/// Longest-block hours above which a recovery break is recommended.
const PEAK_BLOCK_THRESHOLD_HOURS: f64 = 3.0;

/// Generate insights and recommendations from a scored result.
///
/// The two strongest and two weakest sub-indices are picked by sorted
/// position, not by absolute threshold; `focus_areas` lists every sub-index
/// under 60 in the fixed reporting order.
pub fn generate_insights(
    result: &EiResult,
    calendar: Option<&CalendarSummary>,
) -> InsightReport {
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    let scores = result.sub_indices();
    let mut ranked = scores.to_vec();
    // Stable sort: ties keep the fixed reporting order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let strengths = &ranked[..2];
    let weaknesses = &ranked[ranked.len() - 2..];

    let tier = if result.score >= 80 {
        "excellent"
    } else if result.score >= 65 {
        "good"
    } else if result.score >= 50 {
        "moderate"
    } else {
        "low"
    };
    insights.push(format!(
        "Your effectiveness score is {}, indicating {} performance.",
        result.score, tier
    ));

    insights.push(format!(
        "Your strongest areas are {} and {}.",
        strengths[0].0, strengths[1].0
    ));

    if weaknesses.iter().any(|(_, score)| *score < FOCUS_AREA_THRESHOLD) {
        insights.push(format!(
            "Consider focusing on {} and {}.",
            weaknesses[0].0, weaknesses[1].0
        ));
    }

    match result.state {
        RegulationState::Regulated => {
            insights.push(
                "You're in a regulated state with good balance across effectiveness areas."
                    .to_string(),
            );
        }
        RegulationState::Fight => {
            insights.push(
                "You may be experiencing decision paralysis or strategic stagnation."
                    .to_string(),
            );
            recommendations.push(
                "Try the 2-minute rule: if something takes less than 2 minutes, do it now."
                    .to_string(),
            );
        }
        RegulationState::Flight => {
            insights
                .push("You may be experiencing stress with slower recovery times.".to_string());
            recommendations.push(
                "Consider scheduling more recovery time between high-intensity activities."
                    .to_string(),
            );
        }
        RegulationState::Freeze => {
            insights.push("You may be feeling overwhelmed or stuck.".to_string());
            recommendations
                .push("Focus on small, achievable wins to build momentum.".to_string());
        }
    }

    if let Some(calendar) = calendar {
        if calendar.density > HIGH_DENSITY_THRESHOLD {
            recommendations.push(
                "Your calendar shows high density. Consider scheduling buffer time between meetings."
                    .to_string(),
            );
        }
        if calendar.evening_events > EVENING_EVENT_THRESHOLD {
            recommendations
                .push("Multiple evening events detected. Plan for extra recovery time.".to_string());
        }
        if calendar.peak_block_hours > PEAK_BLOCK_THRESHOLD_HOURS {
            recommendations.push(format!(
                "Your longest meeting block is {} hours. Consider a short recovery session afterward.",
                calendar.peak_block_hours
            ));
        }
    }

    let focus_areas = scores
        .iter()
        .filter(|(_, score)| *score < FOCUS_AREA_THRESHOLD)
        .map(|(name, _)| (*name).to_string())
        .collect();

    InsightReport {
        insights,
        recommendations,
        focus_areas,
    }
}

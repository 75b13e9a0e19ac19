//! Calendar workload summarization
//!
//! Pure event math over caller-supplied calendar events: scheduled density,
//! evening load, and the longest continuous meeting block. Fetching events
//! (and deciding which calendars to read) is the caller's concern.

use chrono::Timelike;

use crate::types::{CalendarEvent, CalendarSummary};

/// Events starting at or after this hour count as evening events.
const EVENING_START_HOUR: u32 = 19;

/// Events separated by at most this many minutes merge into one block.
const BLOCK_JOIN_GAP_MIN: f64 = 15.0;

/// Assumed working hours per day for the density denominator.
const WORKING_HOURS_PER_DAY: f64 = 12.0;

/// Summarize calendar events over a horizon of `horizon_days` days.
///
/// Density is the share of working time (12h/day) occupied by events, capped
/// at 100 percent. Events are processed in chronological order regardless of
/// input order.
pub fn summarize_events(events: &[CalendarEvent], horizon_days: u32) -> CalendarSummary {
    let mut events = events.to_vec();
    events.sort_by_key(|e| e.start);

    let mut total_busy_minutes = 0.0;
    let mut evening_events = 0u32;
    let mut longest_block_minutes = 0.0f64;
    let mut current_block_minutes = 0.0f64;
    let mut last_event_end: Option<chrono::DateTime<chrono::Utc>> = None;

    for event in &events {
        let duration_min =
            ((event.end - event.start).num_milliseconds() as f64 / 60_000.0).max(0.0);
        total_busy_minutes += duration_min;

        if event.start.hour() >= EVENING_START_HOUR {
            evening_events += 1;
        }

        let continues_block = last_event_end.map_or(false, |prev_end| {
            (event.start - prev_end).num_milliseconds() as f64 / 60_000.0 <= BLOCK_JOIN_GAP_MIN
        });
        if continues_block {
            current_block_minutes += duration_min;
        } else {
            longest_block_minutes = longest_block_minutes.max(current_block_minutes);
            current_block_minutes = duration_min;
        }

        last_event_end = Some(event.end);
    }
    longest_block_minutes = longest_block_minutes.max(current_block_minutes);

    let working_minutes = horizon_days as f64 * WORKING_HOURS_PER_DAY * 60.0;
    let density = if working_minutes > 0.0 {
        ((total_busy_minutes / working_minutes) * 100.0).min(100.0)
    } else {
        0.0
    };

    CalendarSummary {
        total_events: events.len() as u32,
        total_busy_minutes,
        density,
        evening_events,
        peak_block_hours: longest_block_minutes / 60.0,
    }
}

//! Inactivity-gap conversation segmentation

use chrono::{DateTime, Duration, Utc};

use super::MessageRecord;

/// Longest session duration, in hours, under the given gap threshold.
///
/// A session is a maximal run of messages where every adjacent gap stays
/// within `gap_limit_hours`. Duration is last-message minus first-message of
/// the run, so empty and single-message batches both yield 0.
pub fn max_session_hours(sorted: &[MessageRecord], gap_limit_hours: i64) -> f64 {
    let gap_limit = Duration::hours(gap_limit_hours);

    let mut max_span = Duration::zero();
    let mut current_start: Option<DateTime<Utc>> = None;
    let mut last_time: Option<DateTime<Utc>> = None;

    for msg in sorted {
        match (current_start, last_time) {
            (None, _) => current_start = Some(msg.timestamp),
            (Some(start), Some(last)) if msg.timestamp - last > gap_limit => {
                // Gap exceeded: close the running session and open a new one.
                max_span = max_span.max(last - start);
                current_start = Some(msg.timestamp);
            }
            _ => {}
        }
        last_time = Some(msg.timestamp);
    }

    if let (Some(start), Some(last)) = (current_start, last_time) {
        max_span = max_span.max(last - start);
    }

    max_span.num_seconds() as f64 / 3600.0
}

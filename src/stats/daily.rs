//! Calendar-day bucketing and activity ranking

use serde::Serialize;

use super::MessageRecord;

/// Day keys use the same `DD_MM_YYYY` form the report prints (with dots).
pub const DAY_KEY_FORMAT: &str = "%d_%m_%Y";

/// Message count for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: String,
    pub count: u64,
}

/// Bucket a chronologically sorted batch by calendar day, one pass.
///
/// Buckets come out in first-seen (chronological) order; [`rank_days`] relies
/// on that order as its tie-break.
pub fn daily_counts(sorted: &[MessageRecord]) -> Vec<DayCount> {
    let mut buckets: Vec<DayCount> = Vec::new();

    for msg in sorted {
        let day = msg.timestamp.format(DAY_KEY_FORMAT).to_string();
        match buckets.last_mut() {
            Some(last) if last.day == day => last.count += 1,
            _ => buckets.push(DayCount { day, count: 1 }),
        }
    }

    buckets
}

/// Rank day buckets by count, stable so equal counts keep bucket order.
///
/// `ascending = false` puts the busiest days first. `n` larger than the
/// number of buckets returns everything.
pub fn rank_days(buckets: &[DayCount], n: usize, ascending: bool) -> Vec<DayCount> {
    let mut ranked = buckets.to_vec();
    if ascending {
        ranked.sort_by(|a, b| a.count.cmp(&b.count));
    } else {
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
    }
    ranked.truncate(n);
    ranked
}

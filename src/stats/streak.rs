//! Active-day streak detection

use chrono::NaiveDate;

use super::MessageRecord;

/// Count consecutive active calendar days ending at the most recent one.
///
/// Works over the unique UTC dates of a chronologically sorted batch: walk
/// back from the latest date and stop at the first hole. A non-empty batch
/// always yields at least 1; an empty batch yields 0.
pub fn day_streak(sorted: &[MessageRecord]) -> u32 {
    let mut dates: Vec<NaiveDate> = sorted.iter().map(|m| m.timestamp.date_naive()).collect();
    dates.dedup();

    if dates.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in dates.windows(2).rev() {
        if pair[0].succ_opt() == Some(pair[1]) {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

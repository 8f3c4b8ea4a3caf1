//! Conversation analytics engine
//!
//! Pure, synchronous computation over a materialized message batch: daily
//! activity ranking, day streaks, inactivity-gap session segmentation,
//! initiation/reply-latency analysis and the combined two-party summary.
//! Nothing here touches the network; retrieval hands over a finished batch
//! and rendering consumes the result.

pub mod daily;
pub mod response;
pub mod sessions;
pub mod streak;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use daily::DayCount;
pub use response::ConversationFlow;

use daily::{daily_counts, rank_days};
use response::conversation_flow;
use sessions::max_session_hours;
use streak::day_streak;

/// Gap threshold (hours) for the stricter segmentation.
pub const STRICT_GAP_HOURS: i64 = 6;
/// Gap threshold (hours) for the more permissive segmentation.
pub const RELAXED_GAP_HOURS: i64 = 12;
/// How many busiest/quietest days the summary carries.
pub const RANKED_DAYS: usize = 5;

/// One chat message as the engine sees it.
///
/// `has_text` covers both plain text and media captions; `text_len` counts
/// characters. Batches may arrive newest-first — [`analyze`] sorts a copy,
/// and the sort is stable so equal timestamps keep arrival order.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub timestamp: DateTime<Utc>,
    pub sender_id: i64,
    pub has_text: bool,
    pub text_len: usize,
}

/// Per-participant block of the summary.
#[derive(Debug, Clone, Serialize)]
pub struct UserSlot {
    pub user_id: i64,
    pub messages: u64,
    /// Own message count over the other side's (0 when the other side is 0).
    pub ratio_to_other: f64,
    /// Own share of the combined message count.
    pub message_share: f64,
    /// Share of conversation initiations.
    pub initiation_share: f64,
    /// Mean reply latency towards the other side, seconds.
    pub avg_reply_secs: Option<f64>,
    /// Mean text length over this side's text-carrying messages.
    pub avg_text_len: Option<f64>,
}

/// Longest-session figures under both gap thresholds.
///
/// Named by gap tolerance: `strict` merges only gaps up to
/// [`STRICT_GAP_HOURS`], `relaxed` up to [`RELAXED_GAP_HOURS`], so
/// `strict_hours <= relaxed_hours` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSpans {
    pub strict_hours: f64,
    pub relaxed_hours: f64,
}

/// Everything the report needs, derived from one batch.
#[derive(Debug, Clone, Serialize)]
pub struct ChatStats {
    pub total_messages: u64,
    /// All sender counts in first-seen order (the analyzed pair is a subset).
    pub sender_counts: Vec<(i64, u64)>,
    pub user_a: UserSlot,
    pub user_b: UserSlot,
    pub longest_session: SessionSpans,
    pub streak_days: u32,
    pub busiest_days: Vec<DayCount>,
    pub quietest_days: Vec<DayCount>,
}

/// Result of one analysis call.
///
/// Insufficient data is a normal variant, not an error: callers must match
/// on it and render the localized notice instead of a report.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Ready(ChatStats),
    InsufficientData,
}

/// Run the full pipeline over one message batch.
///
/// Yields `InsufficientData` for an empty batch, fewer than two distinct
/// senders, or (defensively) a selected sender with zero messages. The two
/// analyzed participants are the two highest-volume senders; count ties keep
/// first chronological appearance.
pub fn analyze(messages: &[MessageRecord]) -> AnalysisOutcome {
    if messages.is_empty() {
        return AnalysisOutcome::InsufficientData;
    }

    let mut sorted: Vec<MessageRecord> = messages.to_vec();
    sorted.sort_by_key(|m| m.timestamp);

    // Per-sender tallies, tracking first-seen order for deterministic ties.
    let mut order: Vec<i64> = Vec::new();
    let mut counts: HashMap<i64, u64> = HashMap::new();
    let mut text_totals: HashMap<i64, (u64, u64)> = HashMap::new();

    for msg in &sorted {
        let count = counts.entry(msg.sender_id).or_insert_with(|| {
            order.push(msg.sender_id);
            0
        });
        *count += 1;

        if msg.has_text {
            let entry = text_totals.entry(msg.sender_id).or_insert((0, 0));
            entry.0 += msg.text_len as u64;
            entry.1 += 1;
        }
    }

    if counts.len() < 2 {
        return AnalysisOutcome::InsufficientData;
    }

    let (id_a, id_b) = select_pair(&order, &counts);
    let count_a = counts[&id_a];
    let count_b = counts[&id_b];
    if count_a == 0 || count_b == 0 {
        return AnalysisOutcome::InsufficientData;
    }

    let buckets = daily_counts(&sorted);
    let flow = conversation_flow(&sorted);

    let starts_a = flow.initiations.get(&id_a).copied().unwrap_or(0);
    let starts_b = flow.initiations.get(&id_b).copied().unwrap_or(0);
    let total_starts = f64::from((starts_a + starts_b).max(1));

    let user_a = UserSlot {
        user_id: id_a,
        messages: count_a,
        ratio_to_other: ratio(count_a, count_b),
        message_share: share(count_a, count_b),
        initiation_share: f64::from(starts_a) / total_starts,
        avg_reply_secs: flow.average_reply(id_a, id_b),
        avg_text_len: average_text_len(text_totals.get(&id_a)),
    };
    let user_b = UserSlot {
        user_id: id_b,
        messages: count_b,
        ratio_to_other: ratio(count_b, count_a),
        message_share: share(count_b, count_a),
        initiation_share: f64::from(starts_b) / total_starts,
        avg_reply_secs: flow.average_reply(id_b, id_a),
        avg_text_len: average_text_len(text_totals.get(&id_b)),
    };

    AnalysisOutcome::Ready(ChatStats {
        total_messages: sorted.len() as u64,
        sender_counts: order.iter().map(|id| (*id, counts[id])).collect(),
        user_a,
        user_b,
        longest_session: SessionSpans {
            strict_hours: max_session_hours(&sorted, STRICT_GAP_HOURS),
            relaxed_hours: max_session_hours(&sorted, RELAXED_GAP_HOURS),
        },
        streak_days: day_streak(&sorted),
        busiest_days: rank_days(&buckets, RANKED_DAYS, false),
        quietest_days: rank_days(&buckets, RANKED_DAYS, true),
    })
}

/// The two highest-volume senders; ties keep first-seen order.
fn select_pair(order: &[i64], counts: &HashMap<i64, u64>) -> (i64, i64) {
    let mut ranked: Vec<i64> = order.to_vec();
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    (ranked[0], ranked[1])
}

fn ratio(own: u64, other: u64) -> f64 {
    if other == 0 {
        0.0
    } else {
        own as f64 / other as f64
    }
}

fn share(own: u64, other: u64) -> f64 {
    if own == 0 || other == 0 {
        0.0
    } else {
        own as f64 / (own + other) as f64
    }
}

fn average_text_len(totals: Option<&(u64, u64)>) -> Option<f64> {
    match totals {
        Some(&(chars, msgs)) if msgs > 0 => Some(chars as f64 / msgs as f64),
        _ => None,
    }
}

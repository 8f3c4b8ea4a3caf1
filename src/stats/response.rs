//! Conversation initiation and reply-latency analysis

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::MessageRecord;

/// Gap (hours) beyond which a sender switch opens a new conversation.
pub const INITIATION_GAP_HOURS: i64 = 4;

/// Who opens conversations and how fast each side replies.
#[derive(Debug, Default)]
pub struct ConversationFlow {
    /// Conversations opened per sender.
    pub initiations: HashMap<i64, u32>,
    /// Reply latency samples in seconds, keyed by (responder, original sender).
    pub reply_times: HashMap<(i64, i64), Vec<f64>>,
}

impl ConversationFlow {
    /// Mean reply latency for a directed pair, absent when no samples exist.
    pub fn average_reply(&self, responder: i64, original: i64) -> Option<f64> {
        let samples = self.reply_times.get(&(responder, original))?;
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Walk a chronologically sorted batch detecting conversation starts and
/// directed reply latencies.
///
/// The very first message always opens a conversation. A sender switch after
/// a gap above [`INITIATION_GAP_HOURS`] opens another one; a switch within
/// the gap where both sides carry text records a reply sample instead. The
/// latency baseline is the second-to-last timestamp while the preceding two
/// messages share a sender (a same-sender run counts as one turn), otherwise
/// the immediately preceding timestamp. Same-sender messages never produce
/// events on their own.
pub fn conversation_flow(sorted: &[MessageRecord]) -> ConversationFlow {
    let gap_limit = Duration::hours(INITIATION_GAP_HOURS);
    let mut flow = ConversationFlow::default();

    let mut prev: Option<&MessageRecord> = None;
    let mut run_baseline: Option<DateTime<Utc>> = None;

    for msg in sorted {
        match prev {
            None => {
                *flow.initiations.entry(msg.sender_id).or_insert(0) += 1;
            }
            Some(p) if p.sender_id != msg.sender_id => {
                if msg.timestamp - p.timestamp > gap_limit {
                    *flow.initiations.entry(msg.sender_id).or_insert(0) += 1;
                } else if msg.has_text && p.has_text {
                    let baseline = run_baseline.unwrap_or(p.timestamp);
                    let secs = (msg.timestamp - baseline).num_seconds() as f64;
                    flow.reply_times
                        .entry((msg.sender_id, p.sender_id))
                        .or_default()
                        .push(secs);
                }
            }
            Some(_) => {}
        }

        run_baseline = match prev {
            Some(p) if p.sender_id == msg.sender_id => Some(p.timestamp),
            _ => None,
        };
        prev = Some(msg);
    }

    flow
}

//! Chat history retrieval
//!
//! The retrieval collaborator of the analytics engine: pulls a bounded,
//! newest-first batch of messages and projects them into `MessageRecord`s.
//! Any failure here is a hard stop; the engine never sees a partial batch.

use std::collections::HashMap;

use grammers_client::types::peer::Peer;
use grammers_client::Client;
use tracing::info;

use crate::error::{Error, Result};
use crate::stats::MessageRecord;

/// One chat's materialized history plus the display names seen while
/// fetching. Names are only used by rendering, never by the engine.
pub struct ChatHistory {
    pub records: Vec<MessageRecord>,
    pub sender_names: HashMap<i64, String>,
}

/// Pull up to `limit` messages from a chat, newest first.
///
/// Service messages (no sender) are skipped. `msg.text()` covers media
/// captions, so captioned media counts as text-carrying.
pub async fn fetch_history(client: &Client, peer: &Peer, limit: usize) -> Result<ChatHistory> {
    let mut records = Vec::new();
    let mut sender_names: HashMap<i64, String> = HashMap::new();

    let mut iter = client.iter_messages(peer);

    while let Some(msg) = iter.next().await.transpose() {
        let msg = msg.map_err(|e| Error::TelegramError(e.to_string()))?;

        if records.len() >= limit {
            break;
        }

        if let Some(sender) = msg.sender() {
            let sender_id: i64 = sender.id().to_string().parse().unwrap_or(0);
            let text = msg.text();

            sender_names
                .entry(sender_id)
                .or_insert_with(|| sender.name().unwrap_or("Unknown").to_string());

            records.push(MessageRecord {
                timestamp: msg.date(),
                sender_id,
                has_text: !text.is_empty(),
                text_len: text.chars().count(),
            });
        }
    }

    info!(
        "Fetched {} messages from {} senders",
        records.len(),
        sender_names.len()
    );

    Ok(ChatHistory {
        records,
        sender_names,
    })
}

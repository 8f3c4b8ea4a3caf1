//! Chat statistics command
//!
//! Fetches a chat's history, runs the analytics engine and renders the
//! localized report — to the console, as JSON, or delivered into Telegram
//! via the placeholder-then-edit flow.

use grammers_client::types::peer::Peer;
use grammers_client::Client;
use tracing::info;

use crate::chat::resolve_chat;
use crate::config::{ChatEntity, Config};
use crate::error::{Error, Result};
use crate::history::fetch_history;
use crate::report::{self, Language};
use crate::session::{get_client, SessionLock};
use crate::stats::{analyze, AnalysisOutcome};

pub struct StatsArgs {
    /// Chat alias from config, @username or numeric id
    pub chat: String,
    /// History limit override (config limit otherwise)
    pub limit: Option<usize>,
    /// Dump the raw analysis result as JSON instead of the report
    pub json: bool,
    /// Also deliver the report into Telegram
    pub send: bool,
}

pub async fn run(args: StatsArgs) -> Result<()> {
    let config = Config::new();
    let limit = args.limit.unwrap_or_else(|| config.get_limit());
    let language = Language::parse(&config.language);

    let _lock = SessionLock::acquire()?;
    let client = get_client().await?;

    let (primary_entity, fallback_entity) = parse_chat_entity(&args.chat, &config);
    let peer = match resolve_chat(&client, &primary_entity).await {
        Ok(peer) => peer,
        Err(err) => match &fallback_entity {
            Some(fallback) => resolve_chat(&client, fallback).await?,
            None => return Err(err),
        },
    };

    info!("Analyzing chat '{}' (limit {})", args.chat, limit);
    let history = fetch_history(&client, &peer, limit).await?;

    match analyze(&history.records) {
        AnalysisOutcome::InsufficientData => {
            println!("{}", report::insufficient_data_notice(language));
        }
        AnalysisOutcome::Ready(stats) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let text = report::render(&stats, &history.sender_names, language);
                println!("{}", text);

                if args.send {
                    let (target, placeholder_id) =
                        post_placeholder(&client, &config, &peer, language).await?;
                    replace_placeholder(&client, &target, placeholder_id, &text).await?;
                    println!("Report delivered.");
                }
            }
        }
    }

    Ok(())
}

/// Post the placeholder message and return the delivery target with the
/// message id to edit later. Target is the analyzed chat when
/// `report.send_to_chat` is set, the owner's Saved Messages otherwise.
pub async fn post_placeholder(
    client: &Client,
    config: &Config,
    chat_peer: &Peer,
    language: Language,
) -> Result<(Peer, i32)> {
    let target = if config.send_to_chat {
        chat_peer.clone()
    } else {
        find_self_peer(client, config.my_user_id).await?
    };

    let sent = client
        .send_message(&target, report::placeholder_notice(language))
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?;

    Ok((target, sent.id()))
}

/// Replace the placeholder with the final report text.
pub async fn replace_placeholder(
    client: &Client,
    target: &Peer,
    message_id: i32,
    text: &str,
) -> Result<()> {
    client
        .edit_message(target, message_id, text)
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?;
    Ok(())
}

/// The owner's own dialog (Saved Messages).
async fn find_self_peer(client: &Client, my_user_id: i64) -> Result<Peer> {
    if my_user_id == 0 {
        return Err(Error::InvalidArgument(
            "user.id must be configured to deliver reports to Saved Messages".to_string(),
        ));
    }
    resolve_chat(client, &ChatEntity::UserId(my_user_id)).await
}

/// Resolve chat input into a ChatEntity and optional fallback.
/// - Config alias wins
/// - Numeric strings are treated as user IDs with channel fallback
/// - Otherwise treated as username
fn parse_chat_entity(chat_input: &str, config: &Config) -> (ChatEntity, Option<ChatEntity>) {
    if let Some(entity) = config.get_chat(chat_input) {
        return (entity.clone(), None);
    }

    if let Ok(id) = chat_input.parse::<i64>() {
        return (ChatEntity::UserId(id), Some(ChatEntity::Channel(id)));
    }

    (ChatEntity::username(chat_input), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chat_entity_prefers_config() {
        let mut config = Config::default();
        config.chats.clear();
        config
            .chats
            .insert("partner".into(), ChatEntity::Username("partner_user".into()));

        let (entity, fallback) = parse_chat_entity("partner", &config);
        assert!(matches!(entity, ChatEntity::Username(ref s) if s == "partner_user"));
        assert!(fallback.is_none());
    }

    #[test]
    fn parse_chat_entity_handles_numeric_with_fallback() {
        let mut config = Config::default();
        config.chats.clear();
        let (entity, fallback) = parse_chat_entity("12345", &config);

        assert!(matches!(entity, ChatEntity::UserId(12345)));
        assert!(matches!(fallback, Some(ChatEntity::Channel(12345))));
    }

    #[test]
    fn parse_chat_entity_uses_username_when_not_numeric() {
        let mut config = Config::default();
        config.chats.clear();
        let (entity, fallback) = parse_chat_entity("@partner", &config);

        assert!(matches!(entity, ChatEntity::Username(ref s) if s == "partner"));
        assert!(fallback.is_none());
    }
}

//! Userbot mode
//!
//! Watches the update stream for the session owner's `/stats` command.
//! Only outgoing messages trigger analysis, so nobody but the owner can
//! request a report. The trigger message is deleted, a placeholder is
//! posted, and the placeholder is edited once the report is ready.

use grammers_client::client::UpdatesConfiguration;
use grammers_client::types::update::Update;
use grammers_client::types::Message;
use tokio::signal;
use tracing::{error, info, warn};

use crate::chat::find_peer_by_id;
use crate::config::Config;
use crate::error::Result;
use crate::history::fetch_history;
use crate::report::{self, Language};
use crate::session::{get_client, SessionLock, TelegramClient};
use crate::stats::{analyze, AnalysisOutcome};

use super::stats::{post_placeholder, replace_placeholder};

const STATS_COMMAND: &str = "/stats";

pub async fn run() -> Result<()> {
    let config = Config::new();
    let language = Language::parse(&config.language);

    let _lock = SessionLock::acquire()?;
    let mut client = get_client().await?;

    let updates_rx = match client.take_updates() {
        Some(rx) => rx,
        None => {
            warn!("Update stream unavailable, restart the command");
            return Ok(());
        }
    };

    let mut updates = client.stream_updates(
        updates_rx,
        UpdatesConfiguration {
            catch_up: false,
            ..Default::default()
        },
    );

    println!(
        "Bot mode started. Send {} in any chat to get its report. Ctrl+C to stop.",
        STATS_COMMAND
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nStopping bot mode...");
                break;
            }
            update = updates.next() => {
                match update {
                    Ok(Update::NewMessage(msg)) => {
                        if !is_stats_trigger(&msg) {
                            continue;
                        }
                        if let Err(err) = handle_trigger(&client, &config, language, &msg).await {
                            error!("Stats request failed: {}", err);
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        error!("Update stream error: {}", err);
                        break;
                    }
                }
            }
        }
    }

    updates.sync_update_state();
    Ok(())
}

/// Only the owner's own `/stats` messages count.
fn is_stats_trigger(msg: &Message) -> bool {
    msg.outgoing() && msg.text().trim() == STATS_COMMAND
}

async fn handle_trigger(
    client: &TelegramClient,
    config: &Config,
    language: Language,
    msg: &Message,
) -> Result<()> {
    let peer = find_peer_by_id(client, msg.peer_id()).await?;
    info!("Stats requested in '{}'", crate::chat::peer_name(&peer));

    // Best-effort removal of the trigger command itself.
    if let Err(err) = msg.delete().await {
        warn!("Failed to delete trigger message: {}", err);
    }

    let (target, placeholder_id) = post_placeholder(client, config, &peer, language).await?;

    let history = fetch_history(client, &peer, config.get_limit()).await?;

    let text = match analyze(&history.records) {
        AnalysisOutcome::InsufficientData => report::insufficient_data_notice(language).to_string(),
        AnalysisOutcome::Ready(stats) => report::render(&stats, &history.sender_names, language),
    };

    replace_placeholder(client, &target, placeholder_id, &text).await
}

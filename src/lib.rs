//! Telegram Two-Party Chat Statistics Library
//!
//! This library provides tools to:
//! - Pull a chat's message history over MTProto
//! - Derive behavioral statistics for a two-person conversation:
//!   message ratios, reply latencies, longest sessions, day streaks and
//!   daily activity rankings
//! - Render a localized plain-text report (English/Russian)
//! - Deliver the report into the chat or the owner's Saved Messages

pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod logs;
pub mod report;
pub mod session;
pub mod stats;

// Re-export common types
pub use config::{ChatEntity, Config};
pub use error::{Error, Result};
pub use report::Language;
pub use session::{check_session_exists, get_client, SessionLock};
pub use stats::{analyze, AnalysisOutcome, ChatStats, MessageRecord};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;

//! Integration tests for the chat_stats library
//!
//! These tests verify the public API: the analytics engine end to end,
//! report rendering and the configuration surface.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use chat_stats::{
    analyze,
    config::{ChatEntity, Config, CI_LIMIT, DEFAULT_LIMIT},
    error::{Error, Result},
    report::{self, Language},
    stats::{
        daily::{rank_days, DayCount},
        sessions::max_session_hours,
        streak::day_streak,
        AnalysisOutcome, MessageRecord, RANKED_DAYS,
    },
};

const ALICE: i64 = 111;
const BOB: i64 = 222;

fn msg(day: u32, hour: u32, minute: u32, sender_id: i64) -> MessageRecord {
    MessageRecord {
        timestamp: Utc.with_ymd_and_hms(2025, 4, day, hour, minute, 0).unwrap(),
        sender_id,
        has_text: true,
        text_len: 12,
    }
}

fn ready(batch: &[MessageRecord]) -> chat_stats::ChatStats {
    match analyze(batch) {
        AnalysisOutcome::Ready(stats) => stats,
        AnalysisOutcome::InsufficientData => panic!("expected a summary"),
    }
}

// ============================================================================
// Engine Scenarios
// ============================================================================

#[test]
fn ten_minute_exchange_scenario() {
    // A@09:00, B@09:05, A@09:10 with a 6h threshold: one session of 10
    // minutes, streak 1, both reply latencies around 300s.
    let batch = vec![msg(1, 9, 0, ALICE), msg(1, 9, 5, BOB), msg(1, 9, 10, ALICE)];
    let stats = ready(&batch);

    assert!((stats.longest_session.strict_hours - 1.0 / 6.0).abs() < 1e-9);
    assert_eq!(stats.streak_days, 1);
    assert_eq!(stats.user_a.avg_reply_secs, Some(300.0));
    assert_eq!(stats.user_b.avg_reply_secs, Some(300.0));
}

#[test]
fn exact_24h_gap_scenario() {
    let batch = vec![msg(1, 10, 0, ALICE), msg(2, 10, 0, BOB)];

    assert_eq!(max_session_hours(&batch, 12), 0.0);
    assert_eq!(max_session_hours(&batch, 24), 24.0);
}

#[test]
fn single_sender_yields_insufficient_data() {
    let batch = vec![msg(1, 9, 0, ALICE), msg(1, 9, 5, ALICE)];
    assert!(matches!(analyze(&batch), AnalysisOutcome::InsufficientData));
}

#[test]
fn empty_batch_yields_insufficient_data() {
    assert!(matches!(analyze(&[]), AnalysisOutcome::InsufficientData));
}

// ============================================================================
// Engine Properties
// ============================================================================

#[test]
fn wider_gap_threshold_never_shrinks_max_session() {
    let batch = vec![
        msg(1, 9, 0, ALICE),
        msg(1, 12, 0, BOB),
        msg(1, 20, 0, ALICE),
        msg(2, 11, 0, BOB),
        msg(4, 9, 0, ALICE),
    ];

    let thresholds = [1, 2, 6, 12, 24, 72];
    for pair in thresholds.windows(2) {
        assert!(max_session_hours(&batch, pair[0]) <= max_session_hours(&batch, pair[1]));
    }
}

#[test]
fn streak_extends_and_resets() {
    let base = vec![msg(10, 9, 0, ALICE), msg(11, 9, 0, BOB)];
    assert_eq!(day_streak(&base), 2);

    let mut extended = base.clone();
    extended.push(msg(12, 9, 0, ALICE));
    assert_eq!(day_streak(&extended), 3);

    let mut gapped = base.clone();
    gapped.push(msg(20, 9, 0, ALICE));
    assert_eq!(day_streak(&gapped), 1);
}

#[test]
fn message_shares_sum_to_one() {
    let batch = vec![
        msg(1, 9, 0, ALICE),
        msg(1, 9, 1, BOB),
        msg(1, 9, 2, ALICE),
        msg(1, 9, 3, ALICE),
    ];
    let stats = ready(&batch);

    let sum = stats.user_a.message_share + stats.user_b.message_share;
    assert!((sum - 1.0).abs() < 1e-9);
    assert_eq!(
        stats.user_a.messages + stats.user_b.messages,
        stats.total_messages
    );
}

#[test]
fn ranked_days_are_ordered_and_bounded() {
    let mut batch = Vec::new();
    for day in 1..=8u32 {
        for m in 0..day {
            batch.push(msg(day, 9, m, if m % 2 == 0 { ALICE } else { BOB }));
        }
    }
    let stats = ready(&batch);

    assert_eq!(stats.busiest_days.len(), RANKED_DAYS);
    for pair in stats.busiest_days.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
    for pair in stats.quietest_days.windows(2) {
        assert!(pair[0].count <= pair[1].count);
    }
}

#[test]
fn rank_days_handles_oversized_n() {
    let buckets = vec![
        DayCount {
            day: "01_04_2025".into(),
            count: 3,
        },
        DayCount {
            day: "02_04_2025".into(),
            count: 1,
        },
    ];

    let ranked = rank_days(&buckets, 50, false);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].count, 3);
}

#[test]
fn collapsed_run_reply_baseline() {
    // A@09:00, A@09:01, B@09:02 — B's sample measures from the first A
    // message of the closing run.
    let batch = vec![msg(1, 9, 0, ALICE), msg(1, 9, 1, ALICE), msg(1, 9, 2, BOB)];
    let stats = ready(&batch);

    assert_eq!(stats.user_b.avg_reply_secs, Some(120.0));
    assert!(stats.user_a.avg_reply_secs.is_none());
}

#[test]
fn third_wheel_is_excluded_from_the_pair() {
    let carol: i64 = 333;
    let batch = vec![
        msg(1, 9, 0, carol),
        msg(1, 9, 1, ALICE),
        msg(1, 9, 2, BOB),
        msg(1, 9, 3, ALICE),
        msg(1, 9, 4, BOB),
    ];
    let stats = ready(&batch);

    assert_eq!(stats.user_a.user_id, ALICE);
    assert_eq!(stats.user_b.user_id, BOB);
    assert_eq!(stats.total_messages, 5);
    assert_eq!(stats.sender_counts.len(), 3);
}

// ============================================================================
// Report Rendering
// ============================================================================

#[test]
fn full_pipeline_renders_in_both_locales() {
    let batch = vec![msg(1, 9, 0, ALICE), msg(1, 9, 5, BOB), msg(2, 9, 0, ALICE)];
    let stats = ready(&batch);

    let names = HashMap::from([(ALICE, "Alice".to_string()), (BOB, "Bob".to_string())]);

    let en = report::render(&stats, &names, Language::En);
    assert!(en.contains("Alice"));
    assert!(en.contains("Total messages: 3"));
    assert!(en.contains("Streak"));

    let ru = report::render(&stats, &names, Language::Ru);
    assert!(ru.contains("Всего сообщений: 3"));
}

#[test]
fn insufficient_data_notice_is_localized() {
    assert_ne!(
        report::insufficient_data_notice(Language::En),
        report::insufficient_data_notice(Language::Ru)
    );
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_new_loads_or_defaults() {
    let config = Config::new();
    assert!(!config.session_name.is_empty());
    assert!(!config.lock_file.is_empty());
    assert!(!config.language.is_empty());
}

#[test]
fn test_config_limits() {
    assert_eq!(DEFAULT_LIMIT, 3000);
    assert_eq!(CI_LIMIT, 1000);
}

#[test]
fn test_chat_entity_variants() {
    let channel = ChatEntity::channel(12345);
    assert!(matches!(channel, ChatEntity::Channel(12345)));

    let chat = ChatEntity::chat(67890);
    assert!(matches!(chat, ChatEntity::Chat(67890)));

    let user = ChatEntity::username("@john_doe");
    assert!(matches!(user, ChatEntity::Username(ref s) if s == "john_doe"));

    let user_id = ChatEntity::user_id(999);
    assert!(matches!(user_id, ChatEntity::UserId(999)));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_error_variants_display() {
    let errors = vec![
        Error::SessionNotFound("test.session".into()),
        Error::SessionLocked,
        Error::LockError("lock failed".into()),
        Error::TelegramError("api error".into()),
        Error::ChatNotFound("chat123".into()),
        Error::SerializationError("json error".into()),
        Error::InvalidArgument("bad arg".into()),
    ];

    for err in errors {
        assert!(!err.to_string().is_empty(), "Error message should not be empty");
    }
}

#[test]
fn test_result_type_alias() {
    fn returns_ok() -> Result<i32> {
        Ok(42)
    }

    fn returns_err() -> Result<i32> {
        Err(Error::SessionLocked)
    }

    assert!(returns_ok().is_ok());
    assert!(returns_err().is_err());
}

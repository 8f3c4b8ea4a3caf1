//! Localized report rendering
//!
//! Turns a `ChatStats` into the plain-text report posted to Telegram or
//! printed on the console. Locale is a configuration choice; the engine
//! never sees it.

use std::collections::HashMap;

use crate::stats::{ChatStats, UserSlot, RELAXED_GAP_HOURS, STRICT_GAP_HOURS};

/// Report locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ru,
}

impl Language {
    /// Unknown values fall back to English.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "ru" | "rus" | "russian" => Language::Ru,
            _ => Language::En,
        }
    }
}

/// Text of the placeholder message posted before computation starts.
pub fn placeholder_notice(language: Language) -> &'static str {
    match language {
        Language::En => "Creating stats...",
        Language::Ru => "Готовлю статистику...",
    }
}

/// Rendered instead of a report when the batch has fewer than two senders.
pub fn insufficient_data_notice(language: Language) -> &'static str {
    match language {
        Language::En => "Not enough data: the chat needs messages from two participants.",
        Language::Ru => "Недостаточно данных: в чате нужны сообщения двух участников.",
    }
}

/// Render the full report in the requested locale.
pub fn render(stats: &ChatStats, names: &HashMap<i64, String>, language: Language) -> String {
    match language {
        Language::En => render_en(stats, names),
        Language::Ru => render_ru(stats, names),
    }
}

fn display_name(names: &HashMap<i64, String>, user_id: i64) -> String {
    names
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| user_id.to_string())
}

fn fmt_opt(value: Option<f64>, unit: &str, missing: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, unit),
        None => missing.to_string(),
    }
}

/// Day keys are stored as `DD_MM_YYYY`; the report prints `DD.MM.YYYY`.
fn day_label(day: &str) -> String {
    day.replace('_', ".")
}

fn both(stats: &ChatStats) -> [&UserSlot; 2] {
    [&stats.user_a, &stats.user_b]
}

fn render_en(stats: &ChatStats, names: &HashMap<i64, String>) -> String {
    let mut lines = Vec::new();

    lines.push("Chat Stats".to_string());
    lines.push(String::new());

    lines.push(format!("Total messages: {}", stats.total_messages));
    for user in both(stats) {
        lines.push(format!(
            "{}: {} messages, reply ratio {:.2}, message share {:.2}",
            display_name(names, user.user_id),
            user.messages,
            user.ratio_to_other,
            user.message_share
        ));
    }
    lines.push(String::new());

    lines.push("Started first:".to_string());
    for user in both(stats) {
        lines.push(format!(
            "{}: share {:.2}, av. answer time {}",
            display_name(names, user.user_id),
            user.initiation_share,
            fmt_opt(user.avg_reply_secs, "s", "n/a")
        ));
    }
    lines.push(String::new());

    lines.push("Av. text size:".to_string());
    for user in both(stats) {
        lines.push(format!(
            "{}: {}",
            display_name(names, user.user_id),
            fmt_opt(user.avg_text_len, " chars", "n/a")
        ));
    }
    lines.push(String::new());

    lines.push("Top days:".to_string());
    for day in &stats.busiest_days {
        lines.push(format!("{} - {}", day_label(&day.day), day.count));
    }
    lines.push("...".to_string());
    // Quietest days print in reverse so the list ends at the quietest one.
    for day in stats.quietest_days.iter().rev() {
        lines.push(format!("{} - {}", day_label(&day.day), day.count));
    }
    lines.push(String::new());

    lines.push("Longest conversation:".to_string());
    lines.push(format!(
        "{}h gap: {:.2}h",
        STRICT_GAP_HOURS, stats.longest_session.strict_hours
    ));
    lines.push(format!(
        "{}h gap: {:.2}h",
        RELAXED_GAP_HOURS, stats.longest_session.relaxed_hours
    ));
    lines.push(String::new());

    lines.push(format!("🔥 Streak: {} days", stats.streak_days));

    lines.join("\n")
}

fn render_ru(stats: &ChatStats, names: &HashMap<i64, String>) -> String {
    let mut lines = Vec::new();

    lines.push("Статистика чата".to_string());
    lines.push(String::new());

    lines.push(format!("Всего сообщений: {}", stats.total_messages));
    for user in both(stats) {
        lines.push(format!(
            "{}: {} сообщений, коэф. ответов {:.2}, доля сообщений {:.2}",
            display_name(names, user.user_id),
            user.messages,
            user.ratio_to_other,
            user.message_share
        ));
    }
    lines.push(String::new());

    lines.push("Написал первым/ой:".to_string());
    for user in both(stats) {
        lines.push(format!(
            "{}: доля {:.2}, ср. время ответа {}",
            display_name(names, user.user_id),
            user.initiation_share,
            fmt_opt(user.avg_reply_secs, "с", "н/д")
        ));
    }
    lines.push(String::new());

    lines.push("Средний размер текста:".to_string());
    for user in both(stats) {
        lines.push(format!(
            "{}: {}",
            display_name(names, user.user_id),
            fmt_opt(user.avg_text_len, " симв.", "н/д")
        ));
    }
    lines.push(String::new());

    lines.push("Топ дней:".to_string());
    for day in &stats.busiest_days {
        lines.push(format!("{} - {}", day_label(&day.day), day.count));
    }
    lines.push("...".to_string());
    for day in stats.quietest_days.iter().rev() {
        lines.push(format!("{} - {}", day_label(&day.day), day.count));
    }
    lines.push(String::new());

    lines.push("Максимальное время общения:".to_string());
    lines.push(format!(
        "окно {}ч: {:.2}ч",
        STRICT_GAP_HOURS, stats.longest_session.strict_hours
    ));
    lines.push(format!(
        "окно {}ч: {:.2}ч",
        RELAXED_GAP_HOURS, stats.longest_session.relaxed_hours
    ));
    lines.push(String::new());

    lines.push(format!("🔥 Streak: {} дней", stats.streak_days));

    lines.join("\n")
}

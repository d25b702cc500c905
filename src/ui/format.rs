//! Text formatting for display fields.
//!
//! All lengths are counted in characters, never bytes, so multi-byte text is
//! never split inside a code point.

use chrono::{DateTime, Utc};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86400;
/// Past this age a timestamp is shown as a date.
const RELATIVE_DAYS: i64 = 30;

const ELLIPSIS: &str = "...";

/// How long ago `at` was, relative to now.
///
/// - Under a minute (or in the future): "just now"
/// - Under an hour: "Xm ago"
/// - Under a day: "Xh ago"
/// - Under 30 days: "Xd ago"
/// - Otherwise the date, e.g. "Mar 4, 2024"
#[must_use]
pub fn time_ago(at: DateTime<Utc>) -> String {
    time_ago_from(at, Utc::now())
}

/// [`time_ago`] against a fixed `now`.
#[must_use]
pub fn time_ago_from(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - at).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else if diff < RELATIVE_DAYS * SECONDS_PER_DAY {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

/// Cuts `text` to `max` characters and appends "..." if anything was cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_string(),
    }
}

/// Card excerpt: whitespace collapsed to single spaces, then truncated.
#[must_use]
pub fn excerpt(content: &str, max: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, max)
}

/// First letter of the first and last word, upper-cased. "Ada Lovelace" gives "AL".
#[must_use]
pub fn initials(name: &str) -> String {
    fn push_initial(out: &mut String, word: &str) {
        if let Some(c) = word.chars().next() {
            out.extend(c.to_uppercase());
        }
    }

    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = String::new();
    push_initial(&mut out, first);
    if let Some(last) = words.last() {
        push_initial(&mut out, last);
    }
    out
}

/// Groups digits by thousands: 1234567 gives "1,234,567".
#[must_use]
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// "1 like" / "3 likes".
#[must_use]
pub fn count_label(n: u64, singular: &str) -> String {
    if n == 1 {
        format!("1 {singular}")
    } else {
        format!("{} {singular}s", format_number(n))
    }
}

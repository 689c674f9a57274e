//! Due date parsing and formatting.
//!
//! Stored due dates are plain ISO strings. These helpers turn human input into
//! that form and render stored dates relative to today.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{Result, TaskError};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored due date. Empty or malformed values yield `None`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, ISO_FORMAT).ok()
}

/// Format a date the way it is stored.
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parse human-readable due date input relative to the local date.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_input_at(s, Local::now().date_naive())
}

/// Turn human due-date input into the stored ISO form. Empty input clears it.
pub fn resolve_due(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    parse_due_input(input)
        .map(to_iso)
        .ok_or_else(|| TaskError::Validation(format!("could not understand due date '{input}'")))
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" .. "sunday" (and "mon" .. "sun"), "this friday", "next monday"
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_due_input_at(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some((split, _)) = rest.char_indices().last() {
            let (amount, unit) = rest.split_at(split);
            if let Ok(n) = amount.trim().parse::<i64>() {
                let offset = match unit {
                    "d" => Some(Duration::try_days(n)),
                    "w" => Some(Duration::try_weeks(n)),
                    // Approximate: 30 days per month
                    "m" => Some(n.checked_mul(30).and_then(Duration::try_days)),
                    _ => None,
                };
                if let Some(offset) = offset {
                    // Out-of-range offsets are unrecognised input.
                    return offset.and_then(|d| today.checked_add_signed(d));
                }
            }
        }
    }

    let (next_week, day_name) = match s.strip_prefix("next ") {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix("this ").unwrap_or(s.as_str())),
    };
    if let Some(target) = weekday_index(day_name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let ahead = if next_week {
            if ahead == 0 { 7 } else { ahead + 7 }
        } else {
            ahead
        };
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, ISO_FORMAT).ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    let idx = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(idx)
}

/// Start and end of the ISO week (Monday to Sunday) containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

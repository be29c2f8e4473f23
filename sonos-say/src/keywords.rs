//! Placeholder substitution for spoken text.
//!
//! Recognised keys:
//! - `%day`   → weekday (Monday)
//! - `%time`  → time (16:45)
//! - `%date`  → date (2nd March)
//! - `%greet` → Good morning / Good afternoon / Good evening

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

const GREETINGS: [&str; 4] = [
    "Good morning",
    "Good morning",
    "Good afternoon",
    "Good evening",
];

/// Replace all keys using the current local time.
pub fn replace_keys_now(words: &str) -> String {
    replace_keys(words, &Local::now())
}

/// Replace every occurrence of the four keys with values taken from `now`.
pub fn replace_keys<Tz: TimeZone>(words: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut words = words.to_string();

    if words.contains("%day") {
        words = words.replace("%day", &now.format("%A").to_string());
    }

    if words.contains("%time") {
        words = words.replace("%time", &now.format("%H:%M").to_string());
    }

    if words.contains("%date") {
        let day = now.day();
        let date = format!("{day}{} {}", ordinal_suffix(day), now.format("%B"));
        words = words.replace("%date", &date);
    }

    if words.contains("%greet") {
        words = words.replace("%greet", greeting(now.hour()));
    }

    words
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Greeting for a 0-23 hour, bucketed in six-hour blocks.
pub fn greeting(hour: u32) -> &'static str {
    GREETINGS[(hour as usize / 6).min(GREETINGS.len() - 1)]
}

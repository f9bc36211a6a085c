use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?\d|2[0-3])(?::([0-5]\d))?$").unwrap());

/// Parses `H`, `HH`, `H:MM` or `HH:MM` into a 24-hour time.
pub fn normalize_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME.captures(text.trim())?;
    let hour = caps[1].parse().ok()?;
    let minute = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:el\s+)?(lunes|martes|miercoles|miércoles|jueves|viernes|sabado|sábado|domingo)$")
        .unwrap()
});

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{4}))?$").unwrap());

static TEXTUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2})\s*(?:de\s+)?(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)(?:\s+de\s+(\d{4}))?$",
    )
    .unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday(name: &str) -> Option<Weekday> {
    match name {
        "lunes" => Some(Weekday::Mon),
        "martes" => Some(Weekday::Tue),
        "miercoles" | "miércoles" => Some(Weekday::Wed),
        "jueves" => Some(Weekday::Thu),
        "viernes" => Some(Weekday::Fri),
        "sabado" | "sábado" => Some(Weekday::Sat),
        "domingo" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Next `target` strictly after `base`; a week later when `base` already is `target`.
fn next_weekday(target: Weekday, base: NaiveDate) -> NaiveDate {
    let from = base.weekday().num_days_from_monday() as i64;
    let to = target.num_days_from_monday() as i64;
    let mut days_ahead = (to - from).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    base + Duration::days(days_ahead)
}

/// Builds the date, rolling to next year when no year was given and it already passed.
fn resolve(day: u32, month: u32, year: Option<i32>, base: NaiveDate) -> Option<NaiveDate> {
    let candidate = NaiveDate::from_ymd_opt(year.unwrap_or(base.year()), month, day)?;
    if year.is_none() && candidate < base {
        return NaiveDate::from_ymd_opt(base.year() + 1, month, day);
    }
    Some(candidate)
}

/// Parses a Spanish free-text date relative to `today`.
///
/// Recognized, in order: `hoy` / `mañana` / `pasado mañana`, a weekday name
/// (optionally `el viernes`), `D/M[/YYYY]` and `D [de] <mes> [de YYYY]`.
/// Returns `None` for anything else, including impossible dates like `31/02`.
pub fn normalize_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lowered = text.trim().to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    let raw: &str = &collapsed;

    if raw.is_empty() {
        return None;
    }

    match raw {
        "hoy" => return Some(today),
        "mañana" | "manana" => return Some(today + Duration::days(1)),
        "pasado mañana" | "pasado manana" => return Some(today + Duration::days(2)),
        _ => {}
    }

    if let Some(caps) = WEEKDAY.captures(raw) {
        let target = weekday(&caps[1])?;
        return Some(next_weekday(target, today));
    }

    if let Some(caps) = NUMERIC.captures(raw) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => Some(y.as_str().parse().ok()?),
            None => None,
        };
        return resolve(day, month, year, today);
    }

    if let Some(caps) = TEXTUAL.captures(raw) {
        let day = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = match caps.get(3) {
            Some(y) => Some(y.as_str().parse().ok()?),
            None => None,
        };
        return resolve(day, month, year, today);
    }

    None
}

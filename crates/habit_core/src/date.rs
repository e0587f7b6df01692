use chrono::{Datelike, Duration, Local, NaiveDate};
use thiserror::Error;

/// Three-letter weekday abbreviations, Sunday first (pt-BR defaults).
pub const WEEKDAY_ABBREV: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Lowercase month names used for calendar month titles (pt-BR defaults).
pub const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// Current calendar date in the local time zone, day precision.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date as a zero-padded ISO key (`YYYY-MM-DD`).
pub fn to_key(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Parses a zero-padded ISO key back into a date.
///
/// Rejects anything that is not exactly `YYYY-MM-DD` with digit
/// segments, and calendar-impossible dates such as `2023-02-30`.
/// Never clamps.
pub fn from_key(key: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidDateFormat(key.to_string());
    let parts: Vec<&str> = key.split('-').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let (year_str, month_str, day_str) = (parts[0], parts[1], parts[2]);
    if year_str.len() != 4 || month_str.len() != 2 || day_str.len() != 2 {
        return Err(invalid());
    }
    if !parts
        .iter()
        .all(|part| part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;
    let day: u32 = day_str.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Calendar-correct day offset (handles month and year rollover).
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

/// The last `n` consecutive days ending at `today`, oldest first.
pub fn last_n_days(n: usize, today: NaiveDate) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| today - Duration::days((n - 1 - i) as i64))
        .collect()
}

/// Number of days in the given month (1 = January).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| {
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            }?;
            Some(next.signed_duration_since(first).num_days() as u32)
        })
        .unwrap_or(0)
}

/// Weekday of the first day of the month, 0 = Sunday.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// `DD/MM` chart label.
pub fn format_short(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.day(), date.month())
}

/// `DD/MM/YYYY` display date.
pub fn format_long(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

/// Localized three-letter weekday abbreviation.
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    WEEKDAY_ABBREV[date.weekday().num_days_from_sunday() as usize]
}

/// Dashboard axis label, e.g. `Seg 25/11`.
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", weekday_abbrev(date), format_short(date))
}

/// Month title for a calendar block, e.g. `outubro de 2025`.
pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("");
    format!("{} de {}", name, year)
}

/// Parses a manually entered `DD/MM/YYYY` date.
///
/// Malformed manual input is an expected UI condition, so this
/// returns `None` instead of an error, for both structural problems
/// (wrong separators, non-numbers) and semantic ones (`31/02/2024`).
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Applies the `DD/MM/YYYY` input mask to arbitrary text: keeps the
/// first eight digits and inserts the slashes progressively.
pub fn mask_display_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(8).collect();
    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}/{}", &digits[..2], &digits[2..]),
        _ => format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

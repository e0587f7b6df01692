use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date;
use crate::progress::DailySeries;

/// Single-letter weekday column headers, Sunday first.
pub const WEEKDAY_HEADER: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayState {
    /// After today in the current month; not selectable, no percent.
    Future,
    /// Clickable day. `has_data` is false for days the tracked window
    /// does not cover; those still render, at 0%.
    Selectable { percent: u8, has_data: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub iso_key: String,
    pub state: DayState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarCell {
    /// Leading/trailing padding so days align to weekday columns.
    Empty,
    Day(DayCell),
}

/// One month's weekday-aligned grid. `cells` is always a whole
/// number of 7-cell week rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthBlock {
    pub year: i32,
    /// 1 = January.
    pub month: u32,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthBlock {
    pub fn week_rows(&self) -> usize {
        self.cells.len() / 7
    }

    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            CalendarCell::Day(day) => Some(day),
            CalendarCell::Empty => None,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarGrid {
    pub months: Vec<MonthBlock>,
}

/// Lays out the calendar for the months the series spans, keeping
/// only the `max_visible_months` most recent ones (older months are
/// dropped, not hidden — the cap is a display policy the caller
/// chooses).
pub fn build_calendar_grid(
    series: &DailySeries,
    max_visible_months: usize,
    today: NaiveDate,
) -> CalendarGrid {
    let mut month_keys: Vec<(i32, u32)> = Vec::new();
    for point in &series.points {
        let key = (point.date.year(), point.date.month());
        if !month_keys.contains(&key) {
            month_keys.push(key);
        }
    }
    let skip = month_keys.len().saturating_sub(max_visible_months);
    let today_key = date::to_key(today);
    let months = month_keys[skip..]
        .iter()
        .map(|&(year, month)| build_month(series, year, month, today, &today_key))
        .collect();
    CalendarGrid { months }
}

fn build_month(
    series: &DailySeries,
    year: i32,
    month: u32,
    today: NaiveDate,
    today_key: &str,
) -> MonthBlock {
    let leading = date::first_weekday_of_month(year, month);
    let days = date::days_in_month(year, month);
    let mut cells: Vec<CalendarCell> = Vec::with_capacity((leading + days + 6) as usize);

    for _ in 0..leading {
        cells.push(CalendarCell::Empty);
    }

    let is_current_month = year == today.year() && month == today.month();
    for day in 1..=days {
        let iso_key = format!("{:04}-{:02}-{:02}", year, month, day);
        // Zero-padded keys sort lexicographically in calendar order,
        // so the string comparison below matches date comparison.
        let state = if is_current_month && iso_key.as_str() > today_key {
            DayState::Future
        } else {
            match series.point_for_key(&iso_key) {
                Some(point) => DayState::Selectable {
                    percent: point.percent,
                    has_data: true,
                },
                None => DayState::Selectable {
                    percent: 0,
                    has_data: false,
                },
            }
        };
        cells.push(CalendarCell::Day(DayCell {
            day,
            iso_key,
            state,
        }));
    }

    let remainder = cells.len() % 7;
    if remainder != 0 {
        for _ in 0..(7 - remainder) {
            cells.push(CalendarCell::Empty);
        }
    }

    MonthBlock {
        year,
        month,
        title: date::month_title(year, month),
        cells,
    }
}

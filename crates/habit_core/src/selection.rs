use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range: start must not be after end")]
    InvalidRange,
}

/// Inclusive pair of selected dates. Both absent, start alone, or
/// both present; when both are present `start <= end` always holds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SelectionRange {
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?, self.end?))
    }
}

/// Tracks the start/end pair built from repeated day clicks.
///
/// First click opens a range, second closes it (swapping if clicked
/// out of order), third discards the pair and opens a new range from
/// the clicked day. Driven synchronously by UI events; no timers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSelector {
    range: SelectionRange,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, day: NaiveDate) {
        match (self.range.start, self.range.end) {
            (None, _) => {
                self.range = SelectionRange {
                    start: Some(day),
                    end: None,
                };
            }
            (Some(start), None) => {
                if day < start {
                    self.range = SelectionRange {
                        start: Some(day),
                        end: Some(start),
                    };
                } else {
                    // Clicking the start day again yields a single-day range.
                    self.range.end = Some(day);
                }
            }
            (Some(_), Some(_)) => {
                self.range = SelectionRange {
                    start: Some(day),
                    end: None,
                };
            }
        }
    }

    /// Direct range set, used by the manual-entry flow. Rejects
    /// reversed bounds and leaves the current selection untouched on
    /// failure; on success always lands in the closed state.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange);
        }
        self.range = SelectionRange {
            start: Some(start),
            end: Some(end),
        };
        Ok(())
    }

    /// Manual `DD/MM/YYYY` text entry. Unparseable text counts as an
    /// invalid range, same as reversed bounds.
    pub fn set_range_from_text(
        &mut self,
        start_text: &str,
        end_text: &str,
    ) -> Result<SelectionRange, RangeError> {
        let start = date::parse_display_date(start_text).ok_or(RangeError::InvalidRange)?;
        let end = date::parse_display_date(end_text).ok_or(RangeError::InvalidRange)?;
        self.set_range(start, end)?;
        Ok(self.range)
    }

    pub fn is_complete(&self) -> bool {
        self.range.is_complete()
    }

    pub fn current(&self) -> SelectionRange {
        self.range
    }

    pub fn clear(&mut self) {
        self.range = SelectionRange::default();
    }
}

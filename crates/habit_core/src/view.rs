use chrono::NaiveDate;

use crate::calendar::{self, CalendarGrid};
use crate::date::{self, DateError};
use crate::chart::{self, ChartProjection};
use crate::habit::HabitRecord;
use crate::progress::{self, DailySeries};
use crate::selection::{RangeError, RangeSelector, SelectionRange};

/// Owned state behind the reports view: the historical series, its
/// calendar layout, the current selection and the chart projection
/// derived from them. The UI controller threads one of these through
/// its event handlers instead of sharing module-level globals.
#[derive(Debug, Clone)]
pub struct ReportsViewState {
    days_back: usize,
    max_visible_months: usize,
    series: DailySeries,
    grid: CalendarGrid,
    selector: RangeSelector,
    chart: ChartProjection,
}

impl ReportsViewState {
    pub fn new(
        habits: &[HabitRecord],
        days_back: usize,
        max_visible_months: usize,
        today: NaiveDate,
    ) -> Self {
        let series = progress::build_daily_series(habits, days_back, today);
        let grid = calendar::build_calendar_grid(&series, max_visible_months, today);
        let chart = chart::project_for_range(&series, None);
        Self {
            days_back,
            max_visible_months,
            series,
            grid,
            selector: RangeSelector::new(),
            chart,
        }
    }

    /// Calendar click: advances the selection state machine and
    /// reprojects the chart — filtered once the range closes, default
    /// window otherwise.
    pub fn handle_day_click(&mut self, day: NaiveDate) {
        self.selector.select(day);
        self.reproject();
    }

    /// Key-based variant of [`handle_day_click`]: calendar cells carry
    /// ISO keys, so UI callers usually come through here.
    ///
    /// [`handle_day_click`]: Self::handle_day_click
    pub fn handle_day_click_key(&mut self, iso: &str) -> Result<(), DateError> {
        let day = date::from_key(iso)?;
        self.handle_day_click(day);
        Ok(())
    }

    /// Manual-entry flow (`DD/MM/YYYY` pair). On failure the current
    /// selection and chart stay as they were.
    pub fn apply_manual_range(
        &mut self,
        start_text: &str,
        end_text: &str,
    ) -> Result<SelectionRange, RangeError> {
        let range = self.selector.set_range_from_text(start_text, end_text)?;
        self.reproject();
        Ok(range)
    }

    pub fn clear_selection(&mut self) {
        self.selector.clear();
        self.reproject();
    }

    /// Rebuilds series, grid and chart after the habit list changed,
    /// keeping the current selection.
    pub fn refresh(&mut self, habits: &[HabitRecord], today: NaiveDate) {
        self.series = progress::build_daily_series(habits, self.days_back, today);
        self.grid = calendar::build_calendar_grid(&self.series, self.max_visible_months, today);
        self.reproject();
    }

    fn reproject(&mut self) {
        let range = self
            .selector
            .is_complete()
            .then(|| self.selector.current());
        self.chart = chart::project_for_range(&self.series, range);
    }

    pub fn series(&self) -> &DailySeries {
        &self.series
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub fn selection(&self) -> SelectionRange {
        self.selector.current()
    }

    pub fn chart(&self) -> &ChartProjection {
        &self.chart
    }
}

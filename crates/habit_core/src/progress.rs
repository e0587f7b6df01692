use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date;
use crate::habit::HabitRecord;

/// Window used by the dashboard card and chart.
pub const DASHBOARD_WINDOW_DAYS: usize = 7;

/// One day of aggregate completion data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Zero-padded `YYYY-MM-DD`, the lookup key into completion sets.
    pub iso_key: String,
    /// 0 = Sunday.
    pub weekday_index: u32,
    /// Share of habits completed that day, rounded to 0..=100.
    pub percent: u8,
}

/// Contiguous run of daily points, oldest first, ending at "today".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySeries {
    pub points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&DailyPoint> {
        self.points.last()
    }

    pub fn point_for_key(&self, key: &str) -> Option<&DailyPoint> {
        self.points.iter().find(|point| point.iso_key == key)
    }
}

/// Everything the dashboard summary card needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardProgress {
    pub series: DailySeries,
    pub today_percent: u8,
    pub average_percent: u8,
    pub current_streak_days: u32,
    pub total_habits: usize,
    pub completed_today_count: usize,
}

/// Builds the daily completion series for the trailing `days_back`
/// window ending at `today`.
///
/// A habit whose completion set holds dates outside the window
/// contributes nothing to it; with no habits every percent is zero.
pub fn build_daily_series(
    habits: &[HabitRecord],
    days_back: usize,
    today: NaiveDate,
) -> DailySeries {
    let total = habits.len();
    let points = date::last_n_days(days_back, today)
        .into_iter()
        .map(|day| {
            let iso_key = date::to_key(day);
            let completed = completed_count(habits, &iso_key);
            DailyPoint {
                weekday_index: day.weekday().num_days_from_sunday(),
                percent: percent_of(completed, total),
                date: day,
                iso_key,
            }
        })
        .collect();
    DailySeries { points }
}

/// Progress over an arbitrary trailing window.
pub fn compute_progress(
    habits: &[HabitRecord],
    window: usize,
    today: NaiveDate,
) -> DashboardProgress {
    let series = build_daily_series(habits, window, today);
    let today_percent = series.last().map(|point| point.percent).unwrap_or(0);
    let completed_today_count = completed_count(habits, &date::to_key(today));
    DashboardProgress {
        today_percent,
        average_percent: average_percent(&series),
        current_streak_days: trailing_streak(&series),
        total_habits: habits.len(),
        completed_today_count,
        series,
    }
}

/// Fixed 7-day dashboard window.
pub fn compute_dashboard_progress(habits: &[HabitRecord], today: NaiveDate) -> DashboardProgress {
    compute_progress(habits, DASHBOARD_WINDOW_DAYS, today)
}

fn completed_count(habits: &[HabitRecord], iso_key: &str) -> usize {
    habits.iter().filter(|h| h.completed_on(iso_key)).count()
}

fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Mean of the already-rounded daily percents, itself rounded.
/// The per-day rounding happens first on purpose; this is how the
/// dashboard has always reported the average.
fn average_percent(series: &DailySeries) -> u8 {
    if series.is_empty() {
        return 0;
    }
    let sum: u32 = series.points.iter().map(|point| point.percent as u32).sum();
    (sum as f64 / series.len() as f64).round() as u8
}

/// Consecutive trailing days with a nonzero percent, newest first.
/// Zero when the most recent day itself is at 0%.
fn trailing_streak(series: &DailySeries) -> u32 {
    series
        .points
        .iter()
        .rev()
        .take_while(|point| point.percent > 0)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::add_days;

    fn day(year: i32, month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, d).unwrap()
    }

    fn series_with_percents(percents: &[u8]) -> DailySeries {
        let start = day(2024, 5, 1);
        let points = percents
            .iter()
            .enumerate()
            .map(|(i, &percent)| {
                let date = add_days(start, i as i64);
                DailyPoint {
                    iso_key: crate::date::to_key(date),
                    weekday_index: date.weekday().num_days_from_sunday(),
                    percent,
                    date,
                }
            })
            .collect();
        DailySeries { points }
    }

    #[test]
    fn series_covers_the_window_with_strictly_increasing_dates() {
        let habits = vec![HabitRecord::new("a", "A"), HabitRecord::new("b", "B")];
        for n in [1usize, 7, 30, 60] {
            let series = build_daily_series(&habits, n, day(2024, 5, 10));
            assert_eq!(series.len(), n);
            assert_eq!(series.last().unwrap().date, day(2024, 5, 10));
            for pair in series.points.windows(2) {
                assert!(pair[0].date < pair[1].date);
                assert_eq!(add_days(pair[0].date, 1), pair[1].date);
            }
            assert!(series.points.iter().all(|p| p.percent <= 100));
        }
    }

    #[test]
    fn no_habits_means_all_zeros() {
        let progress = compute_dashboard_progress(&[], day(2024, 5, 10));
        assert_eq!(progress.total_habits, 0);
        assert_eq!(progress.today_percent, 0);
        assert_eq!(progress.average_percent, 0);
        assert_eq!(progress.current_streak_days, 0);
        assert_eq!(progress.completed_today_count, 0);
        assert!(progress.series.points.iter().all(|p| p.percent == 0));
    }

    #[test]
    fn three_habit_worked_example() {
        let today = day(2024, 5, 10);
        let yesterday = day(2024, 5, 9);

        let mut a = HabitRecord::new("a", "A");
        a.mark_completed(&crate::date::to_key(today));
        a.mark_completed(&crate::date::to_key(yesterday));
        let mut b = HabitRecord::new("b", "B");
        b.mark_completed(&crate::date::to_key(today));
        let c = HabitRecord::new("c", "C");

        let progress = compute_dashboard_progress(&[a, b, c], today);
        assert_eq!(progress.today_percent, 67, "round(2/3 * 100)");
        assert_eq!(progress.completed_today_count, 2);
        assert_eq!(progress.total_habits, 3);
        let yesterday_point = progress
            .series
            .point_for_key("2024-05-09")
            .expect("yesterday in window");
        assert_eq!(yesterday_point.percent, 33, "round(1/3 * 100)");
        assert_eq!(progress.current_streak_days, 2);
    }

    #[test]
    fn completions_outside_the_window_do_not_count() {
        let today = day(2024, 5, 10);
        let mut habit = HabitRecord::new("a", "A");
        habit.mark_completed("2024-04-01");
        let progress = compute_dashboard_progress(&[habit], today);
        assert!(progress.series.points.iter().all(|p| p.percent == 0));
        assert_eq!(progress.completed_today_count, 0);
    }

    #[test]
    fn streak_stops_at_first_zero_day() {
        assert_eq!(trailing_streak(&series_with_percents(&[10, 0, 40, 55, 0])), 0);
        assert_eq!(trailing_streak(&series_with_percents(&[0, 40, 55])), 2);
        assert_eq!(trailing_streak(&series_with_percents(&[50, 50, 50])), 3);
        assert_eq!(trailing_streak(&series_with_percents(&[])), 0);
    }

    #[test]
    fn average_is_over_rounded_daily_percents() {
        // 33 + 67 = 100, mean 50; the raw ratios would average to 50 too,
        // but 33 + 33 + 67 shows the rounded-first order: (33+33+67)/3 = 44.33 -> 44
        assert_eq!(average_percent(&series_with_percents(&[33, 33, 67])), 44);
        assert_eq!(average_percent(&series_with_percents(&[33, 67])), 50);
        assert_eq!(average_percent(&series_with_percents(&[])), 0);
    }
}

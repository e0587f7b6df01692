use serde::{Deserialize, Serialize};

use crate::date;
use crate::progress::{DailyPoint, DailySeries};
use crate::selection::SelectionRange;

/// Points shown when no range is selected: the trailing 30 days of
/// the series, or all of it if shorter.
pub const DEFAULT_CHART_POINTS: usize = 30;

/// Range caption when the selected interval covers no series data.
pub const NO_DATA_RANGE_TEXT: &str = "No data for the selected range";

/// What the charting surface consumes: parallel label/value vectors
/// plus the caption describing the displayed period.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartProjection {
    pub labels: Vec<String>,
    pub values: Vec<u8>,
    pub range_text: String,
}

/// Projects the series for the chart. A complete range filters to
/// the inclusive `[start, end]` interval; anything else falls back
/// to the trailing default window. An empty filtered interval is a
/// valid result (empty vectors, sentinel caption), never an error.
pub fn project_for_range(series: &DailySeries, range: Option<SelectionRange>) -> ChartProjection {
    match range.and_then(|r| r.bounds()) {
        Some((start, end)) => {
            let start_key = date::to_key(start);
            let end_key = date::to_key(end);
            let points: Vec<&DailyPoint> = series
                .points
                .iter()
                .filter(|p| p.iso_key.as_str() >= start_key.as_str() && p.iso_key.as_str() <= end_key.as_str())
                .collect();
            if points.is_empty() {
                return ChartProjection {
                    labels: Vec::new(),
                    values: Vec::new(),
                    range_text: NO_DATA_RANGE_TEXT.to_string(),
                };
            }
            project_points(&points, range_caption(start, end))
        }
        None => project_default(series),
    }
}

/// Default projection: trailing [`DEFAULT_CHART_POINTS`] points.
pub fn project_default(series: &DailySeries) -> ChartProjection {
    let skip = series.len().saturating_sub(DEFAULT_CHART_POINTS);
    let points: Vec<&DailyPoint> = series.points[skip..].iter().collect();
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => {
            let caption = range_caption(first.date, last.date);
            project_points(&points, caption)
        }
        _ => ChartProjection {
            labels: Vec::new(),
            values: Vec::new(),
            range_text: NO_DATA_RANGE_TEXT.to_string(),
        },
    }
}

fn range_caption(start: chrono::NaiveDate, end: chrono::NaiveDate) -> String {
    format!(
        "Exhibiting from {} to {}",
        date::format_long(start),
        date::format_long(end)
    )
}

fn project_points(points: &[&DailyPoint], range_text: String) -> ChartProjection {
    ChartProjection {
        labels: points.iter().map(|p| date::format_short(p.date)).collect(),
        values: points.iter().map(|p| p.percent).collect(),
        range_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::build_daily_series;
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, d).unwrap()
    }

    fn closed_range(start: NaiveDate, end: NaiveDate) -> SelectionRange {
        SelectionRange {
            start: Some(start),
            end: Some(end),
        }
    }

    #[test]
    fn default_projection_takes_the_trailing_thirty_points() {
        let series = build_daily_series(&[], 60, day(2024, 3, 10));
        let projection = project_for_range(&series, None);
        assert_eq!(projection.labels.len(), 30);
        assert_eq!(projection.values.len(), 30);
        assert_eq!(projection.labels.first().map(String::as_str), Some("10/02"));
        assert_eq!(projection.labels.last().map(String::as_str), Some("10/03"));
        assert_eq!(
            projection.range_text,
            "Exhibiting from 10/02/2024 to 10/03/2024"
        );
    }

    #[test]
    fn short_series_projects_in_full() {
        let series = build_daily_series(&[], 7, day(2024, 3, 10));
        let projection = project_for_range(&series, None);
        assert_eq!(projection.labels.len(), 7);
    }

    #[test]
    fn range_filter_is_inclusive_on_both_ends() {
        let series = build_daily_series(&[], 60, day(2024, 3, 10));
        let range = closed_range(day(2024, 3, 1), day(2024, 3, 5));
        let projection = project_for_range(&series, Some(range));
        assert_eq!(projection.labels, vec!["01/03", "02/03", "03/03", "04/03", "05/03"]);
        assert_eq!(
            projection.range_text,
            "Exhibiting from 01/03/2024 to 05/03/2024"
        );
    }

    #[test]
    fn range_outside_the_series_yields_the_sentinel() {
        let series = build_daily_series(&[], 10, day(2024, 3, 10));
        let range = closed_range(day(2023, 1, 1), day(2023, 1, 31));
        let projection = project_for_range(&series, Some(range));
        assert!(projection.labels.is_empty());
        assert!(projection.values.is_empty());
        assert_eq!(projection.range_text, NO_DATA_RANGE_TEXT);
    }

    #[test]
    fn incomplete_range_falls_back_to_the_default_window() {
        let series = build_daily_series(&[], 40, day(2024, 3, 10));
        let open = SelectionRange {
            start: Some(day(2024, 3, 1)),
            end: None,
        };
        assert_eq!(
            project_for_range(&series, Some(open)),
            project_for_range(&series, None)
        );
    }

    #[test]
    fn empty_series_projects_to_the_sentinel() {
        let projection = project_for_range(&DailySeries::default(), None);
        assert!(projection.labels.is_empty());
        assert_eq!(projection.range_text, NO_DATA_RANGE_TEXT);
    }
}

use std::fs;

use chrono::NaiveDate;
use habit_core::progress::compute_dashboard_progress;
use habit_core::selection::RangeError;
use habit_core::view::ReportsViewState;
use habit_core::HabitStore;
use tempfile::tempdir;

fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).unwrap()
}

#[test]
fn store_to_dashboard_to_reports_round_trip() {
    let temp = tempdir().expect("tempdir");
    let store_path = temp.path().join("habits.json");

    // Legacy-shaped store: numeric id, Portuguese field names, one
    // malformed entry that the store must drop.
    fs::write(
        &store_path,
        r#"[
            {
                "id": 1732500000000,
                "nome": "Beber água",
                "frequency": "Diária",
                "completedDates": ["2024-03-09", "2024-03-10"]
            },
            {
                "id": "leitura",
                "name": "Ler 10 páginas",
                "completedDates": ["2024-03-10"]
            },
            {"id": "vazio", "name": "Meditar", "completedDates": []},
            17
        ]"#,
    )
    .expect("write fixture");

    let store = HabitStore::builder()
        .store_path(&store_path)
        .build()
        .expect("build store");
    let habits = store.habits();
    assert_eq!(habits.len(), 3, "malformed entry dropped");

    let today = day(2024, 3, 10);
    let dashboard = compute_dashboard_progress(&habits, today);
    assert_eq!(dashboard.series.len(), 7);
    assert_eq!(dashboard.total_habits, 3);
    assert_eq!(dashboard.completed_today_count, 2);
    assert_eq!(dashboard.today_percent, 67);
    let yesterday = dashboard
        .series
        .point_for_key("2024-03-09")
        .expect("yesterday");
    assert_eq!(yesterday.percent, 33);
    assert_eq!(dashboard.current_streak_days, 2);

    // Reports: 60-day window over the same records, two visible months.
    let mut view = ReportsViewState::new(&habits, 60, 2, today);
    assert_eq!(view.series().len(), 60);
    assert_eq!(view.grid().months.len(), 2);
    assert_eq!(view.chart().labels.len(), 30);

    // Calendar clicks, reversed on purpose: the selector swaps.
    view.handle_day_click(day(2024, 3, 10));
    view.handle_day_click(day(2024, 3, 9));
    let (start, end) = view.selection().bounds().expect("closed range");
    assert_eq!((start, end), (day(2024, 3, 9), day(2024, 3, 10)));
    assert_eq!(view.chart().values, vec![33, 67]);

    // Manual entry rejects a reversed pair and keeps the chart.
    assert_eq!(
        view.apply_manual_range("10/03/2024", "01/03/2024"),
        Err(RangeError::InvalidRange)
    );
    assert_eq!(view.chart().values, vec![33, 67]);

    // A valid manual range reprojects.
    view.apply_manual_range("01/03/2024", "10/03/2024")
        .expect("valid range");
    assert_eq!(view.chart().labels.len(), 10);

    // Toggling a completion through the store feeds back into the view.
    store
        .toggle_today_completion("leitura", today)
        .expect("toggle off");
    view.refresh(&store.habits(), today);
    let today_value = *view.chart().values.last().expect("today in range");
    assert_eq!(today_value, 33, "one of three habits completed today");
}

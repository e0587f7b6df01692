use std::path::PathBuf;

use anyhow::Result;
use habit_core::calendar::{CalendarCell, CalendarGrid, DayState, WEEKDAY_HEADER};
use habit_core::chart::ChartProjection;
use habit_core::date;
use habit_core::progress::{self, DashboardProgress};
use habit_core::view::ReportsViewState;
use habit_core::HabitStore;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) store_path: PathBuf,
    pub(crate) days_back: usize,
    pub(crate) max_visible_months: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("HABIT_STORE") {
            config.store_path = PathBuf::from(path);
        }
        if let Ok(days) = std::env::var("HABIT_DAYS_BACK") {
            if let Ok(value) = days.trim().parse::<usize>() {
                if value > 0 {
                    config.days_back = value;
                }
            }
        }
        if let Ok(months) = std::env::var("HABIT_VISIBLE_MONTHS") {
            if let Ok(value) = months.trim().parse::<usize>() {
                if value > 0 {
                    config.max_visible_months = value;
                }
            }
        }
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("habits.json"),
            days_back: 60,
            max_visible_months: 2,
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(path = %config.store_path.display(), "opening habit store");
    let store = HabitStore::builder()
        .store_path(&config.store_path)
        .build()?;
    let habits = store.habits();
    debug!(habit_count = habits.len(), "loaded habit records");

    let today = date::today();
    let dashboard = progress::compute_dashboard_progress(&habits, today);
    print_dashboard(&dashboard);

    let view = ReportsViewState::new(&habits, config.days_back, config.max_visible_months, today);
    print_calendar(view.grid());
    print_chart(view.chart());
    Ok(())
}

fn print_dashboard(progress: &DashboardProgress) {
    println!("== Dashboard ==");
    if progress.total_habits == 0 {
        println!("Today: no habits registered yet");
    } else {
        println!(
            "Today: {} of {} habits completed ({}%)",
            progress.completed_today_count, progress.total_habits, progress.today_percent
        );
    }
    println!(
        "Average: {}% of habits completed over the last {} days",
        progress.average_percent,
        progress.series.len()
    );
    match progress.current_streak_days {
        0 => println!("Current streak: no days in a row yet"),
        1 => println!("Current streak: 1 day in a row"),
        days => println!("Current streak: {days} days in a row"),
    }
}

fn print_calendar(grid: &CalendarGrid) {
    for month in &grid.months {
        println!();
        println!("{}", month.title);
        println!(" {}", WEEKDAY_HEADER.join("   "));
        for week in month.cells.chunks(7) {
            let row: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    CalendarCell::Empty => "  ".to_string(),
                    CalendarCell::Day(day) => match day.state {
                        DayState::Future => " .".to_string(),
                        DayState::Selectable { .. } => format!("{:2}", day.day),
                    },
                })
                .collect();
            println!("{}", row.join("  "));
        }
    }
}

fn print_chart(chart: &ChartProjection) {
    println!();
    println!("{}", chart.range_text);
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let filled = *value as usize / 5;
        println!("{label}  {value:3}% {}", "#".repeat(filled));
    }
}

pub mod calendar;
pub mod chart;
pub mod date;
pub mod habit;
pub mod progress;
pub mod selection;
pub mod store;
pub mod view;

pub use crate::store::{HabitStore, HabitStoreBuilder};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;

use crate::date;
use crate::habit::HabitRecord;

/// Partial update applied to an existing habit's editable fields.
/// Completion history and creation metadata are never touched here.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<String>,
    pub goal: Option<String>,
}

/// JSON-file-backed habit store.
///
/// The store normalizes whatever it finds on disk before any of it
/// reaches the computation layer: a missing file or non-array
/// document reads as an empty list, malformed entries are dropped
/// with a warning, and records missing an id get a positional one.
pub struct HabitStore {
    store_path: PathBuf,
    habits: RwLock<Vec<HabitRecord>>,
    watcher: Option<RecommendedWatcher>,
}

pub struct HabitStoreBuilder {
    store_path: Option<PathBuf>,
}

impl HabitStoreBuilder {
    pub fn new() -> Self {
        Self { store_path: None }
    }

    pub fn store_path(mut self, path: impl AsRef<Path>) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<HabitStore> {
        let store_path = self
            .store_path
            .ok_or_else(|| anyhow!("store path not configured"))?;
        let store = HabitStore {
            store_path,
            habits: RwLock::new(Vec::new()),
            watcher: None,
        };
        store.reload()?;
        Ok(store)
    }
}

impl Default for HabitStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitStore {
    pub fn builder() -> HabitStoreBuilder {
        HabitStoreBuilder::new()
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Re-reads the store file into the in-memory cache.
    pub fn reload(&self) -> Result<()> {
        let records = read_records(&self.store_path);
        *self.habits.write() = records;
        Ok(())
    }

    /// Snapshot of the current habit list.
    pub fn habits(&self) -> Vec<HabitRecord> {
        self.habits.read().clone()
    }

    /// Appends a habit and persists. A blank id gets a timestamp id,
    /// matching what the legacy store generated.
    pub fn add_habit(&self, mut habit: HabitRecord) -> Result<Vec<HabitRecord>> {
        if habit.id.is_empty() {
            habit.id = chrono::Utc::now().timestamp_millis().to_string();
        }
        self.mutate(|habits| habits.push(habit))
    }

    /// Applies a partial update to the habit with the given id.
    pub fn update_habit(&self, id: &str, update: HabitUpdate) -> Result<Vec<HabitRecord>> {
        self.mutate(|habits| {
            if let Some(habit) = habits.iter_mut().find(|h| h.id == id) {
                if let Some(name) = update.name {
                    habit.name = name;
                }
                if let Some(category) = update.category {
                    habit.category = category;
                }
                if let Some(frequency) = update.frequency {
                    habit.frequency = frequency;
                }
                if let Some(goal) = update.goal {
                    habit.goal = goal;
                }
            }
        })
    }

    /// Removes the habit with the given id.
    pub fn delete_habit(&self, id: &str) -> Result<Vec<HabitRecord>> {
        self.mutate(|habits| habits.retain(|h| h.id != id))
    }

    /// Flips today's completion for the habit and persists. Returns
    /// the new state (`true` = now completed), or an error when the
    /// id is unknown.
    pub fn toggle_today_completion(&self, id: &str, today: NaiveDate) -> Result<bool> {
        let key = date::to_key(today);
        let mut completed = None;
        self.mutate(|habits| {
            if let Some(habit) = habits.iter_mut().find(|h| h.id == id) {
                completed = Some(habit.toggle_completion(&key));
            }
        })?;
        completed.ok_or_else(|| anyhow!("unknown habit id: {id}"))
    }

    /// Marks the habit completed today without toggling. Idempotent.
    pub fn mark_completed_today(&self, id: &str, today: NaiveDate) -> Result<()> {
        let key = date::to_key(today);
        let mut found = false;
        self.mutate(|habits| {
            if let Some(habit) = habits.iter_mut().find(|h| h.id == id) {
                habit.mark_completed(&key);
                found = true;
            }
        })?;
        if found {
            Ok(())
        } else {
            Err(anyhow!("unknown habit id: {id}"))
        }
    }

    /// Watches the store file and debug-logs change events, so an
    /// embedding UI can decide when to reload.
    pub fn watch(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }
        let mut watcher = notify::recommended_watcher(|res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                tracing::debug!(?event, "habit store change detected");
            }
        })?;
        watcher.watch(&self.store_path, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut Vec<HabitRecord>)) -> Result<Vec<HabitRecord>> {
        let mut habits = self.habits.write();
        apply(&mut habits);
        self.persist(&habits)?;
        Ok(habits.clone())
    }

    fn persist(&self, habits: &[HabitRecord]) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(habits)?;
        fs::write(&self.store_path, json)
            .with_context(|| format!("writing habit store {}", self.store_path.display()))
    }
}

fn read_records(path: &Path) -> Vec<HabitRecord> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    let parsed: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "habit store is not valid JSON; starting empty");
            return Vec::new();
        }
    };
    let serde_json::Value::Array(entries) = parsed else {
        tracing::warn!(path = %path.display(), "habit store root is not an array; starting empty");
        return Vec::new();
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<HabitRecord>(entry) {
            Ok(mut habit) => {
                if habit.id.is_empty() {
                    habit.id = index.to_string();
                }
                Some(habit)
            }
            Err(err) => {
                tracing::warn!(index, %err, "dropping malformed habit record");
                None
            }
        })
        .collect()
}

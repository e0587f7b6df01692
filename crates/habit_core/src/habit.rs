use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A tracked habit together with the set of days it was completed on.
///
/// Records come from the persisted store; the legacy store wrote some
/// field names in Portuguese and numeric ids, so deserialization
/// accepts both shapes. `completed_dates` is a set of ISO day keys
/// (`YYYY-MM-DD`) with no duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, alias = "categoria")]
    pub category: String,
    #[serde(default, alias = "criadoEm")]
    pub created_at: String,
    #[serde(default, alias = "frequencia")]
    pub frequency: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub completed_dates: BTreeSet<String>,
}

impl HabitRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            created_at: String::new(),
            frequency: String::new(),
            goal: String::new(),
            completed_dates: BTreeSet::new(),
        }
    }

    /// Whether the habit was completed on the given ISO day key.
    pub fn completed_on(&self, key: &str) -> bool {
        self.completed_dates.contains(key)
    }

    /// Marks the habit completed on the given day. Idempotent.
    pub fn mark_completed(&mut self, key: &str) {
        self.completed_dates.insert(key.to_string());
    }

    /// Flips the completion state for the given day and returns the
    /// new state (`true` = now completed).
    pub fn toggle_completion(&mut self, key: &str) -> bool {
        if self.completed_dates.remove(key) {
            false
        } else {
            self.completed_dates.insert(key.to_string());
            true
        }
    }
}

/// Accepts habit ids persisted either as JSON strings or numbers.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FoodEntry, MealType, NutritionGoals};

/// On-disk layout of the log file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: Vec<FoodEntry>,
    #[serde(default)]
    goals: NutritionGoals,
}

/// File-backed collection of food entries and nutrition goals.
///
/// The store is the system of record; the analytics functions only ever
/// see snapshots of it. Entries are append/delete only — an edit is a
/// delete followed by a fresh add.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    entries: Vec<FoodEntry>,
    goals: NutritionGoals,
}

impl LogStore {
    /// Open the log at the given path. A missing file yields an empty
    /// log with default goals; a malformed file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "log file missing, starting empty");
            return Ok(Self {
                path,
                entries: Vec::new(),
                goals: NutritionGoals::default(),
            });
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read log file {}", path.display()))?;
        let file: StoreFile = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed log file {}", path.display()))?;

        debug!(
            path = %path.display(),
            entries = file.entries.len(),
            "loaded log file"
        );
        Ok(Self {
            path,
            entries: file.entries,
            goals: file.goals,
        })
    }

    /// Write the log back to its file.
    pub fn save(&self) -> Result<()> {
        let file = StoreFile {
            entries: self.entries.clone(),
            goals: self.goals,
        };
        let raw = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write log file {}", self.path.display()))?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "saved log file");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a new entry.
    ///
    /// Pass `created_at` as the time the entry was logged — the caller
    /// owns the clock. The entry id is derived from that timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn add_entry(
        &mut self,
        created_at: DateTime<Utc>,
        date: NaiveDate,
        meal: MealType,
        food: &str,
        calories: u32,
        protein: f64,
        carbs: f64,
        fat: f64,
    ) -> &FoodEntry {
        let id = self.fresh_id(created_at);
        let idx = self.entries.len();
        self.entries.push(FoodEntry {
            id,
            date,
            meal,
            food: food.to_string(),
            calories,
            protein,
            carbs,
            fat,
            created_at,
        });
        &self.entries[idx]
    }

    /// Remove an entry by id. Returns whether anything was removed.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Merge imported entries, skipping ids already present.
    /// Returns how many entries were added.
    pub fn import(&mut self, imported: Vec<FoodEntry>) -> usize {
        let mut added = 0;
        for entry in imported {
            if self.entries.iter().any(|e| e.id == entry.id) {
                continue;
            }
            self.entries.push(entry);
            added += 1;
        }
        added
    }

    /// Snapshot of all entries, in insertion order.
    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    /// Entries logged on the given date.
    pub fn entries_on(&self, date: NaiveDate) -> Vec<&FoodEntry> {
        self.entries.iter().filter(|e| e.date == date).collect()
    }

    pub fn goals(&self) -> NutritionGoals {
        self.goals
    }

    pub fn set_goals(&mut self, goals: NutritionGoals) {
        self.goals = goals;
    }

    /// Timestamp-millis id, suffixed if the millisecond is already taken.
    fn fresh_id(&self, created_at: DateTime<Utc>) -> String {
        let base = created_at.timestamp_millis().to_string();
        if !self.entries.iter().any(|e| e.id == base) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.entries.iter().any(|e| e.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

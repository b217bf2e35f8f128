use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{FoodEntry, MealType};

/// One exported log row. Column names match the app's original export,
/// so old files import cleanly.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Meal")]
    meal: &'static str,
    #[serde(rename = "Food")]
    food: &'a str,
    #[serde(rename = "Calories")]
    calories: u32,
    #[serde(rename = "Protein")]
    protein: f64,
    #[serde(rename = "Carbs")]
    carbs: f64,
    #[serde(rename = "Fat")]
    fat: f64,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

/// Raw imported row; every cell optional so one bad row never aborts
/// the whole import.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Meal", default)]
    meal: Option<String>,
    #[serde(rename = "Food", default)]
    food: Option<String>,
    #[serde(rename = "Calories", default)]
    calories: Option<String>,
    #[serde(rename = "Protein", default)]
    protein: Option<String>,
    #[serde(rename = "Carbs", default)]
    carbs: Option<String>,
    #[serde(rename = "Fat", default)]
    fat: Option<String>,
    #[serde(rename = "Timestamp", default)]
    timestamp: Option<String>,
}

/// Write entries as CSV.
pub fn export_entries<W: Write>(entries: &[FoodEntry], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in entries {
        csv.serialize(ExportRow {
            date: entry.date.to_string(),
            meal: entry.meal.as_str(),
            food: &entry.food,
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            timestamp: entry.created_at.to_rfc3339(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_to_path(entries: &[FoodEntry], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    export_entries(entries, file)
}

/// Read entries from CSV.
///
/// Pass `imported_at` as the time of the import — it seeds the entry
/// ids and backfills missing dates and timestamps. Rows without a food
/// name are dropped; unparseable meals fall back to `Snack` and
/// unparseable numbers to 0.
pub fn import_entries<R: Read>(reader: R, imported_at: DateTime<Utc>) -> Result<Vec<FoodEntry>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut entries = Vec::new();

    for (index, row) in csv.deserialize::<ImportRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse CSV row {}", index + 1))?;

        let Some(food) = row.food.filter(|f| !f.trim().is_empty()) else {
            warn!(row = index + 1, "skipping CSV row without a food name");
            continue;
        };

        let date = row
            .date
            .and_then(|s| s.trim().parse::<NaiveDate>().ok())
            .unwrap_or_else(|| imported_at.date_naive());
        let meal = row
            .meal
            .and_then(|s| s.trim().parse::<MealType>().ok())
            .unwrap_or(MealType::Snack);
        let created_at = row
            .timestamp
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(imported_at);

        let number = |cell: Option<String>| -> f64 {
            cell.and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0)
        };

        entries.push(FoodEntry {
            id: format!("imported-{}-{}", imported_at.timestamp_millis(), index),
            date,
            meal,
            food,
            calories: number(row.calories) as u32,
            protein: number(row.protein),
            carbs: number(row.carbs),
            fat: number(row.fat),
            created_at,
        });
    }

    Ok(entries)
}

pub fn import_from_path(
    path: impl AsRef<Path>,
    imported_at: DateTime<Utc>,
) -> Result<Vec<FoodEntry>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open import file {}", path.display()))?;
    import_entries(file, imported_at)
}

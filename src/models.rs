use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Meal slot an entry is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal slots, in display order.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Breakfast" => Ok(MealType::Breakfast),
            "Lunch" => Ok(MealType::Lunch),
            "Dinner" => Ok(MealType::Dinner),
            "Snack" => Ok(MealType::Snack),
            other => Err(anyhow!("Unknown meal type: {}", other)),
        }
    }
}

/// An individual food log entry.
///
/// Entries are immutable once created; edits are modeled as
/// delete + re-add under a fresh id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Opaque unique entry id
    pub id: String,
    pub date: NaiveDate,
    pub meal: MealType,
    /// Food name
    pub food: String,
    /// Calories (kcal)
    pub calories: u32,
    /// Protein (g)
    #[serde(default)]
    pub protein: f64,
    /// Carbs (g)
    #[serde(default)]
    pub carbs: f64,
    /// Fat (g)
    #[serde(default)]
    pub fat: f64,
    pub created_at: DateTime<Utc>,
}

/// Per-meal calorie totals for one day.
///
/// A closed struct rather than a map keyed by meal name, so a new meal
/// slot cannot appear without the compiler pointing at every use site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealBreakdown {
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
    pub snack: u32,
}

impl MealBreakdown {
    pub fn get(&self, meal: MealType) -> u32 {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
            MealType::Snack => self.snack,
        }
    }

    pub fn add(&mut self, meal: MealType, calories: u32) {
        match meal {
            MealType::Breakfast => self.breakfast += calories,
            MealType::Lunch => self.lunch += calories,
            MealType::Dinner => self.dinner += calories,
            MealType::Snack => self.snack += calories,
        }
    }
}

/// Aggregated statistics for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    /// Calories (kcal) summed over the day's entries
    pub total_calories: u32,
    /// Number of entries logged that day
    pub meal_count: u32,
    pub breakdown: MealBreakdown,
}

/// Aggregated statistics for one week (Sunday through Saturday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    /// The Sunday on or before every day in the week
    pub week_start: NaiveDate,
    /// Mean daily calories over the days actually logged
    pub avg_calories: u32,
    pub total_calories: u32,
    pub days_logged: u32,
}

/// Direction of recent calorie intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Trend, forecast, and goal-compliance summary over the recent log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub trend: TrendDirection,
    /// Mean daily calories over the active window
    pub avg_daily_calories: u32,
    /// Most frequently logged meal slot across the whole log
    pub most_common_meal: MealType,
    /// Forecast daily calories for the next period
    pub predicted_next_week: u32,
    /// Percentage (0-100) of active-window days within the goal band
    pub compliance_rate: u32,
}

/// Total and percent-of-calories macronutrient breakdown.
///
/// Percentages use the Atwater factors (protein 4 kcal/g, carbs 4 kcal/g,
/// fat 9 kcal/g) and are rounded independently, so they may sum to 99-101.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroBalance {
    pub total_calories: u32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub protein_percent: u32,
    pub carbs_percent: u32,
    pub fat_percent: u32,
}

/// Daily nutrition targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionGoals {
    /// Daily calorie target (kcal)
    pub daily_calories: u32,
    /// Protein target (g)
    pub protein: u32,
    /// Carbs target (g)
    pub carbs: u32,
    /// Fat target (g)
    pub fat: u32,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            daily_calories: 2000,
            protein: 120,
            carbs: 250,
            fat: 65,
        }
    }
}

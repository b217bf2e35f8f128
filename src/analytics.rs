use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{
    AnalyticsSummary, DailyStats, FoodEntry, MacroBalance, MealBreakdown, MealType,
    TrendDirection, WeeklyStats,
};

/// How many recent daily records feed the trend/compliance window.
const TREND_WINDOW_DAYS: usize = 7;

/// Half-mean gap (kcal) below which intake counts as stable.
const TREND_NOISE_THRESHOLD: f64 = 100.0;

/// Allowed deviation from the calorie goal, as a fraction of the goal.
const COMPLIANCE_TOLERANCE: f64 = 0.15;

/// Calories per gram of protein and carbs (Atwater factor).
const KCAL_PER_G_PROTEIN_CARBS: f64 = 4.0;

/// Calories per gram of fat (Atwater factor).
const KCAL_PER_G_FAT: f64 = 9.0;

/// Group entries by calendar date, one record per distinct date,
/// ascending by date.
///
/// Input order is irrelevant. Dates with no entries never appear;
/// callers must treat a missing date as "no data", not as zero.
pub fn daily_stats(entries: &[FoodEntry]) -> Vec<DailyStats> {
    let mut days: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();

    for entry in entries {
        let day = days.entry(entry.date).or_insert_with(|| DailyStats {
            date: entry.date,
            total_calories: 0,
            meal_count: 0,
            breakdown: MealBreakdown::default(),
        });
        day.total_calories += entry.calories;
        day.meal_count += 1;
        day.breakdown.add(entry.meal, entry.calories);
    }

    days.into_values().collect()
}

/// The Sunday on or before the given date.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Roll daily records up into per-week averages, one record per
/// distinct week, ascending by week start. Weeks run Sunday to Saturday.
pub fn weekly_stats(daily: &[DailyStats]) -> Vec<WeeklyStats> {
    let mut weeks: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();

    for day in daily {
        let week = weeks.entry(week_start(day.date)).or_insert((0, 0));
        week.0 += day.total_calories;
        week.1 += 1;
    }

    weeks
        .into_iter()
        .map(|(start, (total, days))| WeeklyStats {
            week_start: start,
            avg_calories: (f64::from(total) / f64::from(days)).round() as u32,
            total_calories: total,
            days_logged: days,
        })
        .collect()
}

fn mean_calories(days: &[&DailyStats]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    let total: u32 = days.iter().map(|d| d.total_calories).sum();
    f64::from(total) / days.len() as f64
}

/// Most frequently logged meal slot across all entries, ties broken by
/// whichever meal was encountered first in entry order. `Snack` when
/// there are no entries.
fn most_common_meal(entries: &[FoodEntry]) -> MealType {
    let mut counts = [0u32; MealType::ALL.len()];
    let mut seen_order: Vec<MealType> = Vec::with_capacity(MealType::ALL.len());

    for entry in entries {
        let idx = entry.meal as usize;
        if counts[idx] == 0 {
            seen_order.push(entry.meal);
        }
        counts[idx] += 1;
    }

    let mut best = MealType::Snack;
    let mut best_count = 0;
    for meal in seen_order {
        let count = counts[meal as usize];
        if count > best_count {
            best = meal;
            best_count = count;
        }
    }
    best
}

/// Analyze the recent log for trend, forecast, and goal compliance.
///
/// The window is the last 7 daily records with nonzero calories; a day
/// totaling zero counts as "not logged", not as a zero-calorie day.
/// With no usable window this returns the fixed fallback record
/// (stable, zero average, compliance 0, forecast = goal).
///
/// Trend compares the mean of the window's first `ceil(n/2)` days with
/// the mean of the rest. A lone-day window therefore splits into
/// `{day} / {}` and reads as decreasing whenever the day exceeds the
/// noise threshold; that asymmetry is part of the contract.
pub fn analyze(entries: &[FoodEntry], target_calories: u32) -> AnalyticsSummary {
    let daily = daily_stats(entries);

    let tail = daily.len().saturating_sub(TREND_WINDOW_DAYS);
    let window: Vec<&DailyStats> = daily[tail..]
        .iter()
        .filter(|d| d.total_calories > 0)
        .collect();

    if window.is_empty() {
        return AnalyticsSummary {
            trend: TrendDirection::Stable,
            avg_daily_calories: 0,
            most_common_meal: MealType::Breakfast,
            predicted_next_week: target_calories,
            compliance_rate: 0,
        };
    }

    let avg_calories = mean_calories(&window);

    let split = window.len().div_ceil(2);
    let difference = mean_calories(&window[split..]) - mean_calories(&window[..split]);
    let trend = if difference.abs() > TREND_NOISE_THRESHOLD {
        if difference > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    } else {
        TrendDirection::Stable
    };

    let allowed = f64::from(target_calories) * COMPLIANCE_TOLERANCE;
    let compliant = window
        .iter()
        .filter(|d| (f64::from(d.total_calories) - f64::from(target_calories)).abs() <= allowed)
        .count();
    let compliance_rate = (compliant as f64 / window.len() as f64 * 100.0).round() as u32;

    AnalyticsSummary {
        trend,
        avg_daily_calories: avg_calories.round() as u32,
        most_common_meal: most_common_meal(entries),
        // Moving-average forecast: the window mean is the prediction.
        predicted_next_week: avg_calories.round() as u32,
        compliance_rate,
    }
}

/// Sum calories and macros over the given entries and compute each
/// macro's share of total calories.
///
/// Callers typically pre-filter to a single date. Percentages are 0
/// when no calories were logged.
pub fn macro_balance(entries: &[FoodEntry]) -> MacroBalance {
    let mut total_calories = 0u32;
    let mut total_protein = 0.0;
    let mut total_carbs = 0.0;
    let mut total_fat = 0.0;

    for entry in entries {
        total_calories += entry.calories;
        total_protein += entry.protein;
        total_carbs += entry.carbs;
        total_fat += entry.fat;
    }

    let percent_of = |grams: f64, kcal_per_g: f64| -> u32 {
        if total_calories == 0 {
            return 0;
        }
        (grams * kcal_per_g / f64::from(total_calories) * 100.0).round() as u32
    };

    MacroBalance {
        total_calories,
        total_protein,
        total_carbs,
        total_fat,
        protein_percent: percent_of(total_protein, KCAL_PER_G_PROTEIN_CARBS),
        carbs_percent: percent_of(total_carbs, KCAL_PER_G_PROTEIN_CARBS),
        fat_percent: percent_of(total_fat, KCAL_PER_G_FAT),
    }
}

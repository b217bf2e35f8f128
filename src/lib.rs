//! Personal diet log engine.
//!
//! [`store::LogStore`] persists entries and goals; the [`analytics`]
//! functions turn entry snapshots into daily statistics, weekly
//! roll-ups, and a trend/compliance summary; [`csv_io`] round-trips
//! the log's CSV format.

pub mod analytics;
pub mod csv_io;
pub mod models;
pub mod store;

pub use analytics::{analyze, daily_stats, macro_balance, weekly_stats};
pub use models::{
    AnalyticsSummary, DailyStats, FoodEntry, MacroBalance, MealBreakdown, MealType,
    NutritionGoals, TrendDirection, WeeklyStats,
};
pub use store::LogStore;

use chrono::{DateTime, NaiveDate, Utc};
use diet_log::csv_io::{export_entries, import_entries};
use diet_log::models::{FoodEntry, MealType, NutritionGoals};
use diet_log::store::LogStore;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn timestamp(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

#[test]
fn open_missing_file_starts_empty_with_default_goals() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::open(dir.path().join("log.json")).unwrap();

    assert!(store.entries().is_empty());
    assert_eq!(store.goals(), NutritionGoals::default());
    assert_eq!(store.goals().daily_calories, 2000);
}

#[test]
fn open_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(LogStore::open(&path).is_err());
}

#[test]
fn entries_and_goals_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");

    let mut store = LogStore::open(&path).unwrap();
    store.add_entry(
        timestamp("2024-03-01T08:30:00Z"),
        date("2024-03-01"),
        MealType::Breakfast,
        "oats",
        350,
        12.0,
        55.0,
        7.0,
    );
    store.add_entry(
        timestamp("2024-03-01T13:00:00Z"),
        date("2024-03-01"),
        MealType::Lunch,
        "salad",
        420,
        18.0,
        30.0,
        22.0,
    );
    store.set_goals(NutritionGoals {
        daily_calories: 1800,
        protein: 140,
        carbs: 180,
        fat: 60,
    });
    store.save().unwrap();

    let reopened = LogStore::open(&path).unwrap();
    assert_eq!(reopened.entries(), store.entries());
    assert_eq!(reopened.goals().daily_calories, 1800);
    assert_eq!(reopened.goals().protein, 140);
}

#[test]
fn add_entry_derives_id_from_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open(dir.path().join("log.json")).unwrap();

    let at = timestamp("2024-03-01T08:30:00Z");
    let entry = store.add_entry(
        at,
        date("2024-03-01"),
        MealType::Snack,
        "apple",
        80,
        0.0,
        0.0,
        0.0,
    );
    assert_eq!(entry.id, at.timestamp_millis().to_string());

    // Same millisecond gets a suffixed id instead of a duplicate.
    let entry = store.add_entry(
        at,
        date("2024-03-01"),
        MealType::Snack,
        "banana",
        90,
        0.0,
        0.0,
        0.0,
    );
    assert_eq!(entry.id, format!("{}-1", at.timestamp_millis()));
}

#[test]
fn remove_entry_deletes_only_the_matching_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open(dir.path().join("log.json")).unwrap();

    let id = store
        .add_entry(
            timestamp("2024-03-01T08:30:00Z"),
            date("2024-03-01"),
            MealType::Dinner,
            "pasta",
            700,
            0.0,
            0.0,
            0.0,
        )
        .id
        .clone();

    assert!(!store.remove_entry("no-such-id"));
    assert_eq!(store.entries().len(), 1);

    assert!(store.remove_entry(&id));
    assert!(store.entries().is_empty());
}

#[test]
fn entries_on_filters_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open(dir.path().join("log.json")).unwrap();

    store.add_entry(
        timestamp("2024-03-01T08:00:00Z"),
        date("2024-03-01"),
        MealType::Breakfast,
        "toast",
        250,
        0.0,
        0.0,
        0.0,
    );
    store.add_entry(
        timestamp("2024-03-02T08:00:00Z"),
        date("2024-03-02"),
        MealType::Breakfast,
        "eggs",
        300,
        0.0,
        0.0,
        0.0,
    );

    let today = store.entries_on(date("2024-03-02"));
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].food, "eggs");
}

#[test]
fn import_skips_entries_already_present() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open(dir.path().join("log.json")).unwrap();

    let entry = FoodEntry {
        id: "imported-1-0".to_string(),
        date: date("2024-03-01"),
        meal: MealType::Lunch,
        food: "wrap".to_string(),
        calories: 500,
        protein: 20.0,
        carbs: 45.0,
        fat: 15.0,
        created_at: timestamp("2024-03-01T12:00:00Z"),
    };

    assert_eq!(store.import(vec![entry.clone()]), 1);
    assert_eq!(store.import(vec![entry]), 0, "duplicate id must be skipped");
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn csv_round_trip_preserves_entry_data() {
    let entries = vec![
        FoodEntry {
            id: "1709280000000".to_string(),
            date: date("2024-03-01"),
            meal: MealType::Breakfast,
            food: "oats".to_string(),
            calories: 350,
            protein: 12.0,
            carbs: 55.0,
            fat: 7.0,
            created_at: timestamp("2024-03-01T08:30:00Z"),
        },
        FoodEntry {
            id: "1709290000000".to_string(),
            date: date("2024-03-01"),
            meal: MealType::Dinner,
            food: "pasta, with cheese".to_string(),
            calories: 700,
            protein: 25.0,
            carbs: 80.0,
            fat: 20.0,
            created_at: timestamp("2024-03-01T19:00:00Z"),
        },
    ];

    let mut buf = Vec::new();
    export_entries(&entries, &mut buf).unwrap();

    let imported = import_entries(buf.as_slice(), timestamp("2024-03-05T10:00:00Z")).unwrap();
    assert_eq!(imported.len(), entries.len());

    for (original, imported) in entries.iter().zip(&imported) {
        assert_eq!(imported.date, original.date);
        assert_eq!(imported.meal, original.meal);
        assert_eq!(imported.food, original.food);
        assert_eq!(imported.calories, original.calories);
        assert_eq!(imported.protein, original.protein);
        assert_eq!(imported.carbs, original.carbs);
        assert_eq!(imported.fat, original.fat);
        assert_eq!(imported.created_at, original.created_at);
    }
}

#[test]
fn csv_import_applies_fallbacks() {
    let csv = "\
Date,Meal,Food,Calories,Protein,Carbs,Fat,Timestamp
2024-03-01,Brunch,toast,abc,-5,3.5,,
not-a-date,Lunch,soup,400,10,20,5,2024-03-01T12:00:00Z
2024-03-02,Dinner,,700,,,,
";
    let imported_at = timestamp("2024-03-05T10:00:00Z");
    let imported = import_entries(csv.as_bytes(), imported_at).unwrap();

    // The food-less third row is dropped.
    assert_eq!(imported.len(), 2);

    let first = &imported[0];
    assert_eq!(first.meal, MealType::Snack, "unknown meal falls back to Snack");
    assert_eq!(first.calories, 0, "unparseable calories fall back to 0");
    assert_eq!(first.protein, 0.0, "negative macros fall back to 0");
    assert_eq!(first.carbs, 3.5);
    assert_eq!(first.fat, 0.0);
    assert_eq!(first.created_at, imported_at);
    assert_eq!(first.id, format!("imported-{}-0", imported_at.timestamp_millis()));

    let second = &imported[1];
    assert_eq!(second.date, imported_at.date_naive(), "bad date falls back to import day");
    assert_eq!(second.created_at, timestamp("2024-03-01T12:00:00Z"));
}

#[test]
fn store_feeds_analytics_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open(dir.path().join("log.json")).unwrap();

    store.add_entry(
        timestamp("2024-03-01T08:00:00Z"),
        date("2024-03-01"),
        MealType::Breakfast,
        "oats",
        350,
        12.0,
        55.0,
        7.0,
    );
    store.add_entry(
        timestamp("2024-03-01T13:00:00Z"),
        date("2024-03-01"),
        MealType::Lunch,
        "salad",
        420,
        18.0,
        30.0,
        22.0,
    );

    let daily = diet_log::daily_stats(store.entries());
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].total_calories, 770);

    let balance = diet_log::macro_balance(&store
        .entries_on(date("2024-03-01"))
        .into_iter()
        .cloned()
        .collect::<Vec<_>>());
    assert_eq!(balance.total_calories, 770);
}

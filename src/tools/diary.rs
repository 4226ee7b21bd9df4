//! Diary MCP Tools
//!
//! Food, exercise and water logging, the assembled diary view, bulk import of
//! cached day records and CSV export.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{Day, ExerciseLog, FoodLog, UserSettings, WeightRecord};
use crate::nutrition::{
    aggregate_day, derive_progress, meal_totals, water_display, weight_for_date, DailyGoal,
    DayRecord, DayTotals, ExerciseEntry, FoodEntry, MealSlot, Nutrients, Progress, StepsSummary,
    WaterDisplay, WeightEntry,
};
use super::ensure_editable;
use super::profile::{resolve_goal, GoalSource};

pub const CSV_HEADER: &str = "Date,Meal,Food Name,Quantity,Calories,Protein (g),Carbs (g),Fat (g)";

/// A food entry with its resolved picture
#[derive(Debug, Serialize)]
pub struct FoodEntryView {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MealView {
    pub slot: MealSlot,
    pub entries: Vec<FoodEntryView>,
    pub totals: Nutrients,
}

/// Everything the diary screen shows for one date
#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub date: NaiveDate,
    pub is_editable: bool,
    pub daily_goal: DailyGoal,
    pub goal_source: GoalSource,
    pub meals: Vec<MealView>,
    pub exercises: Vec<ExerciseEntry>,
    pub totals: DayTotals,
    /// Whether anything was eaten or burned on the date
    pub has_progress: bool,
    pub progress: Progress,
    pub water: WaterDisplay,
    pub steps: StepsSummary,
    /// Latest weight on or before the date, 0 when none was logged
    pub weight_kg: f64,
}

/// Response for log_food and log_exercise
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_slot: Option<MealSlot>,
    pub totals: DayTotals,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct ExercisesResponse {
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseEntry>,
    pub total_calories: f64,
}

#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub water: WaterDisplay,
}

#[derive(Debug, Serialize)]
pub struct ImportDayResponse {
    pub date: NaiveDate,
    pub food_entries: usize,
    pub exercises: usize,
    pub water: i64,
    pub weight_recorded: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportCsvResponse {
    pub rows: usize,
    pub csv: String,
}

/// Totals and remaining calories after a change to a day
fn day_snapshot(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<(DayTotals, i64)> {
    let record = Day::load_record(conn, user_id, date)?;
    let totals = aggregate_day(&record);
    let (goal, _) = resolve_goal(conn, user_id)?;
    Ok((totals, derive_progress(&totals, &goal).remaining))
}

// ============================================================================
// Diary view
// ============================================================================

pub fn get_diary(db: &Database, user_id: &str, date: NaiveDate, today: NaiveDate) -> Result<DiaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let record = Day::load_record(&conn, user_id, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;
    let steps = Day::get_by_date(&conn, user_id, date)
        .map_err(|e| format!("Failed to load day: {}", e))?
        .map(|d| d.steps)
        .unwrap_or(0);
    let (daily_goal, goal_source) = resolve_goal(&conn, user_id)
        .map_err(|e| format!("Failed to get daily goal: {}", e))?;
    let settings = UserSettings::get(&conn, user_id)
        .map_err(|e| format!("Failed to get settings: {}", e))?;
    let history: Vec<WeightEntry> = WeightRecord::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get weight history: {}", e))?
        .iter()
        .map(WeightRecord::to_entry)
        .collect();

    let totals = aggregate_day(&record);
    let progress = derive_progress(&totals, &daily_goal);

    let meals = MealSlot::ALL
        .into_iter()
        .map(|slot| {
            let items = record.slot(slot);
            MealView {
                slot,
                totals: meal_totals(items),
                entries: items
                    .iter()
                    .map(|entry| FoodEntryView {
                        image_url: entry.image_url(),
                        entry: entry.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(DiaryResponse {
        date,
        is_editable: date == today,
        daily_goal,
        goal_source,
        meals,
        exercises: record.exercises,
        has_progress: totals.has_progress(),
        totals,
        progress,
        water: water_display(record.water, settings.water_goal),
        steps: StepsSummary::new(steps, settings.steps_goal),
        weight_kg: weight_for_date(&history, date),
    })
}

// ============================================================================
// Food and exercise
// ============================================================================

pub fn log_food(
    db: &Database,
    user_id: &str,
    date: NaiveDate,
    today: NaiveDate,
    meal_slot: &str,
    entry: FoodEntry,
) -> Result<LogEntryResponse, String> {
    ensure_editable(date, today)?;
    let slot = MealSlot::from_str(meal_slot).ok_or_else(|| {
        format!("Invalid meal slot '{}'. Use breakfast, lunch, dinner or snacks", meal_slot)
    })?;
    if entry.name.trim().is_empty() {
        return Err("Food name is required".to_string());
    }
    let nutrients = [
        ("calories", entry.calories),
        ("p", entry.p),
        ("c", entry.c),
        ("f", entry.f),
        ("fib", entry.fib),
        ("sug", entry.sug),
        ("sod", entry.sod),
    ];
    for (field, value) in nutrients {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(format!("{} must not be negative", field));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let day = Day::get_or_create(&conn, user_id, date)
        .map_err(|e| format!("Failed to create day: {}", e))?;
    let log = FoodLog::create(&conn, day.id, slot, &entry)
        .map_err(|e| format!("Failed to log food: {}", e))?;
    let (totals, remaining) = day_snapshot(&conn, user_id, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;

    tracing::info!(%date, slot = slot.as_str(), name = %entry.name, "food logged");
    Ok(LogEntryResponse {
        id: log.id,
        date,
        meal_slot: Some(slot),
        totals,
        remaining,
    })
}

pub fn log_exercise(
    db: &Database,
    user_id: &str,
    date: NaiveDate,
    today: NaiveDate,
    entry: ExerciseEntry,
) -> Result<LogEntryResponse, String> {
    ensure_editable(date, today)?;
    for (field, value) in [("calories", entry.calories), ("duration_minutes", entry.duration_minutes)] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(format!("{} must not be negative", field));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let day = Day::get_or_create(&conn, user_id, date)
        .map_err(|e| format!("Failed to create day: {}", e))?;
    let log = ExerciseLog::create(&conn, day.id, &entry)
        .map_err(|e| format!("Failed to log exercise: {}", e))?;
    let (totals, remaining) = day_snapshot(&conn, user_id, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;

    tracing::info!(%date, calories = entry.calories_burned(), "exercise logged");
    Ok(LogEntryResponse {
        id: log.id,
        date,
        meal_slot: None,
        totals,
        remaining,
    })
}

pub fn list_exercises(db: &Database, user_id: &str, date: NaiveDate) -> Result<ExercisesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let record = Day::load_record(&conn, user_id, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;

    Ok(ExercisesResponse {
        date,
        total_calories: aggregate_day(&record).exercise_calories,
        exercises: record.exercises,
    })
}

// ============================================================================
// Water
// ============================================================================

fn update_water<F>(db: &Database, user_id: &str, date: NaiveDate, today: NaiveDate, f: F) -> Result<WaterResponse, String>
where
    F: FnOnce(i64) -> i64,
{
    ensure_editable(date, today)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let day = Day::get_or_create(&conn, user_id, date)
        .map_err(|e| format!("Failed to create day: {}", e))?;
    let water = f(day.water).max(0);
    Day::set_water(&conn, day.id, water)
        .map_err(|e| format!("Failed to set water: {}", e))?;
    let settings = UserSettings::get(&conn, user_id)
        .map_err(|e| format!("Failed to get settings: {}", e))?;

    Ok(WaterResponse {
        date,
        water: water_display(water, settings.water_goal),
    })
}

/// Set the water count for a date
pub fn set_water(db: &Database, user_id: &str, date: NaiveDate, today: NaiveDate, water: i64) -> Result<WaterResponse, String> {
    update_water(db, user_id, date, today, |_| water)
}

/// Add (or with a negative delta, remove) water units
pub fn add_water(db: &Database, user_id: &str, date: NaiveDate, today: NaiveDate, delta: i64) -> Result<WaterResponse, String> {
    update_water(db, user_id, date, today, |current| current.saturating_add(delta))
}

// ============================================================================
// Import / export
// ============================================================================

/// Append a cached day record to a date in one transaction
pub fn import_day_record(
    db: &Database,
    user_id: &str,
    date: NaiveDate,
    record: DayRecord,
) -> Result<ImportDayResponse, String> {
    let weight = record.weight.filter(|w| w.is_finite() && *w > 0.0);

    let water = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let day = Day::get_or_create(&tx, user_id, date)?;
            for slot in MealSlot::ALL {
                for entry in record.slot(slot) {
                    FoodLog::create(&tx, day.id, slot, entry)?;
                }
            }
            for entry in &record.exercises {
                ExerciseLog::create(&tx, day.id, entry)?;
            }
            let water = day.water.saturating_add(record.water).max(0);
            Day::set_water(&tx, day.id, water)?;
            if let Some(w) = weight {
                WeightRecord::upsert(&tx, user_id, date, w)?;
            }
            tx.commit()?;
            Ok(water)
        })
        .map_err(|e| format!("Failed to import day: {}", e))?;

    let food_entries = record.all_food_items().count();
    tracing::info!(%date, food_entries, exercises = record.exercises.len(), "day record imported");
    Ok(ImportDayResponse {
        date,
        food_entries,
        exercises: record.exercises.len(),
        water,
        weight_recorded: weight.is_some(),
    })
}

/// `x || 0`: missing, zero and NaN all print as 0
fn csv_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v.to_string(),
        _ => "0".to_string(),
    }
}

fn csv_row(date: NaiveDate, slot: MealSlot, entry: &FoodEntry) -> String {
    format!(
        "{},{},\"{}\",{},{},{},{},{}",
        date,
        slot.as_str(),
        entry.name.replace('"', "\"\""),
        entry.quantity_label.as_deref().unwrap_or(""),
        csv_number(entry.calories),
        csv_number(entry.p),
        csv_number(entry.c),
        csv_number(entry.f),
    )
}

/// Every logged food entry as CSV
pub fn export_food_log_csv(db: &Database, user_id: &str) -> Result<ExportCsvResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let rows = FoodLog::export_rows(&conn, user_id)
        .map_err(|e| format!("Failed to export food log: {}", e))?;

    let mut csv = String::from(CSV_HEADER);
    for row in &rows {
        csv.push('\n');
        csv.push_str(&csv_row(row.date, row.meal_slot, &row.entry));
    }

    Ok(ExportCsvResponse { rows: rows.len(), csv })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::migrated_db;
    use crate::tools::profile::{save_profile, SaveProfileRequest};
    use crate::nutrition::{ActivityLevel, BiometricProfile, Gender, WeightGoal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn food(name: &str, calories: f64) -> FoodEntry {
        FoodEntry {
            name: name.into(),
            calories: Some(calories),
            p: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_diary_shows_zeros_and_default_goal() {
        let db = migrated_db();
        let diary = get_diary(&db, "u1", today(), today()).unwrap();

        assert!(diary.is_editable);
        assert_eq!(diary.goal_source, GoalSource::Default);
        assert_eq!(diary.totals, DayTotals::default());
        assert_eq!(diary.progress.remaining, 2000);
        assert_eq!(diary.progress.progress_fraction, 0.0);
        assert_eq!(diary.meals.len(), 4);
        assert_eq!(diary.water.goal, 8);
        assert_eq!(diary.steps.goal, 10_000);
        assert_eq!(diary.weight_kg, 0.0);
        assert!(!diary.has_progress);
    }

    #[test]
    fn test_log_food_and_exercise_update_remaining() {
        let db = migrated_db();
        log_food(&db, "u1", today(), today(), "breakfast", food("oats", 350.0)).unwrap();
        let res = log_food(&db, "u1", today(), today(), "Snack", food("apple", 95.0)).unwrap();
        assert_eq!(res.meal_slot, Some(MealSlot::Snacks));
        assert_eq!(res.remaining, 2000 - 445);

        let exercise = ExerciseEntry {
            name: Some("Walk".into()),
            duration_minutes: Some(40.0),
            calories: Some(150.0),
        };
        let res = log_exercise(&db, "u1", today(), today(), exercise).unwrap();
        assert_eq!(res.remaining, 2000 - 445 + 150);

        let diary = get_diary(&db, "u1", today(), today()).unwrap();
        assert_eq!(diary.totals.food, 445.0);
        assert_eq!(diary.totals.protein, 20.0);
        assert_eq!(diary.meals[0].totals.calories, 350.0);
        assert_eq!(diary.meals[3].entries[0].entry.name, "apple");

        assert!(diary.has_progress);

        let listed = list_exercises(&db, "u1", today()).unwrap();
        assert_eq!(listed.total_calories, 150.0);
    }

    #[test]
    fn test_diary_uses_profile_goal() {
        let db = migrated_db();
        let request = SaveProfileRequest {
            biometrics: BiometricProfile {
                birth_date: NaiveDate::from_ymd_opt(1996, 1, 1),
                gender: Some(Gender::Male),
                height_cm: Some(180.0),
                weight_kg: Some(80.0),
                activity_level: Some(ActivityLevel::Active),
                goal: Some(WeightGoal::Maintain),
                target_weight_kg: None,
            },
            ..Default::default()
        };
        save_profile(&db, "u1", request, today()).unwrap();
        log_food(&db, "u1", today(), today(), "dinner", food("pasta", 3000.0)).unwrap();

        let diary = get_diary(&db, "u1", today(), today()).unwrap();
        assert_eq!(diary.goal_source, GoalSource::Profile);
        assert_eq!(diary.progress.remaining, 2759 - 3000);
        assert_eq!(diary.progress.progress_fraction, 1.0);
    }

    #[test]
    fn test_past_days_are_read_only() {
        let db = migrated_db();
        let yesterday = today().pred_opt().unwrap();

        assert!(log_food(&db, "u1", yesterday, today(), "lunch", food("soup", 200.0)).is_err());
        assert!(log_exercise(&db, "u1", yesterday, today(), ExerciseEntry::default()).is_err());
        assert!(set_water(&db, "u1", yesterday, today(), 3).is_err());
        assert!(!get_diary(&db, "u1", yesterday, today()).unwrap().is_editable);
    }

    #[test]
    fn test_log_food_validation() {
        let db = migrated_db();
        assert!(log_food(&db, "u1", today(), today(), "brunch", food("eggs", 100.0)).is_err());
        assert!(log_food(&db, "u1", today(), today(), "lunch", food("  ", 100.0)).is_err());

        let negative_protein = FoodEntry { p: Some(-5.0), ..food("tuna", 120.0) };
        let err = log_food(&db, "u1", today(), today(), "lunch", negative_protein).unwrap_err();
        assert!(err.contains("p must not be negative"));
        assert!(log_food(&db, "u1", today(), today(), "lunch", food("soup", f64::NAN)).is_err());
        let infinite_sodium = FoodEntry { sod: Some(f64::INFINITY), ..food("broth", 40.0) };
        assert!(log_food(&db, "u1", today(), today(), "lunch", infinite_sodium).is_err());

        let negative = ExerciseEntry { calories: Some(-10.0), ..Default::default() };
        assert!(log_exercise(&db, "u1", today(), today(), negative).is_err());

        let diary = get_diary(&db, "u1", today(), today()).unwrap();
        assert_eq!(diary.totals, DayTotals::default());
        assert!(!diary.has_progress);
    }

    #[test]
    fn test_water_never_negative() {
        let db = migrated_db();
        assert_eq!(add_water(&db, "u1", today(), today(), 3).unwrap().water.water, 3);
        assert_eq!(add_water(&db, "u1", today(), today(), -5).unwrap().water.water, 0);

        let res = set_water(&db, "u1", today(), today(), 20).unwrap();
        assert_eq!(res.water.filled_drops, 15);
        assert_eq!(res.water.shown_drops, 8);
    }

    #[test]
    fn test_diary_weight_carries_forward() {
        let db = migrated_db();
        db.with_conn(|conn| {
            WeightRecord::upsert(conn, "u1", NaiveDate::from_ymd_opt(2026, 10, 10).unwrap(), 82.0)?;
            WeightRecord::upsert(conn, "u1", NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), 81.0)?;
            Ok(())
        })
        .unwrap();

        let diary = get_diary(&db, "u1", today(), today()).unwrap();
        assert_eq!(diary.weight_kg, 82.0);
    }

    #[test]
    fn test_import_day_record_from_cached_json() {
        let db = migrated_db();
        let yesterday = today().pred_opt().unwrap();
        let record: DayRecord = serde_json::from_str(
            r#"{
                "breakfast": [{"id": 42, "name": "Bread", "quantity": "2 slices", "calories": 160, "p": 6}],
                "snacks": [{"name": "Dates", "calories": 120}],
                "exercises": [{"name": "Run", "calories": 300}],
                "water": 4,
                "weight": 79.5
            }"#,
        )
        .unwrap();

        let res = import_day_record(&db, "u1", yesterday, record).unwrap();
        assert_eq!(res.food_entries, 2);
        assert_eq!(res.exercises, 1);
        assert_eq!(res.water, 4);
        assert!(res.weight_recorded);

        let diary = get_diary(&db, "u1", yesterday, today()).unwrap();
        assert_eq!(diary.totals.food, 280.0);
        assert_eq!(diary.totals.exercise_calories, 300.0);
        assert_eq!(diary.progress.remaining, 2000 - 280 + 300);
        assert_eq!(diary.weight_kg, 79.5);
        assert_eq!(diary.meals[0].entries[0].entry.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_import_huge_water_saturates() {
        let db = migrated_db();
        let yesterday = today().pred_opt().unwrap();
        let first = DayRecord { water: 5, ..Default::default() };
        assert_eq!(import_day_record(&db, "u1", yesterday, first).unwrap().water, 5);

        let huge = DayRecord { water: i64::MAX, ..Default::default() };
        let res = import_day_record(&db, "u1", yesterday, huge).unwrap();
        assert_eq!(res.water, i64::MAX);

        let diary = get_diary(&db, "u1", yesterday, today()).unwrap();
        assert_eq!(diary.water.water, i64::MAX);
    }

    #[test]
    fn test_export_csv() {
        let db = migrated_db();
        let empty = export_food_log_csv(&db, "u1").unwrap();
        assert_eq!(empty.rows, 0);
        assert_eq!(empty.csv, CSV_HEADER);

        let quoted = FoodEntry {
            name: "Pizza \"Margherita\"".into(),
            quantity_label: Some("1 slice".into()),
            calories: Some(285.5),
            p: Some(12.0),
            ..Default::default()
        };
        log_food(&db, "u1", today(), today(), "lunch", quoted).unwrap();
        log_food(&db, "u1", today(), today(), "breakfast", FoodEntry { name: "Tea".into(), ..Default::default() }).unwrap();

        let export = export_food_log_csv(&db, "u1").unwrap();
        let lines: Vec<&str> = export.csv.lines().collect();
        assert_eq!(export.rows, 2);
        assert_eq!(lines[1], "2026-10-19,breakfast,\"Tea\",,0,0,0,0");
        assert_eq!(lines[2], "2026-10-19,lunch,\"Pizza \"\"Margherita\"\"\",1 slice,285.5,12,0,0");
    }
}

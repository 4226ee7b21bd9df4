//! Calora Status Tool
//!
//! Runtime status of the service and the diary usage guide.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Diary usage guide for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Calora Diary Instructions

Calora keeps a calorie diary: a daily calorie goal computed from the user's
profile, food and workouts logged per day, and the calories left for the day.

## Dates

All dates are `YYYY-MM-DD`. Only **today** can be edited: `log_food`,
`log_exercise`, `set_water` and `add_water` reject any other date. Past days
are read with `get_diary`.

## 1. Profile and goal

Call `save_profile` with:
- `birth_date`, `gender` (`male` / `female`), `height_cm`, `weight_kg`
- `activity_level`: `sedentary`, `light`, `active` or `very_active`
- `goal`: `lose`, `maintain` or `gain`
- `target_weight_kg`: required for `lose` and `gain`

The goal uses the Mifflin-St Jeor equation:

| Step | Formula |
|------|---------|
| BMR (male) | 10 x kg + 6.25 x cm - 5 x age + 5 |
| BMR (female) | 10 x kg + 6.25 x cm - 5 x age - 161 |
| TDEE | BMR x activity multiplier (1.2 / 1.375 / 1.55 / 1.725) |
| Goal | TDEE - 500 (lose), + 500 (gain), rounded, at least 1200 |

An incomplete profile gets the default goal of 2000 kcal. Macro goals split
the calories 30% protein, 40% carbs, 30% fat (4 / 4 / 9 kcal per gram).
`get_daily_goal` reports whether the goal came from the profile or the
default.

## 2. Logging food

`log_food` with `meal_slot` (`breakfast`, `lunch`, `dinner`, `snacks`) and
the entry: `name`, optional `quantity` label and nutrients `calories`, `p`
(protein g), `c` (carbs g), `f` (fat g), `fib` (fiber g), `sug` (sugar g),
`sod` (sodium mg). Missing nutrients count as 0.

## 3. Workouts, water, steps, weight

- `log_exercise`: `name`, `duration_minutes`, `calories` burned. Burned
  calories are added back to the remaining budget.
- `set_water` / `add_water`: cups for the day, never below 0.
- `log_steps`: step counter readings; the highest reading of a day is kept.
- `log_weight`: one weight per date; logging again the same day replaces it.

## 4. Reading the diary

`get_diary` returns meals with per-meal totals, day totals, `remaining`
(goal - food + exercise, may be negative), the progress fraction (capped at
1), fiber/sugar/sodium against 30 g / 50 g / 2300 mg, water, steps and the
weight shown for that date.

## 5. Import and export

- `import_day_record` appends a day exported from the mobile app's local
  cache (JSON with `breakfast`, `lunch`, `dinner`, `snacks`, `exercises`,
  `water`, `weight`).
- `export_food_log_csv` returns every food entry as CSV.
"#;

/// Runtime status of the Calora service
#[derive(Debug, Clone, Serialize)]
pub struct CaloraStatus {
    pub version: String,
    pub build_timestamp: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub user_id: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    user_id: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, user_id: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            user_id,
        }
    }

    pub fn get_status(&self) -> CaloraStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        CaloraStatus {
            version: build_info.label(),
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            user_id: self.user_id.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

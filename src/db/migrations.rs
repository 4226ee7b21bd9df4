//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- Biometric inputs and the cached daily goal
        -- ============================================
        CREATE TABLE profiles (
            user_id TEXT PRIMARY KEY,
            first_name TEXT,
            last_name TEXT,
            birth_date TEXT,                     -- ISO date: "1996-10-19"
            gender TEXT,                         -- "male" / "female"
            height_cm REAL,
            weight_kg REAL,
            activity_level TEXT,                 -- sedentary / light / active / very_active
            goal TEXT,                           -- lose / maintain / gain
            target_weight_kg REAL,               -- null when goal = maintain

            -- Cached goal, recomputed on every save
            daily_goal INTEGER,
            protein_goal_g INTEGER,
            carbs_goal_g INTEGER,
            fat_goal_g INTEGER,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DAYS
        -- One row per user per calendar date
        -- ============================================
        CREATE TABLE days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,                  -- ISO date: "2026-10-19"
            water INTEGER NOT NULL DEFAULT 0,    -- logged water units
            steps INTEGER NOT NULL DEFAULT 0,    -- highest step count reported that day
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, date)
        );

        CREATE INDEX idx_days_user_date ON days(user_id, date);

        -- ============================================
        -- FOOD ENTRIES
        -- Append-only; nutrient columns stay NULL when unknown
        -- ============================================
        CREATE TABLE food_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_id INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
            meal_slot TEXT NOT NULL CHECK(meal_slot IN ('breakfast', 'lunch', 'dinner', 'snacks')),
            external_id TEXT,                    -- id from the food search or camera flow
            name TEXT NOT NULL,
            quantity_label TEXT,

            calories REAL,
            protein REAL,                        -- grams
            carbs REAL,                          -- grams
            fat REAL,                            -- grams
            fiber REAL,                          -- grams
            sugar REAL,                          -- grams
            sodium REAL,                         -- milligrams

            image TEXT,
            captured_image_uri TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_entries_day ON food_entries(day_id);

        -- ============================================
        -- EXERCISES
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_id INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
            name TEXT,
            duration_minutes REAL,
            calories REAL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercises_day ON exercises(day_id);

        -- ============================================
        -- WEIGHT HISTORY
        -- At most one entry per user per date
        -- ============================================
        CREATE TABLE weight_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            entry_date TEXT NOT NULL,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            recorded_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, entry_date)
        );

        -- ============================================
        -- USER SETTINGS
        -- ============================================
        CREATE TABLE user_settings (
            user_id TEXT PRIMARY KEY,
            water_goal INTEGER NOT NULL DEFAULT 8,
            steps_goal INTEGER NOT NULL DEFAULT 10000,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

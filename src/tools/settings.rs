//! Water and steps goal tools

use crate::db::Database;
use crate::models::UserSettings;
use crate::nutrition::activity::{MAX_STEPS_GOAL, MAX_WATER_GOAL};

fn check_range(name: &str, value: i64, max: i64) -> Result<(), String> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 1 and {}, got {}", name, max, value))
    }
}

pub fn set_steps_goal(db: &Database, user_id: &str, goal: i64) -> Result<UserSettings, String> {
    check_range("Steps goal", goal, MAX_STEPS_GOAL)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserSettings::set_steps_goal(&conn, user_id, goal)
        .map_err(|e| format!("Failed to save steps goal: {}", e))
}

pub fn set_water_goal(db: &Database, user_id: &str, goal: i64) -> Result<UserSettings, String> {
    check_range("Water goal", goal, MAX_WATER_GOAL)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserSettings::set_water_goal(&conn, user_id, goal)
        .map_err(|e| format!("Failed to save water goal: {}", e))
}

//! Per-user settings: water and steps goals

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::activity::{DEFAULT_STEPS_GOAL, DEFAULT_WATER_GOAL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub water_goal: i64,
    pub steps_goal: i64,
}

impl UserSettings {
    /// Stored settings, or the defaults for a user that never changed them
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT water_goal, steps_goal FROM user_settings WHERE user_id = ?1")?;
        let stored = stmt
            .query_row([user_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let (water_goal, steps_goal) = stored.unwrap_or((DEFAULT_WATER_GOAL, DEFAULT_STEPS_GOAL));
        Ok(Self {
            user_id: user_id.to_string(),
            water_goal,
            steps_goal,
        })
    }

    pub fn set_water_goal(conn: &Connection, user_id: &str, goal: i64) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_settings (user_id, water_goal) VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
                water_goal = excluded.water_goal,
                updated_at = datetime('now')
            "#,
            params![user_id, goal],
        )?;
        Self::get(conn, user_id)
    }

    pub fn set_steps_goal(conn: &Connection, user_id: &str, goal: i64) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_settings (user_id, steps_goal) VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
                steps_goal = excluded.steps_goal,
                updated_at = datetime('now')
            "#,
            params![user_id, goal],
        )?;
        Self::get(conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::migrated_db;

    #[test]
    fn test_defaults_then_independent_updates() {
        let db = migrated_db();
        db.with_conn(|conn| {
            let settings = UserSettings::get(conn, "u1")?;
            assert_eq!(settings.water_goal, 8);
            assert_eq!(settings.steps_goal, 10_000);

            UserSettings::set_steps_goal(conn, "u1", 12_000)?;
            let settings = UserSettings::set_water_goal(conn, "u1", 10)?;
            assert_eq!(settings.water_goal, 10);
            assert_eq!(settings.steps_goal, 12_000);

            assert_eq!(UserSettings::get(conn, "u2")?.water_goal, 8);
            Ok(())
        })
        .unwrap();
    }
}

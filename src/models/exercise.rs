//! Exercise model
//!
//! Logged workouts. Calories burned are whatever the caller reported.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::ExerciseEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: i64,
    pub day_id: i64,
    pub entry: ExerciseEntry,
    pub created_at: String,
}

impl ExerciseLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            day_id: row.get("day_id")?,
            entry: ExerciseEntry {
                name: row.get("name")?,
                duration_minutes: row.get("duration_minutes")?,
                calories: row.get("calories")?,
            },
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, day_id: i64, entry: &ExerciseEntry) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO exercises (day_id, name, duration_minutes, calories) VALUES (?1, ?2, ?3, ?4)",
            params![day_id, entry.name, entry.duration_minutes, entry.calories],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;
        stmt.query_row([id], Self::from_row).map_err(DbError::from)
    }

    pub fn list_for_day(conn: &Connection, day_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE day_id = ?1 ORDER BY id")?;
        let logs = stmt
            .query_map([day_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::test_support::migrated_db;
    use crate::models::Day;

    fn workout(name: &str, calories: f64) -> ExerciseEntry {
        ExerciseEntry {
            name: Some(name.into()),
            duration_minutes: Some(30.0),
            calories: Some(calories),
        }
    }

    #[test]
    fn test_create_and_list() {
        let db = migrated_db();
        db.with_conn(|conn| {
            let day = Day::get_or_create(conn, "u1", NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())?;
            let log = ExerciseLog::create(conn, day.id, &workout("Cycling", 240.0))?;
            assert_eq!(log.entry.calories_burned(), 240.0);

            ExerciseLog::create(conn, day.id, &ExerciseEntry::default())?;
            let logs = ExerciseLog::list_for_day(conn, day.id)?;
            assert_eq!(logs.len(), 2);
            assert_eq!(logs[1].entry.calories_burned(), 0.0);
            Ok(())
        })
        .unwrap();
    }
}

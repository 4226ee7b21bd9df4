//! Day model
//!
//! One row per user and calendar date. Food and exercise rows hang off it;
//! water and steps live on the row itself.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::DayRecord;
use super::{parse_date_column, ExerciseLog, FoodLog, WeightRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,
    pub water: i64,
    pub steps: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Day {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date: String = row.get("date")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: parse_date_column(2, &date)?,
            water: row.get("water")?,
            steps: row.get("steps")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM days WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row).optional()?)
    }

    pub fn get_by_date(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM days WHERE user_id = ?1 AND date = ?2")?;
        Ok(stmt
            .query_row(params![user_id, date.to_string()], Self::from_row)
            .optional()?)
    }

    pub fn get_or_create(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO days (user_id, date) VALUES (?1, ?2)",
            params![user_id, date.to_string()],
        )?;

        Self::get_by_date(conn, user_id, date)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Set the water count; negative values are stored as 0
    pub fn set_water(conn: &Connection, id: i64, water: i64) -> DbResult<()> {
        conn.execute(
            "UPDATE days SET water = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![water.max(0), id],
        )?;
        Ok(())
    }

    /// Record a step reading. Readings are cumulative, so the highest one wins.
    pub fn record_steps(conn: &Connection, id: i64, steps: i64) -> DbResult<()> {
        conn.execute(
            "UPDATE days SET steps = MAX(steps, ?1), updated_at = datetime('now') WHERE id = ?2",
            params![steps.max(0), id],
        )?;
        Ok(())
    }

    /// Step counts per date within an inclusive range
    pub fn list_steps(
        conn: &Connection,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<(NaiveDate, i64)>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT date, steps FROM days
            WHERE user_id = ?1 AND date >= ?2 AND date <= ?3 AND steps > 0
            ORDER BY date
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id, start.to_string(), end.to_string()], |row| {
                let date: String = row.get(0)?;
                Ok((parse_date_column(0, &date)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Assemble the full record for a date. A date with nothing stored is the
    /// empty record.
    pub fn load_record(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<DayRecord> {
        let mut record = DayRecord {
            weight: WeightRecord::get_on(conn, user_id, date)?.map(|w| w.weight_kg),
            ..DayRecord::default()
        };

        let Some(day) = Self::get_by_date(conn, user_id, date)? else {
            return Ok(record);
        };

        record.water = day.water;
        for log in FoodLog::list_for_day(conn, day.id)? {
            record.slot_mut(log.meal_slot).push(log.entry);
        }
        record.exercises = ExerciseLog::list_for_day(conn, day.id)?
            .into_iter()
            .map(|log| log.entry)
            .collect();

        Ok(record)
    }
}

//! Weight history model

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::WeightEntry;
use super::parse_date_column;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: i64,
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub weight_kg: f64,
    pub recorded_at: String,
}

impl WeightRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let entry_date: String = row.get("entry_date")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            entry_date: parse_date_column(2, &entry_date)?,
            weight_kg: row.get("weight_kg")?,
            recorded_at: row.get("recorded_at")?,
        })
    }

    /// Record the weight for a date, replacing any earlier reading that day
    pub fn upsert(conn: &Connection, user_id: &str, date: NaiveDate, weight_kg: f64) -> DbResult<Self> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(DbError::Invalid(format!("weight must be positive, got {}", weight_kg)));
        }

        conn.execute(
            r#"
            INSERT INTO weight_history (user_id, entry_date, weight_kg)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, entry_date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                recorded_at = datetime('now')
            "#,
            params![user_id, date.to_string(), weight_kg],
        )?;

        Self::get_on(conn, user_id, date)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_on(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weight_history WHERE user_id = ?1 AND entry_date = ?2")?;
        Ok(stmt
            .query_row(params![user_id, date.to_string()], Self::from_row)
            .optional()?)
    }

    /// Full history, oldest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weight_history WHERE user_id = ?1 ORDER BY entry_date")?;
        let records = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn to_entry(&self) -> WeightEntry {
        WeightEntry {
            date: self.entry_date,
            weight_kg: self.weight_kg,
        }
    }
}

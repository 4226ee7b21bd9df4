//! Food log model
//!
//! Logged food items. Entries are append-only: there is no update.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{FoodEntry, MealSlot};
use super::parse_date_column;

/// Orders rows breakfast, lunch, dinner, snacks
const SLOT_ORDER_SQL: &str = "CASE fe.meal_slot
    WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 WHEN 'dinner' THEN 2 ELSE 3 END";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: i64,
    pub day_id: i64,
    pub meal_slot: MealSlot,
    pub entry: FoodEntry,
    pub created_at: String,
}

/// One line of the food diary export
#[derive(Debug, Clone, Serialize)]
pub struct FoodLogExportRow {
    pub date: NaiveDate,
    pub meal_slot: MealSlot,
    pub entry: FoodEntry,
}

impl FoodLog {
    fn entry_from_row(row: &Row) -> rusqlite::Result<FoodEntry> {
        Ok(FoodEntry {
            id: row.get("external_id")?,
            name: row.get("name")?,
            quantity_label: row.get("quantity_label")?,
            calories: row.get("calories")?,
            p: row.get("protein")?,
            c: row.get("carbs")?,
            f: row.get("fat")?,
            fib: row.get("fiber")?,
            sug: row.get("sugar")?,
            sod: row.get("sodium")?,
            image: row.get("image")?,
            captured_image_uri: row.get("captured_image_uri")?,
        })
    }

    fn slot_from_row(row: &Row) -> rusqlite::Result<MealSlot> {
        let slot: String = row.get("meal_slot")?;
        MealSlot::from_str(&slot).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(0, format!("meal_slot '{}'", slot), rusqlite::types::Type::Text)
        })
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            day_id: row.get("day_id")?,
            meal_slot: Self::slot_from_row(row)?,
            entry: Self::entry_from_row(row)?,
            created_at: row.get("created_at")?,
        })
    }

    /// Append an entry to a meal slot
    pub fn create(conn: &Connection, day_id: i64, slot: MealSlot, entry: &FoodEntry) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_entries (
                day_id, meal_slot, external_id, name, quantity_label,
                calories, protein, carbs, fat, fiber, sugar, sodium,
                image, captured_image_uri
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                day_id,
                slot.as_str(),
                entry.id,
                entry.name,
                entry.quantity_label,
                entry.calories,
                entry.p,
                entry.c,
                entry.f,
                entry.fib,
                entry.sug,
                entry.sod,
                entry.image,
                entry.captured_image_uri,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row).optional()?)
    }

    /// Entries of a day in insertion order
    pub fn list_for_day(conn: &Connection, day_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE day_id = ?1 ORDER BY id")?;
        let entries = stmt
            .query_map([day_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Every logged entry of a user, by date then meal slot then insertion
    pub fn export_rows(conn: &Connection, user_id: &str) -> DbResult<Vec<FoodLogExportRow>> {
        let sql = format!(
            r#"
            SELECT d.date AS date, fe.* FROM food_entries fe
            JOIN days d ON d.id = fe.day_id
            WHERE d.user_id = ?1
            ORDER BY d.date, {}, fe.id
            "#,
            SLOT_ORDER_SQL
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([user_id], |row| {
                let date: String = row.get("date")?;
                Ok(FoodLogExportRow {
                    date: parse_date_column(0, &date)?,
                    meal_slot: Self::slot_from_row(row)?,
                    entry: Self::entry_from_row(row)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

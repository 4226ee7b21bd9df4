//! Weight history tools

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::WeightRecord;
use crate::nutrition::WeightSummary;

#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub date: NaiveDate,
    pub weight_kg: f64,
    /// True when an earlier reading for the same date was replaced
    pub replaced: bool,
}

/// Record a weight; a second reading on the same date replaces the first
pub fn log_weight(db: &Database, user_id: &str, date: NaiveDate, weight_kg: f64) -> Result<LogWeightResponse, String> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err("Please enter a valid weight (kg, greater than 0)".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let replaced = WeightRecord::get_on(&conn, user_id, date)
        .map_err(|e| format!("Failed to check weight: {}", e))?
        .is_some();
    let record = WeightRecord::upsert(&conn, user_id, date, weight_kg)
        .map_err(|e| format!("Failed to save weight: {}", e))?;

    tracing::info!(%date, weight_kg, replaced, "weight logged");
    Ok(LogWeightResponse {
        date: record.entry_date,
        weight_kg: record.weight_kg,
        replaced,
    })
}

pub fn get_weight_history(db: &Database, user_id: &str) -> Result<WeightSummary, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let records = WeightRecord::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get weight history: {}", e))?;
    Ok(WeightSummary::from_history(records.iter().map(WeightRecord::to_entry).collect()))
}

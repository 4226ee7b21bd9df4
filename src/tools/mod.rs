//! Calora tools module
//!
//! Tool implementations behind the MCP server. Each tool takes one pooled
//! connection and returns `Result<_, String>` with a readable message.

pub mod diary;
pub mod profile;
pub mod settings;
pub mod status;
pub mod steps;
pub mod weight;

use chrono::NaiveDate;

use crate::models::DATE_FORMAT;

/// Parse a `YYYY-MM-DD` tool argument
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Only today's diary can be changed
pub fn ensure_editable(date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if date == today {
        Ok(())
    } else {
        Err(format!("Day {} is read-only; only today ({}) can be edited", date, today))
    }
}

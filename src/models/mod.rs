//! Data models
//!
//! Rust structs representing database entities.

mod day;
mod exercise;
mod food_entry;
mod profile;
mod settings;
mod weight;

pub use day::Day;
pub use exercise::ExerciseLog;
pub use food_entry::{FoodLog, FoodLogExportRow};
pub use profile::{Profile, ProfileSave};
pub use settings::UserSettings;
pub use weight::WeightRecord;

use chrono::NaiveDate;
use rusqlite::types::Type;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored ISO date column
pub(crate) fn parse_date_column(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::{migrations, Database};

    pub fn migrated_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db
    }
}

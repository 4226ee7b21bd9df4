//! Step counter tools

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Day, UserSettings};
use crate::nutrition::{steps_report, StepsPeriod, StepsReport, StepsSummary};

/// Longest window a report covers
const REPORT_WINDOW_DAYS: i64 = 28;

#[derive(Debug, Serialize)]
pub struct LogStepsResponse {
    pub date: NaiveDate,
    /// Stored count; a lower reading never replaces a higher one
    pub steps: i64,
}

#[derive(Debug, Serialize)]
pub struct StepsReportResponse {
    pub today: StepsSummary,
    pub report: StepsReport,
}

pub fn log_steps(db: &Database, user_id: &str, date: NaiveDate, steps: i64) -> Result<LogStepsResponse, String> {
    if steps < 0 {
        return Err(format!("Steps must not be negative, got {}", steps));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let day = Day::get_or_create(&conn, user_id, date)
        .map_err(|e| format!("Failed to create day: {}", e))?;
    Day::record_steps(&conn, day.id, steps)
        .map_err(|e| format!("Failed to record steps: {}", e))?;
    let stored = Day::get_by_id(&conn, day.id)
        .map_err(|e| format!("Failed to load day: {}", e))?
        .map(|d| d.steps)
        .unwrap_or(steps);

    tracing::debug!(%date, steps, stored, "steps recorded");
    Ok(LogStepsResponse { date, steps: stored })
}

pub fn get_steps_report(db: &Database, user_id: &str, today: NaiveDate, period: &str) -> Result<StepsReportResponse, String> {
    let period = StepsPeriod::from_str(period)
        .ok_or_else(|| format!("Invalid period '{}'. Use week or month", period))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let start = today - Duration::days(REPORT_WINDOW_DAYS - 1);
    let samples = Day::list_steps(&conn, user_id, start, today)
        .map_err(|e| format!("Failed to get steps: {}", e))?;
    let settings = UserSettings::get(&conn, user_id)
        .map_err(|e| format!("Failed to get settings: {}", e))?;

    let today_steps = samples
        .iter()
        .find(|(date, _)| *date == today)
        .map(|(_, steps)| *steps)
        .unwrap_or(0);

    Ok(StepsReportResponse {
        today: StepsSummary::new(today_steps, settings.steps_goal),
        report: steps_report(&samples, today, period),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::migrated_db;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_log_steps_keeps_highest_reading() {
        let db = migrated_db();
        assert_eq!(log_steps(&db, "u1", date(19), 6000).unwrap().steps, 6000);
        assert_eq!(log_steps(&db, "u1", date(19), 4000).unwrap().steps, 6000);
        assert!(log_steps(&db, "u1", date(19), -1).is_err());
    }

    #[test]
    fn test_week_report_with_today_summary() {
        let db = migrated_db();
        log_steps(&db, "u1", date(19), 10_000).unwrap();
        log_steps(&db, "u1", date(15), 4_000).unwrap();
        log_steps(&db, "u1", date(1), 50_000).unwrap();

        let res = get_steps_report(&db, "u1", date(19), "week").unwrap();
        assert_eq!(res.today.steps, 10_000);
        assert_eq!(res.today.distance_km, 7.62);
        assert_eq!(res.today.calories, 400);
        assert_eq!(res.report.total, 14_000);
        assert_eq!(res.report.buckets.len(), 7);
    }

    #[test]
    fn test_month_report_and_bad_period() {
        let db = migrated_db();
        log_steps(&db, "u1", date(1), 2_800).unwrap();

        let res = get_steps_report(&db, "u1", date(19), "month").unwrap();
        assert_eq!(res.report.total, 2_800);
        assert_eq!(res.report.buckets.len(), 4);
        assert_eq!(res.today.steps, 0);

        assert!(get_steps_report(&db, "u1", date(19), "year").is_err());
    }
}

//! Steps and water
//!
//! Step counts come from the device as plain numbers; distance and burned
//! calories are fixed per-step estimates.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::round_half_up;

pub const STEP_LENGTH_KM: f64 = 0.000762;
pub const CALORIES_PER_STEP: f64 = 0.04;
pub const DEFAULT_STEPS_GOAL: i64 = 10_000;
pub const MAX_STEPS_GOAL: i64 = 100_000;

pub const DEFAULT_WATER_GOAL: i64 = 8;
pub const MAX_WATER_GOAL: i64 = 50;
const DISPLAY_DROPS: i64 = 15;

const DAYS_PER_WEEK: i64 = 7;
const WEEKS_PER_MONTH: i64 = 4;

/// Today's steps against the goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsSummary {
    pub steps: i64,
    pub goal: i64,
    pub distance_km: f64,
    pub calories: i64,
    /// Not capped; the caller decides how to draw values past 1
    pub progress: f64,
}

impl StepsSummary {
    pub fn new(steps: i64, goal: i64) -> Self {
        let distance_km = (steps as f64 * STEP_LENGTH_KM * 100.0).round() / 100.0;
        let progress = if goal > 0 { steps as f64 / goal as f64 } else { 0.0 };
        Self {
            steps,
            goal,
            distance_km,
            calories: round_half_up(steps as f64 * CALORIES_PER_STEP) as i64,
            progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepsPeriod {
    Week,
    Month,
}

impl StepsPeriod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Some(StepsPeriod::Week),
            "month" => Some(StepsPeriod::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsBucket {
    pub label: String,
    pub steps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsReport {
    pub period: StepsPeriod,
    /// Oldest first
    pub buckets: Vec<StepsBucket>,
    pub total: i64,
    pub daily_average: i64,
    pub best: i64,
}

/// Highest sample per date; repeated readings of one day are cumulative counts
fn max_per_day(samples: &[(NaiveDate, i64)]) -> BTreeMap<NaiveDate, i64> {
    let mut by_day = BTreeMap::new();
    for (date, steps) in samples {
        let entry = by_day.entry(*date).or_insert(*steps);
        if *steps > *entry {
            *entry = *steps;
        }
    }
    by_day
}

/// Week: the last seven days, one bucket each. Month: the last 28 days in four
/// weekly buckets, averaged over 28 days.
pub fn steps_report(samples: &[(NaiveDate, i64)], today: NaiveDate, period: StepsPeriod) -> StepsReport {
    let by_day = max_per_day(samples);
    let steps_on = |days_back: i64| -> (NaiveDate, i64) {
        let date = today - Duration::days(days_back);
        (date, by_day.get(&date).copied().unwrap_or(0))
    };

    let (buckets, divisor) = match period {
        StepsPeriod::Week => {
            let buckets: Vec<StepsBucket> = (0..DAYS_PER_WEEK)
                .rev()
                .map(|back| {
                    let (date, steps) = steps_on(back);
                    StepsBucket { label: date.format("%a").to_string(), steps }
                })
                .collect();
            let len = buckets.len() as i64;
            (buckets, len)
        }
        StepsPeriod::Month => {
            let buckets = (0..WEEKS_PER_MONTH)
                .rev()
                .map(|week| {
                    let steps = (0..DAYS_PER_WEEK)
                        .map(|d| steps_on(week * DAYS_PER_WEEK + d).1)
                        .sum();
                    StepsBucket { label: format!("Week {}", WEEKS_PER_MONTH - week), steps }
                })
                .collect();
            (buckets, WEEKS_PER_MONTH * DAYS_PER_WEEK)
        }
    };

    let total: i64 = buckets.iter().map(|b| b.steps).sum();
    let daily_average = if divisor > 0 {
        round_half_up(total as f64 / divisor as f64) as i64
    } else {
        0
    };
    let best = buckets.iter().map(|b| b.steps).max().unwrap_or(0);

    StepsReport {
        period,
        buckets,
        total,
        daily_average,
        best,
    }
}

/// Water intake as drawn on the diary card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterDisplay {
    pub water: i64,
    pub goal: i64,
    pub filled_drops: i64,
    pub shown_drops: i64,
    pub progress: f64,
}

pub fn water_display(water: i64, goal: i64) -> WaterDisplay {
    let shown_drops = if goal > 0 { goal.min(DISPLAY_DROPS) } else { DISPLAY_DROPS };
    WaterDisplay {
        water,
        goal,
        filled_drops: water.min(DISPLAY_DROPS),
        shown_drops,
        progress: if goal > 0 { water as f64 / goal as f64 } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_steps_summary() {
        let s = StepsSummary::new(10_000, DEFAULT_STEPS_GOAL);
        assert_eq!(s.distance_km, 7.62);
        assert_eq!(s.calories, 400);
        assert_eq!(s.progress, 1.0);

        let over = StepsSummary::new(15_000, 10_000);
        assert_eq!(over.progress, 1.5);

        assert_eq!(StepsSummary::new(500, 0).progress, 0.0);
    }

    #[test]
    fn test_week_report() {
        let today = date(2026, 10, 19);
        let samples = vec![
            (today, 3000),
            (today, 5000), // later reading of the same day
            (date(2026, 10, 18), 8000),
            (date(2026, 10, 13), 1000),
            (date(2026, 10, 12), 99_999), // outside the window
        ];
        let report = steps_report(&samples, today, StepsPeriod::Week);

        assert_eq!(report.buckets.len(), 7);
        assert_eq!(report.buckets[0].steps, 1000);
        assert_eq!(report.buckets[0].label, "Tue");
        assert_eq!(report.buckets[6].steps, 5000);
        assert_eq!(report.buckets[6].label, "Mon");
        assert_eq!(report.total, 14_000);
        assert_eq!(report.daily_average, 2000);
        assert_eq!(report.best, 8000);
    }

    #[test]
    fn test_month_report() {
        let today = date(2026, 10, 19);
        let samples = vec![
            (today, 7000),
            (date(2026, 10, 13), 7000), // 6 days back, still week 4
            (date(2026, 10, 12), 2800), // 7 days back, week 3
            (date(2026, 9, 22), 1400), // 27 days back, week 1
            (date(2026, 9, 21), 50_000), // 28 days back, outside
        ];
        let report = steps_report(&samples, today, StepsPeriod::Month);

        let labels: Vec<&str> = report.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
        let steps: Vec<i64> = report.buckets.iter().map(|b| b.steps).collect();
        assert_eq!(steps, vec![1400, 0, 2800, 14_000]);
        assert_eq!(report.total, 18_200);
        assert_eq!(report.daily_average, 650);
        assert_eq!(report.best, 14_000);
    }

    #[test]
    fn test_empty_report() {
        let report = steps_report(&[], date(2026, 1, 1), StepsPeriod::Week);
        assert_eq!(report.total, 0);
        assert_eq!(report.best, 0);
        assert_eq!(report.daily_average, 0);
    }

    #[test]
    fn test_water_display() {
        let w = water_display(3, DEFAULT_WATER_GOAL);
        assert_eq!(w.filled_drops, 3);
        assert_eq!(w.shown_drops, 8);
        assert_eq!(w.progress, 0.375);

        let big = water_display(20, 30);
        assert_eq!(big.filled_drops, 15);
        assert_eq!(big.shown_drops, 15);

        assert_eq!(water_display(1, 0).shown_drops, 15);
    }
}

//! Weight history summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Points kept for the trend chart
const CHART_POINTS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSummary {
    /// Latest entry, 0 when there is no history
    pub current_kg: f64,
    /// Earliest entry, 0 when there is no history
    pub start_kg: f64,
    /// current - start, 0 with fewer than two entries
    pub change_kg: f64,
    pub chart: Vec<WeightEntry>,
    pub entries: Vec<WeightEntry>,
}

impl WeightSummary {
    pub fn from_history(mut entries: Vec<WeightEntry>) -> Self {
        entries.sort_by_key(|e| e.date);

        let current_kg = entries.last().map(|e| e.weight_kg).unwrap_or(0.0);
        let start_kg = entries.first().map(|e| e.weight_kg).unwrap_or(0.0);
        let change_kg = if entries.len() > 1 { current_kg - start_kg } else { 0.0 };
        let chart = entries[entries.len().saturating_sub(CHART_POINTS)..].to_vec();

        Self {
            current_kg,
            start_kg,
            change_kg,
            chart,
            entries,
        }
    }
}

/// Weight to show on a given diary date: the latest entry on or before it
pub fn weight_for_date(entries: &[WeightEntry], date: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|e| e.date <= date)
        .max_by_key(|e| e.date)
        .map(|e| e.weight_kg)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(d: u32, weight_kg: f64) -> WeightEntry {
        WeightEntry {
            date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
            weight_kg,
        }
    }

    #[test]
    fn test_summary_sorts_and_diffs() {
        let summary = WeightSummary::from_history(vec![entry(10, 79.0), entry(1, 82.5), entry(5, 80.0)]);
        assert_eq!(summary.start_kg, 82.5);
        assert_eq!(summary.current_kg, 79.0);
        assert_eq!(summary.change_kg, -3.5);
        assert_eq!(summary.entries[0].date.to_string(), "2026-10-01");
    }

    #[test]
    fn test_single_entry_has_no_change() {
        let summary = WeightSummary::from_history(vec![entry(3, 70.0)]);
        assert_eq!(summary.change_kg, 0.0);
        assert_eq!(summary.current_kg, 70.0);
    }

    #[test]
    fn test_empty_history() {
        let summary = WeightSummary::from_history(Vec::new());
        assert_eq!(summary.current_kg, 0.0);
        assert!(summary.chart.is_empty());
    }

    #[test]
    fn test_chart_keeps_last_seven() {
        let history: Vec<WeightEntry> = (1..=10).map(|d| entry(d, 80.0 - d as f64 * 0.1)).collect();
        let summary = WeightSummary::from_history(history);
        assert_eq!(summary.chart.len(), 7);
        assert_eq!(summary.chart[0].date.to_string(), "2026-10-04");
    }

    #[test]
    fn test_weight_for_date() {
        let history = vec![entry(1, 82.0), entry(8, 81.0), entry(15, 80.0)];
        let on = |d| weight_for_date(&history, NaiveDate::from_ymd_opt(2026, 10, d).unwrap());
        assert_eq!(on(10), 81.0);
        assert_eq!(on(15), 80.0);
        assert_eq!(weight_for_date(&history, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()), 0.0);
    }
}

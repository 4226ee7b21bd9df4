//! Energy accounting engine
//!
//! Pure calculations behind the diary: calorie goal, macro split, day
//! aggregation and progress. Nothing in here touches the database or the clock;
//! callers pass `today` explicitly.

pub mod activity;
pub mod day;
pub mod goal;
pub mod macros;
pub mod nutrients;
pub mod progress;
pub mod weight;

pub use activity::{steps_report, water_display, StepsPeriod, StepsReport, StepsSummary, WaterDisplay};
pub use day::{aggregate_day, meal_totals, DayRecord, DayTotals, ExerciseEntry, FoodEntry, MealSlot};
pub use goal::{
    age_in_years, compute_daily_calorie_goal, energy_breakdown, ActivityLevel, BiometricProfile,
    EnergyBreakdown, Gender, WeightGoal, DEFAULT_DAILY_CALORIE_GOAL, MIN_DAILY_CALORIE_GOAL,
};
pub use macros::{compute_macro_goals, DailyGoal, MacroGoals};
pub use nutrients::Nutrients;
pub use progress::{derive_progress, Nutrient, NutrientProgress, NutrientStatus, Progress};
pub use weight::{weight_for_date, WeightEntry, WeightSummary};

/// Round half towards positive infinity.
///
/// Differs from `f64::round` only on negative halves: `-200.5` becomes `-200`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-200.5), -200.0);
        assert_eq!(round_half_up(-200.6), -201.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }
}

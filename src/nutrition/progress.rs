//! Remaining calories and per-nutrient progress for a day
//!
//! Exercise calories are added back to the budget: burning more allows eating
//! more. The remaining value is never clamped and goes negative once the
//! budget is exceeded; only the ring fraction is capped at 1.

use serde::Serialize;

use super::{round_half_up, DailyGoal, DayTotals};

pub const FIBER_GOAL_G: f64 = 30.0;
pub const SUGAR_LIMIT_G: f64 = 50.0;
pub const SODIUM_LIMIT_MG: f64 = 2300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
    Sodium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Sodium,
    ];

    /// Sugar and sodium goals are ceilings rather than targets
    pub fn is_limit(&self) -> bool {
        matches!(self, Nutrient::Sugar | Nutrient::Sodium)
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Sodium => "mg",
            _ => "g",
        }
    }

    fn consumed(&self, totals: &DayTotals) -> f64 {
        match self {
            Nutrient::Protein => totals.protein,
            Nutrient::Carbs => totals.carbs,
            Nutrient::Fat => totals.fat,
            Nutrient::Fiber => totals.fiber,
            Nutrient::Sugar => totals.sugar,
            Nutrient::Sodium => totals.sodium,
        }
    }

    fn goal(&self, goal: &DailyGoal) -> f64 {
        match self {
            Nutrient::Protein => goal.macro_goals.protein_g as f64,
            Nutrient::Carbs => goal.macro_goals.carbs_g as f64,
            Nutrient::Fat => goal.macro_goals.fat_g as f64,
            Nutrient::Fiber => FIBER_GOAL_G,
            Nutrient::Sugar => SUGAR_LIMIT_G,
            Nutrient::Sodium => SODIUM_LIMIT_MG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientStatus {
    pub nutrient: Nutrient,
    pub consumed: f64,
    pub goal: f64,
    pub is_limit: bool,
}

impl NutrientStatus {
    /// Bar fill, capped at 1
    pub fn fraction(&self) -> f64 {
        if self.goal > 0.0 {
            (self.consumed / self.goal).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// A limit nutrient consumed past its ceiling
    pub fn is_over_limit(&self) -> bool {
        self.is_limit && self.consumed > self.goal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientProgress {
    pub protein: NutrientStatus,
    pub carbs: NutrientStatus,
    pub fat: NutrientStatus,
    pub fiber: NutrientStatus,
    pub sugar: NutrientStatus,
    pub sodium: NutrientStatus,
}

impl NutrientProgress {
    pub fn get(&self, nutrient: Nutrient) -> &NutrientStatus {
        match nutrient {
            Nutrient::Protein => &self.protein,
            Nutrient::Carbs => &self.carbs,
            Nutrient::Fat => &self.fat,
            Nutrient::Fiber => &self.fiber,
            Nutrient::Sugar => &self.sugar,
            Nutrient::Sodium => &self.sodium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub remaining: i64,
    pub progress_fraction: f64,
    pub nutrient_progress: NutrientProgress,
}

fn status(nutrient: Nutrient, totals: &DayTotals, goal: &DailyGoal) -> NutrientStatus {
    NutrientStatus {
        nutrient,
        consumed: nutrient.consumed(totals),
        goal: nutrient.goal(goal),
        is_limit: nutrient.is_limit(),
    }
}

pub fn derive_progress(totals: &DayTotals, goal: &DailyGoal) -> Progress {
    let daily = goal.daily_calorie_goal as f64;
    let remaining = round_half_up(daily - totals.food + totals.exercise_calories) as i64;
    let progress_fraction = if goal.daily_calorie_goal > 0 {
        (totals.food / daily).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Progress {
        remaining,
        progress_fraction,
        nutrient_progress: NutrientProgress {
            protein: status(Nutrient::Protein, totals, goal),
            carbs: status(Nutrient::Carbs, totals, goal),
            fat: status(Nutrient::Fat, totals, goal),
            fiber: status(Nutrient::Fiber, totals, goal),
            sugar: status(Nutrient::Sugar, totals, goal),
            sodium: status(Nutrient::Sodium, totals, goal),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(food: f64, exercise_calories: f64) -> DayTotals {
        DayTotals { food, exercise_calories, ..Default::default() }
    }

    #[test]
    fn test_remaining_goes_negative() {
        let p = derive_progress(&totals(2500.0, 300.0), &DailyGoal::from_calorie_goal(2000));
        assert_eq!(p.remaining, -200);
    }

    #[test]
    fn test_fraction_caps_at_one() {
        let p = derive_progress(&totals(2500.0, 0.0), &DailyGoal::from_calorie_goal(2000));
        assert_eq!(p.progress_fraction, 1.0);
        assert_eq!(p.remaining, -500);
    }

    #[test]
    fn test_partial_day() {
        let p = derive_progress(&totals(500.0, 120.4), &DailyGoal::from_calorie_goal(2000));
        assert_eq!(p.progress_fraction, 0.25);
        assert_eq!(p.remaining, 1620);
    }

    #[test]
    fn test_negative_half_rounds_up() {
        let p = derive_progress(&totals(2200.5, 0.0), &DailyGoal::from_calorie_goal(2000));
        assert_eq!(p.remaining, -200);
    }

    #[test]
    fn test_zero_goal_gives_zero_fraction() {
        let p = derive_progress(&totals(100.0, 0.0), &DailyGoal::from_calorie_goal(0));
        assert_eq!(p.progress_fraction, 0.0);
        assert_eq!(p.remaining, -100);
    }

    #[test]
    fn test_nutrient_goals_and_limits() {
        let day = DayTotals {
            protein: 90.0,
            sugar: 62.0,
            sodium: 1200.0,
            fiber: 45.0,
            ..Default::default()
        };
        let p = derive_progress(&day, &DailyGoal::from_calorie_goal(2000));
        let n = p.nutrient_progress;

        assert_eq!(n.protein.goal, 150.0);
        assert_eq!(n.carbs.goal, 200.0);
        assert_eq!(n.fat.goal, 67.0);
        assert_eq!(n.fiber.goal, 30.0);
        assert_eq!(n.sugar.goal, 50.0);
        assert_eq!(n.sodium.goal, 2300.0);

        assert!(n.sugar.is_limit && n.sodium.is_limit);
        assert!(!n.protein.is_limit && !n.fiber.is_limit);

        assert!(n.sugar.is_over_limit());
        assert!(!n.sodium.is_over_limit());
        // Exceeding a target is not flagged
        assert!(!n.fiber.is_over_limit());
        assert_eq!(n.fiber.fraction(), 1.0);
        assert_eq!(n.protein.fraction(), 0.6);
    }

    #[test]
    fn test_nutrient_lookup() {
        let p = derive_progress(&DayTotals::default(), &DailyGoal::default());
        for nutrient in Nutrient::ALL {
            assert_eq!(p.nutrient_progress.get(nutrient).nutrient, nutrient);
        }
        assert_eq!(Nutrient::Sodium.unit(), "mg");
    }
}

//! Macro-nutrient goals derived from the calorie goal

use serde::{Deserialize, Serialize};

use super::goal::DEFAULT_DAILY_CALORIE_GOAL;
use super::round_half_up;

// Share of total calories
const PROTEIN_SHARE: f64 = 0.30;
const CARBS_SHARE: f64 = 0.40;
const FAT_SHARE: f64 = 0.30;

// kcal per gram
const PROTEIN_KCAL_PER_G: f64 = 4.0;
const CARBS_KCAL_PER_G: f64 = 4.0;
const FAT_KCAL_PER_G: f64 = 9.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

fn grams(daily_calorie_goal: i64, share: f64, kcal_per_g: f64) -> i64 {
    round_half_up(daily_calorie_goal as f64 * share / kcal_per_g) as i64
}

/// Fixed 30/40/30 protein/carbs/fat split. Zero or negative input is not guarded.
pub fn compute_macro_goals(daily_calorie_goal: i64) -> MacroGoals {
    MacroGoals {
        protein_g: grams(daily_calorie_goal, PROTEIN_SHARE, PROTEIN_KCAL_PER_G),
        carbs_g: grams(daily_calorie_goal, CARBS_SHARE, CARBS_KCAL_PER_G),
        fat_g: grams(daily_calorie_goal, FAT_SHARE, FAT_KCAL_PER_G),
    }
}

/// A calorie goal together with its macro goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub daily_calorie_goal: i64,
    pub macro_goals: MacroGoals,
}

impl DailyGoal {
    pub fn from_calorie_goal(daily_calorie_goal: i64) -> Self {
        Self {
            daily_calorie_goal,
            macro_goals: compute_macro_goals(daily_calorie_goal),
        }
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self::from_calorie_goal(DEFAULT_DAILY_CALORIE_GOAL)
    }
}

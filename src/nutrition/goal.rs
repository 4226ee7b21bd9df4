//! Daily calorie goal
//!
//! Mifflin-St Jeor basal metabolic rate, scaled by an activity multiplier and
//! shifted by 500 kcal for weight loss or gain.
//!
//! Age is plain calendar-year subtraction. Month and day of birth are ignored,
//! so the computed age can be one year high before the birthday. Stored goals
//! depend on this, so it is kept as is.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::round_half_up;

/// Returned whenever the profile is incomplete
pub const DEFAULT_DAILY_CALORIE_GOAL: i64 = 2000;

/// Absolute floor for any computed goal
pub const MIN_DAILY_CALORIE_GOAL: i64 = 1200;

const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    /// Anything that is not "male" gets the female equation
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Empty input is treated as missing
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => None,
            "male" => Some(Gender::Male),
            _ => Some(Gender::Female),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Active,
    VeryActive,
    Unrecognized,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::Unrecognized => "unrecognized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => None,
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => Some(ActivityLevel::Unrecognized),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Active => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::Unrecognized => 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightGoal {
    Lose,
    Gain,
    Maintain,
}

impl WeightGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGoal::Lose => "lose",
            WeightGoal::Gain => "gain",
            WeightGoal::Maintain => "maintain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => None,
            "lose" => Some(WeightGoal::Lose),
            "gain" => Some(WeightGoal::Gain),
            _ => Some(WeightGoal::Maintain),
        }
    }

    /// Calories added to (or removed from) the daily expenditure
    pub fn adjustment(&self) -> f64 {
        match self {
            WeightGoal::Lose => -GOAL_ADJUSTMENT_KCAL,
            WeightGoal::Gain => GOAL_ADJUSTMENT_KCAL,
            WeightGoal::Maintain => 0.0,
        }
    }

    /// Whether a target weight must accompany this goal
    pub fn needs_target_weight(&self) -> bool {
        !matches!(self, WeightGoal::Maintain)
    }
}

/// Enum fields arrive as free text and go through the same `from_str` as
/// stored rows, so "" is missing and "Male" is male.
fn parse_text<'de, D, T>(deserializer: D, parse: fn(&str) -> Option<T>) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.as_deref().and_then(parse))
}

fn deserialize_gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Gender>, D::Error> {
    parse_text(deserializer, Gender::from_str)
}

fn deserialize_activity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ActivityLevel>, D::Error> {
    parse_text(deserializer, ActivityLevel::from_str)
}

fn deserialize_goal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<WeightGoal>, D::Error> {
    parse_text(deserializer, WeightGoal::from_str)
}

/// Biometric inputs for the goal calculation. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricProfile {
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_activity")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, deserialize_with = "deserialize_goal")]
    pub goal: Option<WeightGoal>,
    pub target_weight_kg: Option<f64>,
}

/// The six required fields, once all are known to be present
struct GoalInputs {
    birth_date: NaiveDate,
    gender: Gender,
    height_cm: f64,
    weight_kg: f64,
    activity_level: ActivityLevel,
    goal: WeightGoal,
}

/// Zero and NaN measurements count as missing
fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl BiometricProfile {
    fn goal_inputs(&self) -> Option<GoalInputs> {
        Some(GoalInputs {
            birth_date: self.birth_date?,
            gender: self.gender?,
            height_cm: measured(self.height_cm)?,
            weight_kg: measured(self.weight_kg)?,
            activity_level: self.activity_level?,
            goal: self.goal?,
        })
    }

    /// True when a goal can be computed rather than defaulted
    pub fn is_complete(&self) -> bool {
        self.goal_inputs().is_some()
    }
}

/// Age in whole calendar years (year subtraction only)
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - birth_date.year()
}

pub fn basal_metabolic_rate(gender: Gender, weight_kg: f64, height_cm: f64, age: i32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Intermediate values of the goal calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    pub age: i32,
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub tdee: f64,
    pub adjusted: f64,
    pub daily_calorie_goal: i64,
}

/// Full calculation, or `None` when the profile is incomplete
pub fn energy_breakdown(profile: &BiometricProfile, today: NaiveDate) -> Option<EnergyBreakdown> {
    let inputs = profile.goal_inputs()?;

    let age = age_in_years(inputs.birth_date, today);
    let bmr = basal_metabolic_rate(inputs.gender, inputs.weight_kg, inputs.height_cm, age);
    let activity_multiplier = inputs.activity_level.multiplier();
    let tdee = bmr * activity_multiplier;
    let adjusted = tdee + inputs.goal.adjustment();
    let daily_calorie_goal = (round_half_up(adjusted) as i64).max(MIN_DAILY_CALORIE_GOAL);

    Some(EnergyBreakdown {
        age,
        bmr,
        activity_multiplier,
        tdee,
        adjusted,
        daily_calorie_goal,
    })
}

/// Daily calorie goal for a profile as of `today`.
///
/// Incomplete profiles get [`DEFAULT_DAILY_CALORIE_GOAL`]; computed goals never
/// drop below [`MIN_DAILY_CALORIE_GOAL`].
pub fn compute_daily_calorie_goal(profile: &BiometricProfile, today: NaiveDate) -> i64 {
    match energy_breakdown(profile, today) {
        Some(breakdown) => breakdown.daily_calorie_goal,
        None => {
            tracing::debug!("Incomplete biometric profile, using default calorie goal");
            DEFAULT_DAILY_CALORIE_GOAL
        }
    }
}

//! Profile and goal tools

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{Profile, ProfileSave};
use crate::nutrition::{
    compute_daily_calorie_goal, energy_breakdown, BiometricProfile, DailyGoal, EnergyBreakdown,
};

/// Where a daily goal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSource {
    Profile,
    Default,
}

/// Input for save_profile
#[derive(Debug, Clone, Default)]
pub struct SaveProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biometrics: BiometricProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biometrics: BiometricProfile,
    pub daily_goal: DailyGoal,
    pub goal_source: GoalSource,
    /// Intermediate figures; absent when the profile is incomplete
    pub energy: Option<EnergyBreakdown>,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct DailyGoalResponse {
    #[serde(flatten)]
    pub goal: DailyGoal,
    pub source: GoalSource,
}

/// Cached profile goal, else the default
pub(crate) fn resolve_goal(conn: &Connection, user_id: &str) -> DbResult<(DailyGoal, GoalSource)> {
    let cached = Profile::get(conn, user_id)?.and_then(|p| p.daily_goal);
    Ok(match cached {
        Some(goal) => (goal, GoalSource::Profile),
        None => (DailyGoal::default(), GoalSource::Default),
    })
}

fn validate(biometrics: &BiometricProfile) -> Result<(), String> {
    for (field, value) in [
        ("height_cm", biometrics.height_cm),
        ("weight_kg", biometrics.weight_kg),
        ("target_weight_kg", biometrics.target_weight_kg),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} must be a positive number, got {}", field, v));
            }
        }
    }

    if let Some(goal) = biometrics.goal {
        let has_target = biometrics.target_weight_kg.is_some_and(|t| t > 0.0);
        if goal.needs_target_weight() && !has_target {
            return Err(format!("A target weight is required for goal '{}'", goal.as_str()));
        }
    }
    Ok(())
}

fn to_response(profile: Profile, today: NaiveDate) -> ProfileResponse {
    let (daily_goal, goal_source) = match profile.daily_goal {
        Some(goal) => (goal, GoalSource::Profile),
        None => (DailyGoal::default(), GoalSource::Default),
    };
    ProfileResponse {
        energy: energy_breakdown(&profile.biometrics, today),
        user_id: profile.user_id,
        first_name: profile.first_name,
        last_name: profile.last_name,
        biometrics: profile.biometrics,
        daily_goal,
        goal_source,
        updated_at: profile.updated_at,
    }
}

/// Validate and store the profile, recomputing the cached goal
pub fn save_profile(
    db: &Database,
    user_id: &str,
    request: SaveProfileRequest,
    today: NaiveDate,
) -> Result<ProfileResponse, String> {
    validate(&request.biometrics)?;

    let calorie_goal = compute_daily_calorie_goal(&request.biometrics, today);
    let data = ProfileSave {
        first_name: request.first_name,
        last_name: request.last_name,
        biometrics: request.biometrics,
        daily_goal: DailyGoal::from_calorie_goal(calorie_goal),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::save(&conn, user_id, &data)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!(user_id, daily_goal = calorie_goal, "profile saved");
    Ok(to_response(profile, today))
}

pub fn get_profile(db: &Database, user_id: &str, today: NaiveDate) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    Ok(profile.map(|p| to_response(p, today)))
}

pub fn get_daily_goal(db: &Database, user_id: &str) -> Result<DailyGoalResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let (goal, source) = resolve_goal(&conn, user_id)
        .map_err(|e| format!("Failed to get daily goal: {}", e))?;
    Ok(DailyGoalResponse { goal, source })
}

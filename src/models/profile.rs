//! Profile model
//!
//! One row per user: biometric inputs plus the goal computed from them.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{
    compute_macro_goals, ActivityLevel, BiometricProfile, DailyGoal, Gender, MacroGoals, WeightGoal,
};
use super::parse_date_column;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biometrics: BiometricProfile,
    /// Goal cached at the last save; `None` if never computed
    pub daily_goal: Option<DailyGoal>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for saving a profile
#[derive(Debug, Clone)]
pub struct ProfileSave {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biometrics: BiometricProfile,
    pub daily_goal: DailyGoal,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let birth_date: Option<String> = row.get("birth_date")?;
        let birth_date = match birth_date {
            Some(s) => Some(parse_date_column(3, &s)?),
            None => None,
        };
        let gender: Option<String> = row.get("gender")?;
        let activity_level: Option<String> = row.get("activity_level")?;
        let goal: Option<String> = row.get("goal")?;

        let daily_goal: Option<i64> = row.get("daily_goal")?;
        let protein: Option<i64> = row.get("protein_goal_g")?;
        let carbs: Option<i64> = row.get("carbs_goal_g")?;
        let fat: Option<i64> = row.get("fat_goal_g")?;

        let daily_goal = daily_goal.map(|kcal| {
            let macro_goals = match (protein, carbs, fat) {
                (Some(protein_g), Some(carbs_g), Some(fat_g)) => MacroGoals { protein_g, carbs_g, fat_g },
                _ => compute_macro_goals(kcal),
            };
            DailyGoal {
                daily_calorie_goal: kcal,
                macro_goals,
            }
        });

        Ok(Self {
            user_id: row.get("user_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            biometrics: BiometricProfile {
                birth_date,
                gender: gender.as_deref().and_then(Gender::from_str),
                height_cm: row.get("height_cm")?,
                weight_kg: row.get("weight_kg")?,
                activity_level: activity_level.as_deref().and_then(ActivityLevel::from_str),
                goal: goal.as_deref().and_then(WeightGoal::from_str),
                target_weight_kg: row.get("target_weight_kg")?,
            },
            daily_goal,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;
        Ok(stmt.query_row([user_id], Self::from_row).optional()?)
    }

    /// Insert or replace the profile (upsert)
    pub fn save(conn: &Connection, user_id: &str, data: &ProfileSave) -> DbResult<Self> {
        let b = &data.biometrics;
        let goal = &data.daily_goal;
        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, first_name, last_name, birth_date, gender, height_cm, weight_kg,
                activity_level, goal, target_weight_kg,
                daily_goal, protein_goal_g, carbs_goal_g, fat_goal_g
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(user_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                birth_date = excluded.birth_date,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                target_weight_kg = excluded.target_weight_kg,
                daily_goal = excluded.daily_goal,
                protein_goal_g = excluded.protein_goal_g,
                carbs_goal_g = excluded.carbs_goal_g,
                fat_goal_g = excluded.fat_goal_g,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.first_name,
                data.last_name,
                b.birth_date.map(|d| d.to_string()),
                b.gender.map(|g| g.as_str()),
                b.height_cm,
                b.weight_kg,
                b.activity_level.map(|a| a.as_str()),
                b.goal.map(|g| g.as_str()),
                b.target_weight_kg,
                goal.daily_calorie_goal,
                goal.macro_goals.protein_g,
                goal.macro_goals.carbs_g,
                goal.macro_goals.fat_g,
            ],
        )?;

        Self::get(conn, user_id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Replace only the cached goal
    pub fn update_daily_goal(conn: &Connection, user_id: &str, goal: &DailyGoal) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE profiles SET
                daily_goal = ?1,
                protein_goal_g = ?2,
                carbs_goal_g = ?3,
                fat_goal_g = ?4,
                updated_at = datetime('now')
            WHERE user_id = ?5
            "#,
            params![
                goal.daily_calorie_goal,
                goal.macro_goals.protein_g,
                goal.macro_goals.carbs_g,
                goal.macro_goals.fat_g,
                user_id,
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles ORDER BY user_id")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::test_support::migrated_db;

    fn sample_save() -> ProfileSave {
        ProfileSave {
            first_name: Some("Mona".into()),
            last_name: None,
            biometrics: BiometricProfile {
                birth_date: NaiveDate::from_ymd_opt(1996, 10, 19),
                gender: Some(Gender::Female),
                height_cm: Some(165.0),
                weight_kg: Some(70.0),
                activity_level: Some(ActivityLevel::Light),
                goal: Some(WeightGoal::Lose),
                target_weight_kg: Some(62.0),
            },
            daily_goal: DailyGoal::from_calorie_goal(1650),
        }
    }

    #[test]
    fn test_save_and_get_round_trips_fields() {
        let db = migrated_db();
        db.with_conn(|conn| {
            assert!(Profile::get(conn, "u1")?.is_none());

            let saved = Profile::save(conn, "u1", &sample_save())?;
            assert_eq!(saved.biometrics, sample_save().biometrics);
            assert_eq!(saved.daily_goal, Some(DailyGoal::from_calorie_goal(1650)));
            assert_eq!(saved.first_name.as_deref(), Some("Mona"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_save_overwrites_existing_row() {
        let db = migrated_db();
        db.with_conn(|conn| {
            Profile::save(conn, "u1", &sample_save())?;

            let mut changed = sample_save();
            changed.biometrics.goal = Some(WeightGoal::Maintain);
            changed.biometrics.target_weight_kg = None;
            changed.daily_goal = DailyGoal::from_calorie_goal(2150);
            let saved = Profile::save(conn, "u1", &changed)?;

            assert_eq!(saved.biometrics.goal, Some(WeightGoal::Maintain));
            assert_eq!(saved.biometrics.target_weight_kg, None);
            assert_eq!(saved.daily_goal.map(|g| g.daily_calorie_goal), Some(2150));
            assert_eq!(Profile::list(conn)?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_update_daily_goal() {
        let db = migrated_db();
        db.with_conn(|conn| {
            assert!(!Profile::update_daily_goal(conn, "nobody", &DailyGoal::default())?);

            Profile::save(conn, "u1", &sample_save())?;
            assert!(Profile::update_daily_goal(conn, "u1", &DailyGoal::from_calorie_goal(1800))?);
            let profile = Profile::get(conn, "u1")?.unwrap();
            assert_eq!(profile.daily_goal, Some(DailyGoal::from_calorie_goal(1800)));
            Ok(())
        })
        .unwrap();
    }
}

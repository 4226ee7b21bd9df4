//! Recompute the cached daily goal of every stored profile.
//!
//! Ages move with the calendar year, so cached goals go stale on January 1st.

use calora::config::Config;
use calora::db::{migrations, Database};
use calora::models::Profile;
use calora::nutrition::{compute_daily_calorie_goal, DailyGoal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    let database = Database::new(&config.database_path)?;
    let today = chrono::Local::now().date_naive();

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let profiles = Profile::list(conn)?;
        println!("Found {} profiles", profiles.len());

        let mut changed = 0;
        for profile in &profiles {
            let goal = DailyGoal::from_calorie_goal(compute_daily_calorie_goal(&profile.biometrics, today));
            let old = profile.daily_goal.map(|g| g.daily_calorie_goal);
            if old == Some(goal.daily_calorie_goal) {
                continue;
            }

            Profile::update_daily_goal(conn, &profile.user_id, &goal)?;
            changed += 1;
            match old {
                Some(kcal) => println!("  {}: {} -> {} kcal", profile.user_id, kcal, goal.daily_calorie_goal),
                None => println!("  {}: {} kcal", profile.user_id, goal.daily_calorie_goal),
            }
        }

        println!("Updated {} of {} profiles", changed, profiles.len());
        Ok(())
    })?;

    Ok(())
}

//! Calora MCP Server Implementation
//!
//! Implements the MCP server with all Calora tools.

use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::nutrition::{
    ActivityLevel, BiometricProfile, DayRecord, ExerciseEntry, FoodEntry, Gender, WeightGoal,
};
use crate::tools::status::StatusTracker;
use crate::tools::{diary, parse_date, profile, settings, steps, weight};

/// Calora MCP Service
#[derive(Clone)]
pub struct CaloraService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    user_id: String,
    tool_router: ToolRouter<CaloraService>,
}

impl CaloraService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.user_id.clone(),
            ))),
            database,
            user_id: config.user_id.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an optional date argument, defaulting to today
fn date_or_today(date: Option<&str>) -> Result<NaiveDate, McpError> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => parse_date(d).map_err(|e| McpError::invalid_params(e, None)),
        None => Ok(today()),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveProfileParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// YYYY-MM-DD
    pub birth_date: Option<String>,
    /// male or female
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// sedentary, light, active or very_active
    pub activity_level: Option<String>,
    /// lose, maintain or gain
    pub goal: Option<String>,
    /// Required for lose and gain
    pub target_weight_kg: Option<f64>,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// breakfast, lunch, dinner or snacks
    pub meal_slot: String,
    pub name: String,
    /// Free-form quantity label, e.g. "1 cup"
    pub quantity: Option<String>,
    pub calories: Option<f64>,
    /// Protein in grams
    pub p: Option<f64>,
    /// Carbohydrates in grams
    pub c: Option<f64>,
    /// Fat in grams
    pub f: Option<f64>,
    /// Fiber in grams
    pub fib: Option<f64>,
    /// Sugar in grams
    pub sug: Option<f64>,
    /// Sodium in milligrams
    pub sod: Option<f64>,
    pub external_id: Option<String>,
    /// Image file name or URL
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogExerciseParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub name: Option<String>,
    pub duration_minutes: Option<f64>,
    /// Calories burned
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaterParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub amount: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportDayRecordParams {
    /// YYYY-MM-DD
    pub date: String,
    /// Day record JSON: breakfast, lunch, dinner, snacks, exercises, water, weight
    pub record: serde_json::Value,
}

// ============================================================================
// Weight / Steps / Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub weight_kg: f64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogStepsParams {
    pub steps: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StepsReportParams {
    /// week or month
    #[serde(default = "default_steps_period")]
    pub period: String,
}

fn default_steps_period() -> String { "week".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GoalParams {
    pub goal: i64,
}

#[tool_router]
impl CaloraService {
    // --- Status ---

    #[tool(description = "Get the current status of the Calora service including build info, database status, and process information")]
    async fn calora_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the calorie diary. Call this when starting a logging session or when unsure how the goal and diary tools work.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIARY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Save the user's profile (birth date, gender, height, weight, activity level, goal, target weight) and recompute the daily calorie and macro goals")]
    fn save_profile(&self, Parameters(p): Parameters<SaveProfileParams>) -> Result<CallToolResult, McpError> {
        let birth_date = match p.birth_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Some(parse_date(d).map_err(|e| McpError::invalid_params(e, None))?),
            None => None,
        };
        let request = profile::SaveProfileRequest {
            first_name: p.first_name,
            last_name: p.last_name,
            biometrics: BiometricProfile {
                birth_date,
                gender: p.gender.as_deref().and_then(Gender::from_str),
                height_cm: p.height_cm,
                weight_kg: p.weight_kg,
                activity_level: p.activity_level.as_deref().and_then(ActivityLevel::from_str),
                goal: p.goal.as_deref().and_then(WeightGoal::from_str),
                target_weight_kg: p.target_weight_kg,
            },
        };
        let result = profile::save_profile(&self.database, &self.user_id, request, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the stored profile with its cached daily goal and the BMR/TDEE breakdown")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &self.user_id, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(p) => json_result(&p),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "Profile not found"}"#,
            )])),
        }
    }

    #[tool(description = "Get the daily calorie goal and macro goals (from the profile, or the 2000 kcal default)")]
    fn get_daily_goal(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_daily_goal(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Get the diary for a date: meals with totals, exercise, remaining calories, progress, nutrient progress, water, steps and weight")]
    fn get_diary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = diary::get_diary(&self.database, &self.user_id, date, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a food item to a meal slot (breakfast, lunch, dinner, snacks). Only today can be edited.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let entry = FoodEntry {
            id: p.external_id,
            name: p.name,
            quantity_label: p.quantity,
            calories: p.calories,
            p: p.p,
            c: p.c,
            f: p.f,
            fib: p.fib,
            sug: p.sug,
            sod: p.sod,
            image: p.image,
            captured_image_uri: None,
        };
        let result = diary::log_food(&self.database, &self.user_id, date, today(), &p.meal_slot, entry)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a workout with the calories it burned. Only today can be edited.")]
    fn log_exercise(&self, Parameters(p): Parameters<LogExerciseParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let entry = ExerciseEntry {
            name: p.name,
            duration_minutes: p.duration_minutes,
            calories: p.calories,
        };
        let result = diary::log_exercise(&self.database, &self.user_id, date, today(), entry)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the workouts logged on a date with total calories burned")]
    fn list_exercises(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = diary::list_exercises(&self.database, &self.user_id, date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set today's water count (cups). Never goes below 0.")]
    fn set_water(&self, Parameters(p): Parameters<WaterParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = diary::set_water(&self.database, &self.user_id, date, today(), p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add cups of water to today's count; a negative amount removes cups")]
    fn add_water(&self, Parameters(p): Parameters<WaterParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = diary::add_water(&self.database, &self.user_id, date, today(), p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Import a day record exported from the mobile app cache into a date. Food and workouts are appended, water is added, weight is recorded.")]
    fn import_day_record(&self, Parameters(p): Parameters<ImportDayRecordParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(&p.date).map_err(|e| McpError::invalid_params(e, None))?;
        let record: DayRecord = serde_json::from_value(p.record)
            .map_err(|e| McpError::invalid_params(format!("Invalid day record: {}", e), None))?;
        let result = diary::import_day_record(&self.database, &self.user_id, date, record)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Export every logged food entry as CSV (Date, Meal, Food Name, Quantity, Calories, Protein, Carbs, Fat)")]
    fn export_food_log_csv(&self) -> Result<CallToolResult, McpError> {
        let result = diary::export_food_log_csv(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Weight ---

    #[tool(description = "Log body weight in kg for a date (defaults to today). Logging twice on one date replaces the earlier value.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = weight::log_weight(&self.database, &self.user_id, date, p.weight_kg)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the weight history with current, start and total change, plus the last 7 points for a chart")]
    fn get_weight_history(&self) -> Result<CallToolResult, McpError> {
        let result = weight::get_weight_history(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Steps and goals ---

    #[tool(description = "Record a step counter reading for a date (defaults to today); the highest reading of the day is kept")]
    fn log_steps(&self, Parameters(p): Parameters<LogStepsParams>) -> Result<CallToolResult, McpError> {
        let date = date_or_today(p.date.as_deref())?;
        let result = steps::log_steps(&self.database, &self.user_id, date, p.steps)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get today's steps (distance, calories, goal progress) and a week or month report")]
    fn get_steps_report(&self, Parameters(p): Parameters<StepsReportParams>) -> Result<CallToolResult, McpError> {
        let result = steps::get_steps_report(&self.database, &self.user_id, today(), &p.period)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the daily steps goal (1 to 100000)")]
    fn set_steps_goal(&self, Parameters(p): Parameters<GoalParams>) -> Result<CallToolResult, McpError> {
        let result = settings::set_steps_goal(&self.database, &self.user_id, p.goal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the daily water goal in cups (1 to 50)")]
    fn set_water_goal(&self, Parameters(p): Parameters<GoalParams>) -> Result<CallToolResult, McpError> {
        let result = settings::set_water_goal(&self.database, &self.user_id, p.goal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for CaloraService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calora".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calora calorie diary".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calora - calorie diary with goals computed from the user's profile. \
                 IMPORTANT: Call diary_instructions before logging. Only today's diary can be edited. \
                 Profile: save_profile, get_profile, get_daily_goal. \
                 Diary: get_diary, log_food, log_exercise, list_exercises, set_water, add_water. \
                 Weight: log_weight, get_weight_history. \
                 Steps: log_steps, get_steps_report. \
                 Goals: set_steps_goal, set_water_goal. \
                 Data: import_day_record, export_food_log_csv."
                    .into(),
            ),
        }
    }
}

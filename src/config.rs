//! Runtime configuration from the environment
//!
//! Call `dotenvy::dotenv()` before [`Config::from_env`] to pick up a `.env`
//! file.

use std::path::PathBuf;

pub const DEFAULT_USER_ID: &str = "local";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Key for every stored row; one user per server process
    pub user_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var("CALORA_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());
        let user_id = std::env::var("CALORA_USER_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        Self {
            database_path,
            user_id,
        }
    }
}

/// `data/calora.db` under the project root, found from the executable's location
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("calora.db");
    path
}

use crate::persistence::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

pub const DEFAULT_ZOOM_LEVEL: f64 = 16.5;
pub const DEFAULT_DB_PATH: &str = "mapty.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Key the whole workout list is stored under.
    pub storage_key: String,
    /// Zoom used when the map is created and when it recenters on a workout.
    pub zoom_level: f64,
    pub db_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            zoom_level: DEFAULT_ZOOM_LEVEL,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

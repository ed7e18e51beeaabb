use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub solver: SolverSettings,
    pub io: IoSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    /// Wall-clock budget for one solve, in seconds
    pub max_solve_time_seconds: u64,
    /// Optional RNG seed for reproducible plans
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IoSettings {
    pub staff_csv: String,
    pub vacations_csv: Option<String>,
    pub previous_context_json: Option<String>,
    pub schedule_csv_out: String,
    pub next_context_json_out: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

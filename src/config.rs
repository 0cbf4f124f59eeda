use std::path::PathBuf;

use tracing::Level;

use crate::core::errors::{AppError, AppResult};

pub const LOG_ENV: &str = "SCENARIO_EXPORT_LOG";
pub const OUT_DIR_ENV: &str = "SCENARIO_EXPORT_OUT_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: Level,
    pub out_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let out_dir = std::env::var_os(OUT_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Ok(Self {
            log_level: parse_log_level(&std::env::var(LOG_ENV).unwrap_or_default()),
            out_dir: default_output_dir(out_dir)?,
        })
    }
}

/// Unknown or empty values fall back to `info`.
pub fn parse_log_level(raw: &str) -> Level {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn default_output_dir(base: Option<PathBuf>) -> AppResult<PathBuf> {
    if let Some(path) = base {
        return Ok(path);
    }
    let mut cwd = std::env::current_dir().map_err(|err| AppError::Io(err.to_string()))?;
    cwd.push("exports");
    Ok(cwd)
}

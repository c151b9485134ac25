use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::core::persistence::storage_path::DEFAULT_DATA_DIR;

pub const DEFAULT_CRON_SCHEDULE: &str = "0 */5 * * * *";

fn validate_cron(expression: &str) -> Result<(), ValidationError> {
    cron::Schedule::from_str(expression)
        .map(|_| ())
        .map_err(|_| ValidationError::new("cron_expression"))
}

/// Process configuration, read from `COLLY_*` environment variables.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Refresh cadence (`sec min hour day-of-month month day-of-week [year]`)
    #[validate(length(min = 1), custom(function = "validate_cron"))]
    pub cron_schedule: String,
    /// Directory of kubeconfig files, one cluster each
    pub kubeconfig_dir: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub run_on_startup: bool,
    /// Daily rolling log files go here when set
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cron_schedule: DEFAULT_CRON_SCHEDULE.to_string(),
            kubeconfig_dir: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            run_on_startup: true,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(v) = get("COLLY_CRON_SCHEDULE") {
            config.cron_schedule = v;
        }
        config.kubeconfig_dir = get("COLLY_KUBECONFIG_DIR").map(PathBuf::from);
        if let Some(v) = get("COLLY_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("COLLY_RUN_ON_STARTUP") {
            config.run_on_startup = v
                .parse::<bool>()
                .with_context(|| format!("COLLY_RUN_ON_STARTUP must be true or false, got '{}'", v))?;
        }
        config.log_dir = get("COLLY_LOG_DIR").map(PathBuf::from);

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

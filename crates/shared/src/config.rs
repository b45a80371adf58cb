//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Largest number of periods a balance projection may cover.
    #[serde(default = "default_max_projection_periods")]
    pub max_projection_periods: u32,
    /// Lookback window, in days, for the unexpected expense analysis.
    #[serde(default = "default_unexpected_expense_window_days")]
    pub unexpected_expense_window_days: u32,
    /// Unexpected expense share (percent of profit) at which the alert turns moderate.
    #[serde(default = "default_alert_moderate_percent")]
    pub alert_moderate_percent: u32,
    /// Unexpected expense share (percent of profit) at which the alert turns high.
    #[serde(default = "default_alert_high_percent")]
    pub alert_high_percent: u32,
}

fn default_max_projection_periods() -> u32 {
    120
}

fn default_unexpected_expense_window_days() -> u32 {
    30
}

fn default_alert_moderate_percent() -> u32 {
    15
}

fn default_alert_high_percent() -> u32 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_projection_periods: default_max_projection_periods(),
            unexpected_expense_window_days: default_unexpected_expense_window_days(),
            alert_moderate_percent: default_alert_moderate_percent(),
            alert_high_percent: default_alert_high_percent(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "fincontrol=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FINCONTROL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "FINCONTROL__ENGINE__MAX_PROJECTION_PERIODS",
                "FINCONTROL__LOGGING__FILTER",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.engine.max_projection_periods, 120);
                assert_eq!(config.engine.unexpected_expense_window_days, 30);
                assert_eq!(config.engine.alert_moderate_percent, 15);
                assert_eq!(config.engine.alert_high_percent, 30);
                assert_eq!(config.logging.filter, "fincontrol=info");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("FINCONTROL__ENGINE__MAX_PROJECTION_PERIODS", Some("24")),
                ("FINCONTROL__LOGGING__FILTER", Some("fincontrol=debug")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.engine.max_projection_periods, 24);
                assert_eq!(config.engine.unexpected_expense_window_days, 30);
                assert_eq!(config.logging.filter, "fincontrol=debug");
            },
        );
    }
}

use std::time::Duration;

use api_types::section::SectionType;
use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/duckvault.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Where the session token is kept between runs.
    pub session_path: String,
    pub section_type: SectionType,
    /// IANA name used for new records' timestamps.
    pub timezone: String,
    pub log_file: String,
    pub level: String,
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            session_path: "config/session.json".to_string(),
            section_type: SectionType::Month,
            timezone: "Asia/Shanghai".to_string(),
            log_file: "duckvault.log".to_string(),
            level: "info".to_string(),
            debounce_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Timezone(format!("{}: {err}", self.timezone)))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Parser)]
#[command(name = "duckvault", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the session file path.
    #[arg(long)]
    session_path: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, env = "DUCKVAULT_LOG")]
    level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("DUCKVAULT"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    settings.timezone()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();

        assert_eq!(config.section_type, SectionType::Month);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };

        assert!(matches!(config.timezone(), Err(AppError::Timezone(_))));
    }

    #[test]
    fn partial_sources_fall_back_to_defaults() {
        let settings: AppConfig = config::Config::builder()
            .set_override("section_type", "day")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.section_type, SectionType::Day);
        assert_eq!(settings.base_url, AppConfig::default().base_url);
    }
}

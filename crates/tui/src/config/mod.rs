use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Parser;
use engine::Currency;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Pre-filled on the login form.
    pub email: String,
    pub currency: String,
    pub timezone: String,
    pub state_path: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            email: String::new(),
            currency: "INR".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            state_path: "config/tui_state.json".to_string(),
            log_file: "tally_tui.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn currency(&self) -> Result<Currency> {
        Currency::try_from(self.currency.as_str()).map_err(|err| AppError::Setting(err.to_string()))
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Setting(format!("timezone {}: {err}", self.timezone)))
    }
}

/// Today's date in `tz`, used as the default entry date.
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

#[derive(Debug, Parser)]
#[command(name = "tally_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://localhost:5000/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the login email (password is never read from CLI).
    #[arg(long)]
    email: Option<String>,
    /// Override display currency (INR, USD, EUR).
    #[arg(long)]
    currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    // Fail early rather than on the first render.
    settings.currency()?;
    settings.timezone()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.currency().unwrap(), Currency::Inr);
        assert_eq!(config.timezone().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn bad_settings_are_reported() {
        let config = AppConfig {
            currency: "XYZ".to_string(),
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.currency(), Err(AppError::Setting(_))));
        assert!(matches!(config.timezone(), Err(AppError::Setting(_))));
    }
}

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Forecast length when neither CLI nor config say otherwise.
pub const DEFAULT_FORECAST_DAYS: u32 = 5;

/// Longest forecast the provider serves at hourly resolution.
pub const MAX_FORECAST_DAYS: u32 = 7;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Place used when `forecast`/`hours` get no PLACE argument.
    pub default_place: Option<String>,
    /// Number of forecast days (clamped to 1-7).
    pub forecast_days: u32,
    /// Upstream service settings.
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_place: None,
            forecast_days: DEFAULT_FORECAST_DAYS,
            provider: ProviderConfig::default(),
        }
    }
}

/// Geocoding / weather / astronomy endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub geocode_url: String,
    pub forecast_url: String,
    pub astronomy_url: String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocode_url: "https://nominatim.openstreetmap.org/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            astronomy_url: "https://api.open-meteo.com/v1/astronomy".to_string(),
            user_agent: format!("{}/{}", crate::APP_NAME, env!("CARGO_PKG_VERSION")),
            timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/fishcast/config.toml` (or `path` if given).
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path.map(Path::to_path_buf).or_else(Self::config_path);
        match config_path {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolve forecast length: CLI > config, 0 → default, capped at 7.
    pub fn resolve_days(&self, cli_days: Option<u32>) -> u32 {
        clamp_forecast_days(cli_days.unwrap_or(self.forecast_days))
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Clamp a requested day count into the provider's 1-7 range; 0 means default.
pub fn clamp_forecast_days(days: u32) -> u32 {
    if days == 0 {
        DEFAULT_FORECAST_DAYS
    } else {
        days.min(MAX_FORECAST_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.forecast_days, 5);
        assert!(c.default_place.is_none());
        assert!(c.provider.forecast_url.starts_with("https://api.open-meteo.com"));
        assert!(c.provider.user_agent.starts_with("fishcast/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let c: AppConfig = toml::from_str(
            r#"
            default_place = "Lake Constance"

            [provider]
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(c.default_place.as_deref(), Some("Lake Constance"));
        assert_eq!(c.forecast_days, 5);
        assert_eq!(c.provider.timeout_secs, 30);
        assert!(c.provider.geocode_url.contains("nominatim"));
    }

    #[test]
    fn test_clamp_forecast_days() {
        assert_eq!(clamp_forecast_days(0), 5);
        assert_eq!(clamp_forecast_days(1), 1);
        assert_eq!(clamp_forecast_days(7), 7);
        assert_eq!(clamp_forecast_days(14), 7);
    }

    #[test]
    fn test_resolve_days_cli_wins() {
        let c = AppConfig { forecast_days: 3, ..Default::default() };
        assert_eq!(c.resolve_days(None), 3);
        assert_eq!(c.resolve_days(Some(6)), 6);
        assert_eq!(c.resolve_days(Some(10)), 7);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let c = AppConfig::load(Some(Path::new("/nonexistent/fishcast/config.toml")));
        assert_eq!(c.forecast_days, 5);
    }
}

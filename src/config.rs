use crate::errors::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "PRODUCT_REVIEWS_CONFIG";
pub const DATABASE_VAR: &str = "PRODUCT_REVIEWS_DATABASE";
pub const BIND_VAR: &str = "PRODUCT_REVIEWS_BIND";
pub const PAGE_SIZE_VAR: &str = "PRODUCT_REVIEWS_PAGE_SIZE";

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Runtime settings for the review store and its HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_path: String,
    pub bind_address: String,
    /// Number of comments per page in comment listings.
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_path: "product_reviews.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Settings as written in the TOML file; every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub database_path: Option<String>,
    pub bind_address: Option<String>,
    pub page_size: Option<u32>,
}

impl Settings {
    /// Loads the optional TOML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let partial = match path {
            Some(path) => Self::read_partial(path)?,
            None => PartialSettings::default(),
        };
        let env_map: HashMap<String, String> = [DATABASE_VAR, BIND_VAR, PAGE_SIZE_VAR]
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self::from_partial_and_env(partial, &env_map)
    }

    fn read_partial(path: &Path) -> Result<PartialSettings, ConfigError> {
        let display = path.display().to_string();
        if !path.exists() {
            log::info!("[CONFIG] No config file at {}, using defaults", display);
            return Ok(PartialSettings::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))
    }

    pub fn from_partial_and_env(
        partial: PartialSettings,
        env_map: &HashMap<String, String>,
    ) -> Result<Settings, ConfigError> {
        let defaults = Settings::default();
        let mut settings = Settings {
            database_path: partial.database_path.unwrap_or(defaults.database_path),
            bind_address: partial.bind_address.unwrap_or(defaults.bind_address),
            page_size: partial.page_size.unwrap_or(defaults.page_size),
        };

        if let Some(path) = env_map.get(DATABASE_VAR) {
            settings.database_path = path.clone();
        }
        if let Some(bind) = env_map.get(BIND_VAR) {
            settings.bind_address = bind.clone();
        }
        if let Some(raw) = env_map.get(PAGE_SIZE_VAR) {
            settings.page_size = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: PAGE_SIZE_VAR.to_string(),
                value: raw.clone(),
            })?;
        }

        if settings.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        let settings =
            Settings::from_partial_and_env(PartialSettings::default(), &HashMap::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let partial: PartialSettings = toml::from_str(
            r#"
            database_path = "/var/lib/reviews.db"
            page_size = 20
            "#,
        )
        .unwrap();
        let env_map = HashMap::from([(PAGE_SIZE_VAR.to_string(), "8".to_string())]);

        let settings = Settings::from_partial_and_env(partial, &env_map).unwrap();
        assert_eq!(settings.database_path, "/var/lib/reviews.db");
        assert_eq!(settings.bind_address, "127.0.0.1:3000");
        assert_eq!(settings.page_size, 8);
    }

    #[test]
    fn bad_page_size_is_rejected() {
        let env_map = HashMap::from([(PAGE_SIZE_VAR.to_string(), "many".to_string())]);
        let err = Settings::from_partial_and_env(PartialSettings::default(), &env_map).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let partial = PartialSettings {
            page_size: Some(0),
            ..PartialSettings::default()
        };
        assert!(Settings::from_partial_and_env(partial, &HashMap::new()).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Some(Path::new("/nonexistent/product-reviews.toml")));
        assert!(settings.is_ok());
    }
}

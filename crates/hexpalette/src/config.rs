use crate::profiles::ProfileKey;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session parameters: which profile and preset layout to track, plus
/// window hints passed through to the presentation layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub profile: ProfileKey,
    pub layout: usize,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub background: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKey::new("ep1-glitchless-any%-fonewm"),
            layout: 0,
            window_width: None,
            window_height: None,
            background: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "hexpalette", "hexpalette")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<TrackerConfig, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("HEXPALETTE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Load the session configuration, falling back to the defaults when no
/// file or environment override is usable.
pub fn load_or_default() -> TrackerConfig {
    match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to default configuration: {}", e);
            TrackerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let cases = vec![
            ("{}", TrackerConfig::default()),
            (
                "{\"profile\": \"ep2-glitchless-force\", \"layout\": 1}",
                TrackerConfig {
                    profile: ProfileKey::new("ep2-glitchless-force"),
                    layout: 1,
                    ..Default::default()
                },
            ),
            (
                "{\"background\": \"#202020\"}",
                TrackerConfig {
                    background: Some("#202020".to_string()),
                    ..Default::default()
                },
            ),
        ];

        for (json, expected) in cases {
            let deserialized: TrackerConfig = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }
}

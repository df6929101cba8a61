// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fs, path::Path, path::PathBuf, str::FromStr};

use remindcal_core::{APP_NAME, Config as CoreConfig};

const REMINDCAL_CONFIG_ENV: &str = "REMINDCAL_CONFIG";

/// Load the configuration.
///
/// Looks at `path`, then `$REMINDCAL_CONFIG`, then the user config directory.
/// Only the last one may be missing, in which case the defaults apply.
///
/// ## Errors
///
/// If the configuration file cannot be read or parsed.
#[tracing::instrument]
pub fn parse_config(path: Option<PathBuf>) -> Result<CoreConfig, Box<dyn Error>> {
    let mut config = if let Some(path) = path {
        read_config(&path)?
    } else if let Ok(env_path) = std::env::var(REMINDCAL_CONFIG_ENV) {
        read_config(Path::new(&env_path))?
    } else {
        let path = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if path.exists() {
            read_config(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config found, using defaults");
            CoreConfig::default()
        }
    };

    config.normalize();
    Ok(config)
}

fn read_config(path: &Path) -> Result<CoreConfig, Box<dyn Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()
        .map(|a| a.core)
}

#[derive(Debug, serde::Deserialize)]
struct ConfigRaw {
    #[serde(default)]
    core: CoreConfig,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindcal_core::WeekDay;
    use tempfile::TempDir;

    #[test]
    fn reads_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[core]
week_start = "SU"
time_zone = "Asia/Tokyo"
take_last_week_day = true
"#,
        )
        .unwrap();

        let config = parse_config(Some(config_path)).unwrap();
        assert_eq!(config.week_start, WeekDay::Sunday);
        assert_eq!(config.time_zone.as_deref(), Some("Asia/Tokyo"));
        assert!(config.take_last_week_day);
    }

    #[test]
    fn normalizes_time_zone() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[core]\ntime_zone = \"Nowhere/Zone\"\n").unwrap();

        let config = parse_config(Some(config_path)).unwrap();
        assert_ne!(config.time_zone.as_deref(), Some("Nowhere/Zone"));
        assert!(config.time_zone.is_some());
    }

    #[test]
    fn defaults_core_section() {
        let raw: ConfigRaw = "".parse().unwrap();
        assert_eq!(raw.core, CoreConfig::default());
    }

    #[test]
    fn rejects_missing_or_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(parse_config(Some(missing)).is_err());

        let malformed = temp_dir.path().join("malformed.toml");
        fs::write(&malformed, "[core]\nweek_start = \"someday\"\n").unwrap();
        assert!(parse_config(Some(malformed)).is_err());
    }
}

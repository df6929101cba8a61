// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::tz::TimeZone;
use remindcal_ical::WeekDay;
use serde::de;

/// The name of the remindcal application.
pub const APP_NAME: &str = "remindcal";

/// Configuration for the recurrence engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Config {
    /// Day a week starts on for new recurrences.
    #[serde(default = "default_week_start", deserialize_with = "deserialize_week_day")]
    pub week_start: WeekDay,

    /// IANA time zone for new recurrences, the system zone when unset.
    #[serde(default)]
    pub time_zone: Option<String>,

    /// If true, monthly-by-weekday recurrences count from the end of the
    /// month, e.g. "last Friday" instead of "4th Friday".
    #[serde(default)]
    pub take_last_week_day: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            time_zone: None,
            take_last_week_day: false,
        }
    }
}

impl Config {
    /// Normalize the configuration.
    ///
    /// An unknown configured time zone is replaced like an unset one: by the
    /// system zone, or `UTC` when that cannot be determined.
    pub fn normalize(&mut self) {
        if let Some(tz) = &self.time_zone {
            match TimeZone::get(tz) {
                Ok(_) => return,
                Err(err) => tracing::warn!(%tz, %err, "unknown time zone in config"),
            }
        }

        self.time_zone = Some(system_time_zone());
    }

    /// The configured time zone, falling back like [`Config::normalize`].
    #[must_use]
    pub fn time_zone(&self) -> String {
        let mut config = self.clone();
        config.normalize();
        config.time_zone.unwrap_or_else(|| "UTC".to_string())
    }
}

fn system_time_zone() -> String {
    match iana_time_zone::get_timezone() {
        Ok(tz) if TimeZone::get(&tz).is_ok() => tz,
        Ok(tz) => {
            tracing::warn!(%tz, "unknown system time zone, using UTC");
            "UTC".to_string()
        }
        Err(err) => {
            tracing::warn!(%err, "failed to get system time zone, using UTC");
            "UTC".to_string()
        }
    }
}

const fn default_week_start() -> WeekDay {
    WeekDay::Monday
}

fn deserialize_week_day<'de, D>(deserializer: D) -> Result<WeekDay, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct WeekDayVisitor;

    impl de::Visitor<'_> for WeekDayVisitor {
        type Value = WeekDay;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str(r#"a weekday like "MO", "Monday" or "monday""#)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            week_day_from_name(value)
                .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_str(WeekDayVisitor)
}

/// Two-letter code in any case, or English name in any case.
fn week_day_from_name(value: &str) -> Option<WeekDay> {
    let value = value.trim();
    WeekDay::from_code(&value.to_ascii_uppercase()).or_else(|| {
        (1..=7)
            .filter_map(WeekDay::from_iso_number)
            .find(|day| day.name().eq_ignore_ascii_case(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config() {
        let config: Config = toml::from_str(
            r#"
week_start = "Sunday"
time_zone = "Europe/Berlin"
take_last_week_day = true
"#,
        )
        .unwrap();
        assert_eq!(config.week_start, WeekDay::Sunday);
        assert_eq!(config.time_zone.as_deref(), Some("Europe/Berlin"));
        assert!(config.take_last_week_day);
        assert_eq!(config.time_zone(), "Europe/Berlin");
    }

    #[test]
    fn applies_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.week_start, WeekDay::Monday);
        assert!(!config.take_last_week_day);

        // falls back to a known zone
        assert!(TimeZone::get(&config.time_zone()).is_ok());
    }

    #[test]
    fn parses_week_start() {
        let success_cases = [
            ("MO", WeekDay::Monday),
            ("su", WeekDay::Sunday),
            ("Tuesday", WeekDay::Tuesday),
            ("saturday", WeekDay::Saturday),
        ];
        for (src, expected) in success_cases {
            let config: Config = toml::from_str(&format!("week_start = \"{src}\"")).unwrap();
            assert_eq!(config.week_start, expected, "{src}");
        }

        for src in ["", "M", "Mon", "8"] {
            let result = toml::from_str::<Config>(&format!("week_start = \"{src}\""));
            assert!(result.is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn replaces_unknown_time_zone() {
        let mut config = Config {
            time_zone: Some("Mars/Olympus".to_string()),
            ..Config::default()
        };
        config.normalize();
        let tz = config.time_zone.unwrap();
        assert_ne!(tz, "Mars/Olympus");
        assert!(TimeZone::get(&tz).is_ok());
    }
}

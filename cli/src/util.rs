// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgMatches, arg, value_parser};
use jiff::civil::{Date, DateTime};
use jiff::tz::{Offset, TimeZone};
use jiff::{Timestamp, Zoned};
use remindcal_core::Config;

pub fn arg_start() -> Arg {
    arg!(-s --start <START> "Start of the first instance")
        .long_help("Start of the first instance, as an RFC 3339 timestamp, YYYY-MM-DD HH:MM or YYYY-MM-DD in the event time zone. Defaults to now.")
}

pub fn get_start(matches: &ArgMatches) -> Option<String> {
    matches.get_one::<String>("start").cloned()
}

pub fn arg_tz() -> Arg {
    arg!(--tz <TZ> "IANA time zone of the event, defaults to the configured one")
}

pub fn get_tz(matches: &ArgMatches) -> Option<String> {
    matches.get_one::<String>("tz").cloned()
}

pub fn arg_offset() -> Arg {
    arg!(--offset <MINUTES> "UTC offset in minutes used to render dates, defaults to the configured time zone")
        .value_parser(value_parser!(i32))
        .allow_negative_numbers(true)
}

pub fn get_offset(matches: &ArgMatches) -> Option<i32> {
    matches.get_one::<i32>("offset").copied()
}

/// The event time zone, or the configured one.
pub fn resolve_tz(tz: Option<&str>, config: &Config) -> Result<String, Box<dyn Error>> {
    match tz {
        Some(tz) => match TimeZone::get(tz) {
            Ok(_) => Ok(tz.to_owned()),
            Err(e) => Err(format!("Unknown time zone '{tz}': {e}").into()),
        },
        None => Ok(config.time_zone()),
    }
}

/// Parse the start of the first instance, local forms are read in `tz`.
pub fn parse_start(start: Option<&str>, tz: &str) -> Result<Timestamp, Box<dyn Error>> {
    let Some(start) = start.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Timestamp::now());
    };

    if let Ok(ts) = start.parse::<Timestamp>() {
        return Ok(ts);
    }

    let tz = TimeZone::get(tz)?;
    let local = if let Ok(dt) = DateTime::strptime("%Y-%m-%d %H:%M", start) {
        dt
    } else if let Ok(date) = Date::strptime("%Y-%m-%d", start) {
        date.to_datetime(jiff::civil::Time::midnight())
    } else {
        return Err(
            "Invalid start format. Expected an RFC 3339 timestamp, YYYY-MM-DD HH:MM or YYYY-MM-DD"
                .into(),
        );
    };
    let zoned: Zoned = local.to_zoned(tz)?;
    Ok(zoned.timestamp())
}

/// Offset from whole minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Result<Offset, Box<dyn Error>> {
    Ok(Offset::from_seconds(minutes.saturating_mul(60))?)
}

/// The given offset, or the current one of the configured time zone.
pub fn resolve_offset(minutes: Option<i32>, config: &Config) -> Result<Offset, Box<dyn Error>> {
    match minutes {
        Some(minutes) => offset_from_minutes(minutes),
        None => Ok(TimeZone::get(&config.time_zone())?.to_offset(Timestamp::now())),
    }
}

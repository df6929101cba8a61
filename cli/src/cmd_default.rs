// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};
use remindcal_core::{CalendarRecurrence, Config, RecurrenceKind, WeekDay, WeekDays};

use crate::cmd_recurrence::format_recurrence;
use crate::util::{arg_start, arg_tz, get_start, get_tz, parse_start, resolve_tz};

/// The shape of a default recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DefaultKind {
    Daily,
    Weekly,
    Monthly,
    #[value(name = "monthly-by-weekday")]
    MonthlyByWeekDay,
    Yearly,
}

/// Derive the recurrence a newly repeating event starts with.
#[derive(Debug, Clone)]
pub struct CmdDefault {
    pub kind: DefaultKind,
    pub start: Option<String>,
    pub tz: Option<String>,
    pub last: Option<bool>,
    pub days: Option<WeekDays>,
}

impl CmdDefault {
    pub const NAME: &str = "default";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Derive the default recurrence for the start of an event")
            .arg(arg!(<KIND> "Kind of recurrence").value_parser(value_parser!(DefaultKind)))
            .arg(arg_start())
            .arg(arg_tz())
            .arg(
                arg!(--last "Count the weekday from the end of the month")
                    .conflicts_with("first"),
            )
            .arg(arg!(--first "Count the weekday from the start of the month"))
            .arg(
                arg!(--days <DAYS> "Weekdays of a weekly recurrence, e.g. TU,TH")
                    .long_help("Weekdays of a weekly recurrence, e.g. TU,TH. Also reports how many days the start moves to land on one of them."),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let last = if matches.get_flag("last") {
            Some(true)
        } else if matches.get_flag("first") {
            Some(false)
        } else {
            None
        };

        let days = match matches.get_one::<String>("days") {
            Some(days) => Some(parse_week_days(days)?),
            None => None,
        };

        Ok(Self {
            kind: matches
                .get_one::<DefaultKind>("KIND")
                .copied()
                .ok_or("Kind of recurrence is required")?,
            start: get_start(matches),
            tz: get_tz(matches),
            last,
            days,
        })
    }

    pub fn run(self, config: &Config) -> Result<String, Box<dyn Error>> {
        tracing::debug!(?self, "deriving default recurrence...");
        let tz = resolve_tz(self.tz.as_deref(), config)?;
        let start = parse_start(self.start.as_deref(), &tz)?;
        let week_start = config.week_start;

        let mut recurrence = match self.kind {
            DefaultKind::Daily => CalendarRecurrence::default_daily(start, &tz, week_start)?,
            DefaultKind::Weekly => CalendarRecurrence::default_weekly(start, &tz, week_start)?,
            DefaultKind::Monthly => CalendarRecurrence::default_monthly(start, &tz, week_start)?,
            DefaultKind::MonthlyByWeekDay => {
                let take_last = self.last.unwrap_or(config.take_last_week_day);
                CalendarRecurrence::default_monthly_by_week_day(start, &tz, week_start, take_last)?
            }
            DefaultKind::Yearly => CalendarRecurrence::default_yearly(start, &tz, week_start)?,
        };

        let Some(days) = self.days else {
            return Ok(format_recurrence(&recurrence)?);
        };
        if self.kind != DefaultKind::Weekly {
            return Err("--days only applies to weekly recurrences".into());
        }

        let adjust = recurrence.generate_start_time_adjust(days)?;
        recurrence.kind = RecurrenceKind::Weekly {
            week_days: Some(days),
        };
        Ok(format!(
            "{}\nStart moves {adjust} day(s) forward",
            format_recurrence(&recurrence)?
        ))
    }
}

/// Comma separated two-letter weekday codes.
fn parse_week_days(text: &str) -> Result<WeekDays, Box<dyn Error>> {
    let mut days = WeekDays::empty();
    for code in text.split(',').map(str::trim) {
        let day = WeekDay::from_code(&code.to_ascii_uppercase())
            .ok_or_else(|| format!("Invalid weekday '{code}', expected MO, TU, ..., SU"))?;
        days.insert(day);
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2020-11-22T09:45:13Z, the 4th and second to last Sunday of November
    const START: &str = "2020-11-22T09:45:13Z";

    fn cmd(kind: DefaultKind) -> CmdDefault {
        CmdDefault {
            kind,
            start: Some(START.to_string()),
            tz: Some("UTC".to_string()),
            last: None,
            days: None,
        }
    }

    fn rule_line(output: &str) -> Option<&str> {
        output.lines().find_map(|line| line.strip_prefix("Rule:       "))
    }

    #[test]
    fn derives_each_kind() {
        let cases = [
            (DefaultKind::Daily, "FREQ=DAILY;WKST=MO"),
            (DefaultKind::Weekly, "FREQ=WEEKLY;WKST=MO;BYDAY=SU"),
            (DefaultKind::Monthly, "FREQ=MONTHLY;WKST=MO;BYMONTHDAY=22"),
            (DefaultKind::MonthlyByWeekDay, "FREQ=MONTHLY;WKST=MO;BYDAY=4SU"),
            (
                DefaultKind::Yearly,
                "FREQ=YEARLY;WKST=MO;BYMONTH=11;BYMONTHDAY=22",
            ),
        ];
        for (kind, expected) in cases {
            let output = cmd(kind).run(&Config::default()).unwrap();
            assert_eq!(rule_line(&output), Some(expected), "{kind:?}");
        }
    }

    #[test]
    fn follows_config() {
        let config = Config {
            week_start: WeekDay::Sunday,
            take_last_week_day: true,
            ..Config::default()
        };
        let output = cmd(DefaultKind::MonthlyByWeekDay).run(&config).unwrap();
        assert_eq!(
            rule_line(&output),
            Some("FREQ=MONTHLY;WKST=SU;BYDAY=-2SU")
        );

        let mut first = cmd(DefaultKind::MonthlyByWeekDay);
        first.last = Some(false);
        let output = first.run(&config).unwrap();
        assert_eq!(rule_line(&output), Some("FREQ=MONTHLY;WKST=SU;BYDAY=4SU"));
    }

    #[test]
    fn reports_start_adjust() {
        let mut weekly = cmd(DefaultKind::Weekly);
        weekly.days = Some(parse_week_days("tu,TH").unwrap());
        let output = weekly.run(&Config::default()).unwrap();
        assert_eq!(
            rule_line(&output),
            Some("FREQ=WEEKLY;WKST=MO;BYDAY=TU,TH")
        );
        assert!(output.ends_with("Start moves 2 day(s) forward"));

        let mut daily = cmd(DefaultKind::Daily);
        daily.days = Some(parse_week_days("MO").unwrap());
        assert!(daily.run(&Config::default()).is_err());
    }

    #[test]
    fn parses_week_days() {
        let days = parse_week_days("MO, we ,FR").unwrap();
        assert_eq!(days.to_string(), "MO,WE,FR");

        for src in ["", "MON", "MO,,TU", "1MO"] {
            assert!(parse_week_days(src).is_err(), "Parse {src:?} should fail");
        }
    }
}

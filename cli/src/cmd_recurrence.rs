// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use remindcal_core::{
    CalendarRecurrence, CalendarRecurrenceLimit, Config, RecurrenceError, RecurrenceKind,
};

use crate::util::{arg_start, arg_tz, get_start, get_tz, parse_start, resolve_tz};

/// Interpret a rule into the structured recurrence of an event.
#[derive(Debug, Clone)]
pub struct CmdRecurrence {
    pub rule: String,
    pub start: Option<String>,
    pub tz: Option<String>,
}

impl CmdRecurrence {
    pub const NAME: &str = "recurrence";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Interpret a recurrence rule as an editable recurrence")
            .arg(arg!(<RULE> "Recurrence rule, e.g. FREQ=MONTHLY;BYDAY=-1FR"))
            .arg(arg_start())
            .arg(arg_tz())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: matches
                .get_one::<String>("RULE")
                .cloned()
                .unwrap_or_default(),
            start: get_start(matches),
            tz: get_tz(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<String, Box<dyn Error>> {
        tracing::debug!(?self, "interpreting recurrence rule...");
        let tz = resolve_tz(self.tz.as_deref(), config)?;
        let start = parse_start(self.start.as_deref(), &tz)?;
        let recurrence = CalendarRecurrence::interpret(start, &tz, &self.rule, "", "", "")?;
        Ok(format_recurrence(&recurrence)?)
    }
}

/// Field by field rendering followed by the rule text and its description.
pub fn format_recurrence(recurrence: &CalendarRecurrence) -> Result<String, RecurrenceError> {
    let kind = match recurrence.kind {
        RecurrenceKind::Daily => "daily".to_string(),
        RecurrenceKind::Weekly { week_days: None } => "weekly".to_string(),
        RecurrenceKind::Weekly {
            week_days: Some(days),
        } => format!("weekly ({days})"),
        RecurrenceKind::MonthlyByWeekDay {
            week_day,
            week_day_num,
        } => format!("monthly by weekday ({week_day_num}{week_day})"),
        RecurrenceKind::Monthly { month_day: None } => "monthly".to_string(),
        RecurrenceKind::Monthly {
            month_day: Some(day),
        } => format!("monthly (day {day})"),
        RecurrenceKind::Yearly { date: None } => "yearly".to_string(),
        RecurrenceKind::Yearly { date: Some(date) } => {
            format!("yearly (month {}, day {})", date.month, date.day)
        }
    };

    let limit = match recurrence.limit {
        CalendarRecurrenceLimit::NoLimit => "none".to_string(),
        CalendarRecurrenceLimit::Count(count) => format!("{count} times"),
        CalendarRecurrenceLimit::Until(until) => format!("until {until}"),
    };

    let week_start = match recurrence.week_start {
        Some(day) => day.to_string(),
        None => "MO (default)".to_string(),
    };

    Ok(format!(
        "\
Kind:       {kind}
Interval:   {interval}
Limit:      {limit}
Week start: {week_start}
Time zone:  {tz}
Rule:       {rule}
{description}",
        interval = recurrence.interval,
        tz = recurrence.event_time_zone,
        rule = recurrence.serialize()?,
        description = recurrence.describe()?,
    ))
}

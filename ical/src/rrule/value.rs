// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Typed values of individual recurrence rule parts.

use std::fmt::{self, Display};

use jiff::Timestamp;
use jiff::tz::Offset;

use crate::ParseError;
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL,
    KW_RRULE_WKST,
};
use crate::rrule::Frequency;
use crate::rrule::describe::{join, local_date_time, month_name, signed_ordinal};
use crate::rrule::parser::{
    parse_by_day, parse_by_month, parse_by_month_day, parse_by_week_no, parse_by_year_day,
    parse_freq, parse_positive, parse_set_pos, parse_until, parse_weekday,
};
use crate::weekday::{NthWeekDay, WeekDay};

/// One `NAME=value` part of a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRuleVal {
    /// `FREQ`
    Freq(Frequency),
    /// `COUNT`, a positive number of occurrences
    Count(u32),
    /// `INTERVAL`, a positive step between periods
    Interval(u32),
    /// `UNTIL`, the inclusive end instant
    Until(Timestamp),
    /// `WKST`, the day a week starts on
    Wkst(WeekDay),
    /// `BYDAY`, in the order given
    ByDay(Vec<NthWeekDay>),
    /// `BYMONTH`, months `1..=12`
    ByMonth(Vec<u8>),
    /// `BYMONTHDAY`, days of month, negative from the end
    ByMonthDay(Vec<i8>),
    /// `BYYEARDAY`, days of year, negative from the end
    ByYearDay(Vec<i16>),
    /// `BYWEEKNO`, ISO week numbers, negative from the end
    ByWeekNo(Vec<i8>),
    /// `BYSETPOS`
    BySetPos(i16),
}

impl RRuleVal {
    /// Parse the value of the rule part `name`.
    ///
    /// ## Errors
    ///
    /// [`ParseError::UnknownAttribute`] when `name` is not a supported rule
    /// part, [`ParseError::InvalidValue`] when `value` does not match the
    /// grammar of that part.
    pub fn parse(name: &str, value: &str) -> Result<Self, ParseError> {
        let val = match name {
            KW_RRULE_FREQ => Self::Freq(parse_freq(value)?),
            KW_RRULE_COUNT => Self::Count(parse_positive(KW_RRULE_COUNT, value)?),
            KW_RRULE_INTERVAL => Self::Interval(parse_positive(KW_RRULE_INTERVAL, value)?),
            KW_RRULE_UNTIL => Self::Until(parse_until(value)?),
            KW_RRULE_WKST => Self::Wkst(parse_weekday(KW_RRULE_WKST, value)?),
            KW_RRULE_BYDAY => Self::ByDay(parse_by_day(KW_RRULE_BYDAY, value)?),
            KW_RRULE_BYMONTH => Self::ByMonth(parse_by_month(KW_RRULE_BYMONTH, value)?),
            KW_RRULE_BYMONTHDAY => {
                Self::ByMonthDay(parse_by_month_day(KW_RRULE_BYMONTHDAY, value)?)
            }
            KW_RRULE_BYYEARDAY => Self::ByYearDay(parse_by_year_day(KW_RRULE_BYYEARDAY, value)?),
            KW_RRULE_BYWEEKNO => Self::ByWeekNo(parse_by_week_no(KW_RRULE_BYWEEKNO, value)?),
            KW_RRULE_BYSETPOS => Self::BySetPos(parse_set_pos(KW_RRULE_BYSETPOS, value)?),
            _ => {
                return Err(ParseError::UnknownAttribute {
                    name: name.to_owned(),
                });
            }
        };
        Ok(val)
    }

    /// Check that the value serializes to text its own grammar accepts, e.g.
    /// `COUNT` is positive and `BYMONTHDAY` lies in `-31..=-1` or `1..=31`.
    ///
    /// ## Errors
    ///
    /// [`ParseError::InvalidValue`] naming the part and the rejected text.
    pub fn validate(&self) -> Result<(), ParseError> {
        let text = self.to_string();
        let (name, value) = text
            .split_once('=')
            .ok_or_else(|| ParseError::MissingSeparator { part: text.clone() })?;
        Self::parse(name, value).map(|_| ())
    }

    /// The rule part name, e.g. `BYDAY`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Freq(_) => KW_RRULE_FREQ,
            Self::Count(_) => KW_RRULE_COUNT,
            Self::Interval(_) => KW_RRULE_INTERVAL,
            Self::Until(_) => KW_RRULE_UNTIL,
            Self::Wkst(_) => KW_RRULE_WKST,
            Self::ByDay(_) => KW_RRULE_BYDAY,
            Self::ByMonth(_) => KW_RRULE_BYMONTH,
            Self::ByMonthDay(_) => KW_RRULE_BYMONTHDAY,
            Self::ByYearDay(_) => KW_RRULE_BYYEARDAY,
            Self::ByWeekNo(_) => KW_RRULE_BYWEEKNO,
            Self::BySetPos(_) => KW_RRULE_BYSETPOS,
        }
    }

    /// English phrase for this part, `UNTIL` is shown in local time at
    /// `offset`.
    ///
    /// `INTERVAL` and `WKST` have no phrase of their own, the former is
    /// folded into the frequency phrase of a whole rule.
    #[must_use]
    pub fn describe(&self, offset: Offset) -> Option<String> {
        let text = match self {
            Self::Freq(freq) => freq.adverb().to_string(),
            Self::Count(1) => "once".to_string(),
            Self::Count(n) => format!("{n} times"),
            Self::Until(until) => format!("until {}", local_date_time(*until, offset)),
            Self::ByDay(days) => format!("on {}", join(days, NthWeekDay::describe)),
            Self::ByMonth(months) => format!("in {}", join(months, |m| month_name(*m))),
            Self::ByMonthDay(days) => format!(
                "on the {} day of the month",
                join(days, |d| signed_ordinal((*d).into()))
            ),
            Self::ByYearDay(days) => format!(
                "on the {} day of the year",
                join(days, |d| signed_ordinal((*d).into()))
            ),
            Self::ByWeekNo(weeks) => format!(
                "in the {} week of the year",
                join(weeks, |w| signed_ordinal((*w).into()))
            ),
            Self::BySetPos(pos) => format!("at the {} occurrence", signed_ordinal((*pos).into())),
            Self::Interval(_) | Self::Wkst(_) => return None,
        };
        Some(text)
    }
}

impl Display for RRuleVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.name())?;
        match self {
            Self::Freq(freq) => write!(f, "{freq}"),
            Self::Count(n) | Self::Interval(n) => write!(f, "{n}"),
            Self::Until(until) => write!(f, "{}", until.strftime("%Y%m%dT%H%M%SZ")),
            Self::Wkst(day) => write!(f, "{day}"),
            Self::ByDay(days) => write_list(f, days),
            Self::ByMonth(months) => write_list(f, months),
            Self::ByMonthDay(days) | Self::ByWeekNo(days) => write_list(f, days),
            Self::ByYearDay(days) => write_list(f, days),
            Self::BySetPos(pos) => write!(f, "{pos}"),
        }
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

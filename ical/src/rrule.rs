// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule documents, RFC 5545 Section 3.3.10.
//!
//! A rule is a `;`-separated list of `NAME=value` parts:
//!
//! ```txt
//! recur           = recur-rule-part *( ";" recur-rule-part )
//!
//! recur-rule-part = ( "FREQ" "=" freq )
//!                 / ( "UNTIL" "=" enddate )
//!                 / ( "COUNT" "=" 1*DIGIT )
//!                 / ( "INTERVAL" "=" 1*DIGIT )
//!                 / ( "BYMONTHDAY" "=" bymodaylist )
//!                 / ( "BYYEARDAY" "=" byyrdaylist )
//!                 / ( "BYWEEKNO" "=" bywknolist )
//!                 / ( "BYMONTH" "=" bymolist )
//!                 / ( "BYDAY" "=" bywdaylist )
//!                 / ( "BYSETPOS" "=" setposday )
//!                 / ( "WKST" "=" weekday )
//! ```
//!
//! The sub-daily parts (`BYSECOND`, `BYMINUTE`, `BYHOUR`) and frequencies are
//! not supported.

pub(crate) mod describe;
mod parser;
mod value;

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::Timestamp;
use jiff::tz::Offset;

use crate::ParseError;
use crate::keyword::{
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY,
};
use crate::weekday::{NthWeekDay, WeekDay};

pub use value::RRuleVal;

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Singular noun of the period, e.g. `week`.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        }
    }

    /// Adverb of the period, e.g. `weekly`.
    #[must_use]
    pub const fn adverb(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    /// `daily` for an interval of one, `every 2nd day` otherwise.
    #[must_use]
    pub fn describe(self, interval: u32) -> String {
        if interval <= 1 {
            self.adverb().to_string()
        } else {
            format!("every {} {}", describe::ordinal(interval), self.noun())
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            Frequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            Frequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            Frequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// Recurrence rule with at most one value per part.
///
/// Parsing rejects unknown and repeated parts. Serialization always emits
/// the parts in the order `FREQ`, `COUNT`, `INTERVAL`, `UNTIL`, `WKST`,
/// `BYDAY`, `BYMONTH`, `BYMONTHDAY`, `BYYEARDAY`, `BYWEEKNO`, `BYSETPOS`, so
/// that parsing the output yields the same rule.
///
/// `COUNT` and `UNTIL` may both be present here, rejecting the combination
/// is up to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RRule {
    /// Frequency of recurrence
    pub freq: Option<Frequency>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences
    pub interval: Option<u32>,
    /// Until instant
    pub until: Option<Timestamp>,
    /// Start day of week
    pub wkst: Option<WeekDay>,
    /// Day of week specifier
    pub by_day: Option<Vec<NthWeekDay>>,
    /// Month specifier
    pub by_month: Option<Vec<u8>>,
    /// Day of month specifier
    pub by_month_day: Option<Vec<i8>>,
    /// Day of year specifier
    pub by_year_day: Option<Vec<i16>>,
    /// Week number specifier
    pub by_week_no: Option<Vec<i8>>,
    /// Position in the set
    pub by_set_pos: Option<i16>,
}

impl RRule {
    /// Parse rule text. Blank text yields an empty rule.
    ///
    /// Whitespace around names and values is ignored.
    ///
    /// ## Errors
    ///
    /// Fails on the first part that has no `=`, including an empty part such
    /// as the one after a trailing `;`, names an unknown attribute, repeats
    /// an attribute, or carries an invalid value.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut rule = Self::default();
        if text.trim().is_empty() {
            return Ok(rule);
        }

        for part in text.split(';') {
            let part = part.trim();
            let (name, value) = part
                .split_once('=')
                .ok_or_else(|| ParseError::MissingSeparator {
                    part: part.to_owned(),
                })?;
            rule.store(RRuleVal::parse(name.trim(), value.trim())?)?;
        }
        Ok(rule)
    }

    /// Like [`RRule::parse`], with any failure collapsed into `None`.
    #[must_use]
    pub fn try_parse(text: &str) -> Option<Self> {
        Self::parse(text).ok()
    }

    /// Store `val` into its slot.
    ///
    /// ## Errors
    ///
    /// [`ParseError::InvalidValue`] if `val` would serialize to text the
    /// grammar rejects, [`ParseError::DuplicateAttribute`] if the slot is
    /// already populated. The rule is left unchanged on failure.
    pub fn insert(&mut self, val: RRuleVal) -> Result<(), ParseError> {
        val.validate()?;
        self.store(val)
    }

    fn store(&mut self, val: RRuleVal) -> Result<(), ParseError> {
        let name = val.name();
        match val {
            RRuleVal::Freq(v) => fill(&mut self.freq, v, name),
            RRuleVal::Count(v) => fill(&mut self.count, v, name),
            RRuleVal::Interval(v) => fill(&mut self.interval, v, name),
            RRuleVal::Until(v) => fill(&mut self.until, v, name),
            RRuleVal::Wkst(v) => fill(&mut self.wkst, v, name),
            RRuleVal::ByDay(v) => fill(&mut self.by_day, v, name),
            RRuleVal::ByMonth(v) => fill(&mut self.by_month, v, name),
            RRuleVal::ByMonthDay(v) => fill(&mut self.by_month_day, v, name),
            RRuleVal::ByYearDay(v) => fill(&mut self.by_year_day, v, name),
            RRuleVal::ByWeekNo(v) => fill(&mut self.by_week_no, v, name),
            RRuleVal::BySetPos(v) => fill(&mut self.by_set_pos, v, name),
        }
    }

    /// Populated parts in canonical order.
    #[must_use]
    pub fn values(&self) -> Vec<RRuleVal> {
        [
            self.freq.map(RRuleVal::Freq),
            self.count.map(RRuleVal::Count),
            self.interval.map(RRuleVal::Interval),
            self.until.map(RRuleVal::Until),
            self.wkst.map(RRuleVal::Wkst),
            self.by_day.clone().map(RRuleVal::ByDay),
            self.by_month.clone().map(RRuleVal::ByMonth),
            self.by_month_day.clone().map(RRuleVal::ByMonthDay),
            self.by_year_day.clone().map(RRuleVal::ByYearDay),
            self.by_week_no.clone().map(RRuleVal::ByWeekNo),
            self.by_set_pos.map(RRuleVal::BySetPos),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Rule text, empty when no part is populated.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Whether no part is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// English rendering, e.g. `Repeats every 2nd week on Tuesday, Thursday
    /// 10 times`. `UNTIL` is shown in local time at `offset`, `WKST` is
    /// left out.
    #[must_use]
    pub fn describe(&self, offset: Offset) -> String {
        let mut out = String::from("Repeats");
        if let Some(freq) = self.freq {
            out.push(' ');
            out.push_str(&freq.describe(self.interval.unwrap_or(1)));
        }

        let clauses = [
            self.count.map(RRuleVal::Count),
            self.by_day.clone().map(RRuleVal::ByDay),
            self.by_month.clone().map(RRuleVal::ByMonth),
            self.by_month_day.clone().map(RRuleVal::ByMonthDay),
            self.by_year_day.clone().map(RRuleVal::ByYearDay),
            self.by_week_no.clone().map(RRuleVal::ByWeekNo),
            self.by_set_pos.map(RRuleVal::BySetPos),
            self.until.map(RRuleVal::Until),
        ];
        for clause in clauses.iter().flatten().filter_map(|v| v.describe(offset)) {
            out.push(' ');
            out.push_str(&clause);
        }
        out
    }
}

impl FromStr for RRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for RRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, val) in self.values().iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{val}")?;
        }
        Ok(())
    }
}

fn fill<T>(slot: &mut Option<T>, value: T, name: &'static str) -> Result<(), ParseError> {
    match slot {
        Some(_) => Err(ParseError::DuplicateAttribute { name }),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}

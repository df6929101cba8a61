// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Structured, editable recurrence of a calendar event.

mod default;
mod interpret;

use jiff::Timestamp;
use jiff::tz::{Offset, TimeZone};
use remindcal_ical::{Frequency, NthWeekDay, RRule, RRuleVal, WeekDay, WeekDays};

use crate::RecurrenceError;

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CalendarRecurrenceLimit {
    /// Repeats forever
    #[default]
    NoLimit,
    /// Stops after this many occurrences
    Count(u32),
    /// Stops at this instant, inclusive
    Until(Timestamp),
}

/// Month and day of month of a yearly recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    /// Month, `1..=12`
    pub month: u8,
    /// Day of month, negative counts from the end
    pub day: i8,
}

/// Frequency specific part of a [`CalendarRecurrence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceKind {
    /// Every `interval` days
    Daily,

    /// Every `interval` weeks
    Weekly {
        /// Days of the week, `None` for the weekday of the first instance
        week_days: Option<WeekDays>,
    },

    /// Every `interval` months on the n-th weekday, e.g. the last Friday
    MonthlyByWeekDay {
        /// Day of the week
        week_day: WeekDay,
        /// Non-zero occurrence in month, negative counts from the end
        week_day_num: i8,
    },

    /// Every `interval` months on a day of month
    Monthly {
        /// Day of month, `None` for the day of the first instance
        month_day: Option<i8>,
    },

    /// Every `interval` years on a date
    Yearly {
        /// Month and day, `None` for the date of the first instance
        date: Option<MonthDay>,
    },
}

impl RecurrenceKind {
    /// The `FREQ` this kind serializes to.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            RecurrenceKind::Daily => Frequency::Daily,
            RecurrenceKind::Weekly { .. } => Frequency::Weekly,
            RecurrenceKind::MonthlyByWeekDay { .. } | RecurrenceKind::Monthly { .. } => {
                Frequency::Monthly
            }
            RecurrenceKind::Yearly { .. } => Frequency::Yearly,
        }
    }
}

/// Recurrence of an event, owning only the rule parts its frequency can
/// express.
///
/// Built either by [`CalendarRecurrence::interpret`] from provider text or by
/// one of the `default_*` factories, edited through its public fields and
/// setters, then turned back into rule text with
/// [`CalendarRecurrence::serialize`], which fails rather than emit text the
/// parser would reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRecurrence {
    /// Start of the first instance
    pub first_instance_start: Timestamp,
    /// IANA time zone of the event, e.g. `Europe/Berlin`
    pub event_time_zone: String,
    /// Positive step between periods
    pub interval: u32,
    /// End of the recurrence
    pub limit: CalendarRecurrenceLimit,
    /// Start day of week, serialized as Monday when `None`
    pub week_start: Option<WeekDay>,
    /// Frequency and its specifiers
    pub kind: RecurrenceKind,
}

impl CalendarRecurrence {
    /// Repeat `count` times, replacing any `UNTIL`.
    pub fn set_count(&mut self, count: u32) {
        self.limit = CalendarRecurrenceLimit::Count(count);
    }

    /// Repeat until `until`, replacing any `COUNT`.
    pub fn set_until(&mut self, until: Timestamp) {
        self.limit = CalendarRecurrenceLimit::Until(until);
    }

    /// Repeat forever.
    pub fn set_no_limit(&mut self) {
        self.limit = CalendarRecurrenceLimit::NoLimit;
    }

    /// Build the rule this recurrence stands for.
    ///
    /// `INTERVAL` is only emitted when it is not one, `WKST` is always
    /// emitted.
    ///
    /// ## Errors
    ///
    /// [`RecurrenceError::Parse`] when a field holds a value the rule text
    /// cannot carry, e.g. a zero `COUNT`, `INTERVAL` or day of month, and
    /// [`RecurrenceError::OrdinalOutOfRange`] for a weekday ordinal outside
    /// `-5..=-1` and `1..=5`.
    pub fn to_rrule(&self) -> Result<RRule, RecurrenceError> {
        let mut rule = RRule::default();
        rule.insert(RRuleVal::Freq(self.kind.frequency()))?;
        rule.insert(RRuleVal::Wkst(self.week_start.unwrap_or(WeekDay::Monday)))?;
        if self.interval != 1 {
            rule.insert(RRuleVal::Interval(self.interval))?;
        }

        match self.limit {
            CalendarRecurrenceLimit::NoLimit => {}
            CalendarRecurrenceLimit::Count(count) => rule.insert(RRuleVal::Count(count))?,
            CalendarRecurrenceLimit::Until(until) => rule.insert(RRuleVal::Until(until))?,
        }

        match self.kind {
            RecurrenceKind::Daily => {}
            RecurrenceKind::Weekly { week_days } => {
                if let Some(days) = week_days.filter(|days| !days.is_empty()) {
                    rule.insert(RRuleVal::ByDay(days.iter().map(NthWeekDay::every).collect()))?;
                }
            }
            RecurrenceKind::MonthlyByWeekDay {
                week_day,
                week_day_num,
            } => {
                let day = NthWeekDay::new(week_day, week_day_num).ok_or(
                    RecurrenceError::OrdinalOutOfRange {
                        ordinal: week_day_num,
                    },
                )?;
                rule.insert(RRuleVal::ByDay(vec![day]))?;
            }
            RecurrenceKind::Monthly { month_day } => {
                if let Some(day) = month_day {
                    rule.insert(RRuleVal::ByMonthDay(vec![day]))?;
                }
            }
            RecurrenceKind::Yearly { date } => {
                if let Some(MonthDay { month, day }) = date {
                    rule.insert(RRuleVal::ByMonth(vec![month]))?;
                    rule.insert(RRuleVal::ByMonthDay(vec![day]))?;
                }
            }
        }
        Ok(rule)
    }

    /// Rule text of this recurrence, parseable again by
    /// [`CalendarRecurrence::interpret`].
    ///
    /// ## Errors
    ///
    /// See [`CalendarRecurrence::to_rrule`].
    pub fn serialize(&self) -> Result<String, RecurrenceError> {
        Ok(self.to_rrule()?.serialize())
    }

    /// English rendering of the rule, `UNTIL` shown in the event time zone.
    ///
    /// ## Errors
    ///
    /// When the rule cannot be built or the event time zone is unknown.
    pub fn describe(&self) -> Result<String, RecurrenceError> {
        Ok(self.to_rrule()?.describe(self.offset()?))
    }

    /// UTC offset of the event zone at the first instance.
    fn offset(&self) -> Result<Offset, RecurrenceError> {
        let tz = TimeZone::get(&self.event_time_zone).map_err(|_| {
            RecurrenceError::InvalidTimeZone {
                tz: self.event_time_zone.clone(),
            }
        })?;
        Ok(tz.to_offset(self.first_instance_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recurrence(kind: RecurrenceKind) -> CalendarRecurrence {
        CalendarRecurrence {
            first_instance_start: "2020-11-22T09:45:13Z".parse().unwrap(),
            event_time_zone: "UTC".to_string(),
            interval: 1,
            limit: CalendarRecurrenceLimit::NoLimit,
            week_start: None,
            kind,
        }
    }

    #[test]
    fn serializes_each_kind() {
        let tu_th = [WeekDay::Tuesday, WeekDay::Thursday].into_iter().collect();
        let cases = [
            (RecurrenceKind::Daily, "FREQ=DAILY;WKST=MO"),
            (
                RecurrenceKind::Weekly { week_days: None },
                "FREQ=WEEKLY;WKST=MO",
            ),
            (
                RecurrenceKind::Weekly {
                    week_days: Some(tu_th),
                },
                "FREQ=WEEKLY;WKST=MO;BYDAY=TU,TH",
            ),
            (
                RecurrenceKind::Weekly {
                    week_days: Some(WeekDays::empty()),
                },
                "FREQ=WEEKLY;WKST=MO",
            ),
            (
                RecurrenceKind::MonthlyByWeekDay {
                    week_day: WeekDay::Friday,
                    week_day_num: -1,
                },
                "FREQ=MONTHLY;WKST=MO;BYDAY=-1FR",
            ),
            (
                RecurrenceKind::Monthly { month_day: Some(3) },
                "FREQ=MONTHLY;WKST=MO;BYMONTHDAY=3",
            ),
            (
                RecurrenceKind::Monthly { month_day: None },
                "FREQ=MONTHLY;WKST=MO",
            ),
            (
                RecurrenceKind::Yearly {
                    date: Some(MonthDay { month: 6, day: 1 }),
                },
                "FREQ=YEARLY;WKST=MO;BYMONTH=6;BYMONTHDAY=1",
            ),
            (RecurrenceKind::Yearly { date: None }, "FREQ=YEARLY;WKST=MO"),
        ];
        for (kind, expected) in cases {
            assert_eq!(recurrence(kind).serialize().unwrap(), expected);
        }
    }

    #[test]
    fn serializes_interval_and_week_start() {
        let mut rec = recurrence(RecurrenceKind::Daily);
        rec.interval = 2;
        rec.week_start = Some(WeekDay::Sunday);
        assert_eq!(rec.serialize().unwrap(), "FREQ=DAILY;INTERVAL=2;WKST=SU");
    }

    #[test]
    fn keeps_limits_exclusive() {
        let mut rec = recurrence(RecurrenceKind::Daily);
        rec.set_until("2021-01-01T00:00:00Z".parse().unwrap());
        assert_eq!(rec.serialize().unwrap(), "FREQ=DAILY;UNTIL=20210101T000000Z;WKST=MO");

        rec.set_count(5);
        let text = rec.serialize().unwrap();
        assert!(text.contains("COUNT=5"), "{text}");
        assert!(!text.contains("UNTIL="), "{text}");

        rec.set_no_limit();
        assert_eq!(rec.serialize().unwrap(), "FREQ=DAILY;WKST=MO");
    }

    #[test]
    fn rejects_fields_rule_text_cannot_carry() {
        let mut zero_count = recurrence(RecurrenceKind::Daily);
        zero_count.set_count(0);

        let mut zero_interval = recurrence(RecurrenceKind::Daily);
        zero_interval.interval = 0;

        let zero_day = recurrence(RecurrenceKind::Monthly { month_day: Some(0) });
        let far_day = recurrence(RecurrenceKind::Monthly {
            month_day: Some(40),
        });
        let bad_date = recurrence(RecurrenceKind::Yearly {
            date: Some(MonthDay { month: 13, day: 1 }),
        });

        for rec in [zero_count, zero_interval, zero_day, far_day, bad_date] {
            assert!(
                matches!(rec.serialize(), Err(RecurrenceError::Parse(_))),
                "{rec:?} should not serialize"
            );
        }
    }

    #[test]
    fn rejects_weekday_ordinal_out_of_range() {
        for ordinal in [0, 6, -6] {
            let rec = recurrence(RecurrenceKind::MonthlyByWeekDay {
                week_day: WeekDay::Friday,
                week_day_num: ordinal,
            });
            assert_eq!(
                rec.serialize(),
                Err(RecurrenceError::OrdinalOutOfRange { ordinal })
            );
            assert!(rec.describe().is_err());
        }
    }

    #[test]
    fn serialized_edits_interpret_again() {
        let mut rec = recurrence(RecurrenceKind::Monthly {
            month_day: Some(-1),
        });
        rec.interval = 3;
        rec.set_count(12);
        rec.week_start = Some(WeekDay::Sunday);

        let text = rec.serialize().unwrap();
        RRule::parse(&text).unwrap();
        let again = CalendarRecurrence::interpret(
            rec.first_instance_start,
            &rec.event_time_zone,
            &text,
            "",
            "",
            "",
        )
        .unwrap();
        assert_eq!(again, rec);

        rec.kind = RecurrenceKind::MonthlyByWeekDay {
            week_day: WeekDay::Friday,
            week_day_num: 5,
        };
        rec.set_until("2021-06-30T00:00:00Z".parse().unwrap());
        let text = rec.serialize().unwrap();
        RRule::parse(&text).unwrap();
    }

    #[test]
    fn rejects_unknown_time_zone_on_describe() {
        let mut rec = recurrence(RecurrenceKind::Daily);
        rec.event_time_zone = "Nowhere/Zone".to_string();
        assert_eq!(
            rec.describe(),
            Err(RecurrenceError::InvalidTimeZone {
                tz: "Nowhere/Zone".to_string()
            })
        );
    }

    #[test]
    fn describes_in_event_time_zone() {
        let mut rec = recurrence(RecurrenceKind::Weekly {
            week_days: Some([WeekDay::Monday].into_iter().collect()),
        });
        rec.event_time_zone = "Asia/Shanghai".to_string();
        rec.set_until("2020-12-31T15:59:59Z".parse().unwrap());
        assert_eq!(
            rec.describe().unwrap(),
            "Repeats weekly on Monday until 2020-12-31"
        );
    }
}

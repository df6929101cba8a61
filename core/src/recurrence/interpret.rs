// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use jiff::tz::TimeZone;
use remindcal_ical::keyword::{
    KW_EXDATE, KW_EXRULE, KW_RDATE, KW_RRULE_BYDAY, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY,
    KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY,
};
use remindcal_ical::{Frequency, RRule, WeekDays};

use crate::RecurrenceError;
use crate::recurrence::{CalendarRecurrence, CalendarRecurrenceLimit, MonthDay, RecurrenceKind};

impl CalendarRecurrence {
    /// Interpret the recurrence properties of an event.
    ///
    /// `first_instance_start` and `event_time_zone` locate the event, the
    /// remaining arguments are the raw `RRULE`, `RDATE`, `EXRULE` and `EXDATE`
    /// texts as stored by the calendar provider.
    ///
    /// ## Errors
    ///
    /// - `RDATE`, `EXRULE` or `EXDATE` is not blank
    /// - the time zone is unknown
    /// - the rule is malformed, empty or has no `FREQ`
    /// - the rule carries a part the frequency cannot express, or a list
    ///   part that has other than a single value where one is required
    /// - `COUNT` and `UNTIL` are both set
    #[tracing::instrument(level = "debug")]
    pub fn interpret(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        rrule: &str,
        rdate: &str,
        exrule: &str,
        exdate: &str,
    ) -> Result<Self, RecurrenceError> {
        for (property, text) in [(KW_RDATE, rdate), (KW_EXRULE, exrule), (KW_EXDATE, exdate)] {
            if !text.trim().is_empty() {
                return Err(RecurrenceError::Unsupported { property });
            }
        }

        TimeZone::get(event_time_zone).map_err(|_| RecurrenceError::InvalidTimeZone {
            tz: event_time_zone.to_owned(),
        })?;

        let rule = RRule::parse(rrule)?;
        if rule.is_empty() {
            return Err(RecurrenceError::EmptyRule);
        }

        let freq = rule.freq.ok_or(RecurrenceError::MissingFrequency)?;
        let kind = match freq {
            Frequency::Daily => interpret_daily(&rule)?,
            Frequency::Weekly => interpret_weekly(&rule)?,
            Frequency::Monthly => interpret_monthly(&rule)?,
            Frequency::Yearly => interpret_yearly(&rule)?,
        };
        let limit = interpret_limit(&rule)?;
        tracing::debug!(?kind, ?limit, "interpreted recurrence");

        Ok(Self {
            first_instance_start,
            event_time_zone: event_time_zone.to_owned(),
            interval: rule.interval.unwrap_or(1),
            limit,
            week_start: rule.wkst,
            kind,
        })
    }

    /// Like [`CalendarRecurrence::interpret`], with any failure collapsed
    /// into `None`.
    #[must_use]
    pub fn try_interpret(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        rrule: &str,
        rdate: &str,
        exrule: &str,
        exdate: &str,
    ) -> Option<Self> {
        match Self::interpret(
            first_instance_start,
            event_time_zone,
            rrule,
            rdate,
            exrule,
            exdate,
        ) {
            Ok(recurrence) => Some(recurrence),
            Err(err) => {
                tracing::debug!(%err, rrule, "failed to interpret recurrence");
                None
            }
        }
    }
}

fn interpret_daily(rule: &RRule) -> Result<RecurrenceKind, RecurrenceError> {
    reject(
        rule,
        Frequency::Daily,
        &[
            KW_RRULE_BYDAY,
            KW_RRULE_BYMONTH,
            KW_RRULE_BYMONTHDAY,
            KW_RRULE_BYYEARDAY,
            KW_RRULE_BYWEEKNO,
            KW_RRULE_BYSETPOS,
        ],
    )?;
    Ok(RecurrenceKind::Daily)
}

fn interpret_weekly(rule: &RRule) -> Result<RecurrenceKind, RecurrenceError> {
    reject(
        rule,
        Frequency::Weekly,
        &[
            KW_RRULE_BYMONTH,
            KW_RRULE_BYMONTHDAY,
            KW_RRULE_BYYEARDAY,
            KW_RRULE_BYWEEKNO,
            KW_RRULE_BYSETPOS,
        ],
    )?;

    let week_days = match &rule.by_day {
        Some(days) => {
            let mut set = WeekDays::empty();
            for day in days {
                if day.ordinal().is_some() {
                    return Err(RecurrenceError::WeekDayOrdinal {
                        entry: day.to_string(),
                    });
                }
                set.insert(day.day());
            }
            Some(set)
        }
        None => None,
    };
    Ok(RecurrenceKind::Weekly { week_days })
}

fn interpret_monthly(rule: &RRule) -> Result<RecurrenceKind, RecurrenceError> {
    const FREQ: Frequency = Frequency::Monthly;
    reject(
        rule,
        FREQ,
        &[
            KW_RRULE_BYMONTH,
            KW_RRULE_BYYEARDAY,
            KW_RRULE_BYWEEKNO,
            KW_RRULE_BYSETPOS,
        ],
    )?;

    match (&rule.by_day, &rule.by_month_day) {
        (Some(_), Some(_)) => Err(RecurrenceError::ByDayWithByMonthDay),
        (Some(days), None) => {
            let day = single(days, KW_RRULE_BYDAY, FREQ)?;
            let week_day_num = day.ordinal().ok_or_else(|| RecurrenceError::MissingOrdinal {
                entry: day.to_string(),
            })?;
            Ok(RecurrenceKind::MonthlyByWeekDay {
                week_day: day.day(),
                week_day_num,
            })
        }
        (None, Some(days)) => Ok(RecurrenceKind::Monthly {
            month_day: Some(single(days, KW_RRULE_BYMONTHDAY, FREQ)?),
        }),
        (None, None) => Ok(RecurrenceKind::Monthly { month_day: None }),
    }
}

fn interpret_yearly(rule: &RRule) -> Result<RecurrenceKind, RecurrenceError> {
    const FREQ: Frequency = Frequency::Yearly;
    reject(
        rule,
        FREQ,
        &[
            KW_RRULE_BYDAY,
            KW_RRULE_BYYEARDAY,
            KW_RRULE_BYWEEKNO,
            KW_RRULE_BYSETPOS,
        ],
    )?;

    let date = match (&rule.by_month, &rule.by_month_day) {
        (Some(months), Some(days)) => Some(MonthDay {
            month: single(months, KW_RRULE_BYMONTH, FREQ)?,
            day: single(days, KW_RRULE_BYMONTHDAY, FREQ)?,
        }),
        (Some(_), None) => {
            return Err(RecurrenceError::MissingPair {
                present: KW_RRULE_BYMONTH,
                missing: KW_RRULE_BYMONTHDAY,
                freq: FREQ,
            });
        }
        (None, Some(_)) => {
            return Err(RecurrenceError::MissingPair {
                present: KW_RRULE_BYMONTHDAY,
                missing: KW_RRULE_BYMONTH,
                freq: FREQ,
            });
        }
        (None, None) => None,
    };
    Ok(RecurrenceKind::Yearly { date })
}

fn interpret_limit(rule: &RRule) -> Result<CalendarRecurrenceLimit, RecurrenceError> {
    match (rule.count, rule.until) {
        (Some(_), Some(_)) => Err(RecurrenceError::CountAndUntil),
        (Some(count), None) => Ok(CalendarRecurrenceLimit::Count(count)),
        (None, Some(until)) => Ok(CalendarRecurrenceLimit::Until(until)),
        (None, None) => Ok(CalendarRecurrenceLimit::NoLimit),
    }
}

/// Fail on the first populated part whose name is in `attributes`.
fn reject(
    rule: &RRule,
    freq: Frequency,
    attributes: &[&'static str],
) -> Result<(), RecurrenceError> {
    match rule
        .values()
        .iter()
        .map(|val| val.name())
        .find(|name| attributes.contains(name))
    {
        Some(attribute) => Err(RecurrenceError::UnsupportedAttribute { attribute, freq }),
        None => Ok(()),
    }
}

fn single<T: Copy>(
    values: &[T],
    attribute: &'static str,
    freq: Frequency,
) -> Result<T, RecurrenceError> {
    match values {
        [value] => Ok(*value),
        _ => Err(RecurrenceError::ExpectedSingleValue {
            attribute,
            freq,
            count: values.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use remindcal_ical::WeekDay;

    use super::*;

    fn interpret(rrule: &str) -> Result<CalendarRecurrence, RecurrenceError> {
        let start = "2020-11-22T09:45:13Z".parse().unwrap();
        CalendarRecurrence::interpret(start, "UTC", rrule, "", "", "")
    }

    #[test]
    fn interprets_each_frequency() {
        let tu_th = [WeekDay::Tuesday, WeekDay::Thursday].into_iter().collect();
        let success_cases = [
            ("FREQ=DAILY", RecurrenceKind::Daily),
            ("FREQ=WEEKLY", RecurrenceKind::Weekly { week_days: None }),
            (
                "FREQ=WEEKLY;BYDAY=TU,TH",
                RecurrenceKind::Weekly {
                    week_days: Some(tu_th),
                },
            ),
            (
                "FREQ=MONTHLY;BYDAY=-1FR",
                RecurrenceKind::MonthlyByWeekDay {
                    week_day: WeekDay::Friday,
                    week_day_num: -1,
                },
            ),
            (
                "FREQ=MONTHLY;BYMONTHDAY=15",
                RecurrenceKind::Monthly {
                    month_day: Some(15),
                },
            ),
            ("FREQ=MONTHLY", RecurrenceKind::Monthly { month_day: None }),
            (
                "FREQ=YEARLY;BYMONTH=6;BYMONTHDAY=-1",
                RecurrenceKind::Yearly {
                    date: Some(MonthDay { month: 6, day: -1 }),
                },
            ),
            ("FREQ=YEARLY", RecurrenceKind::Yearly { date: None }),
        ];
        for (src, kind) in success_cases {
            let rec = interpret(src).unwrap();
            assert_eq!(rec.kind, kind, "{src}");
            assert_eq!(rec.interval, 1);
            assert_eq!(rec.limit, CalendarRecurrenceLimit::NoLimit);
            assert_eq!(rec.week_start, None);
        }
    }

    #[test]
    fn carries_interval_limit_and_week_start() {
        let rec = interpret("FREQ=DAILY;INTERVAL=3;UNTIL=20201231T000000Z;WKST=SU").unwrap();
        assert_eq!(rec.interval, 3);
        assert_eq!(
            rec.limit,
            CalendarRecurrenceLimit::Until("2020-12-31T00:00:00Z".parse().unwrap())
        );
        assert_eq!(rec.week_start, Some(WeekDay::Sunday));
    }

    #[test]
    fn rejects_invalid_rules() {
        #[rustfmt::skip]
        let fail_cases = [
            ("",                                       RecurrenceError::EmptyRule),
            ("COUNT=2",                                RecurrenceError::MissingFrequency),
            ("FREQ=DAILY;COUNT=2;UNTIL=20201231T000000Z", RecurrenceError::CountAndUntil),
            ("FREQ=MONTHLY;BYDAY=1FR;BYMONTHDAY=3",    RecurrenceError::ByDayWithByMonthDay),
            ("FREQ=DAILY;BYMONTH=1", RecurrenceError::UnsupportedAttribute {
                attribute: "BYMONTH",
                freq: Frequency::Daily,
            }),
            ("FREQ=WEEKLY;BYSETPOS=1", RecurrenceError::UnsupportedAttribute {
                attribute: "BYSETPOS",
                freq: Frequency::Weekly,
            }),
            ("FREQ=MONTHLY;BYWEEKNO=1", RecurrenceError::UnsupportedAttribute {
                attribute: "BYWEEKNO",
                freq: Frequency::Monthly,
            }),
            ("FREQ=YEARLY;BYDAY=MO", RecurrenceError::UnsupportedAttribute {
                attribute: "BYDAY",
                freq: Frequency::Yearly,
            }),
            ("FREQ=YEARLY;BYMONTH=6", RecurrenceError::MissingPair {
                present: "BYMONTH",
                missing: "BYMONTHDAY",
                freq: Frequency::Yearly,
            }),
            ("FREQ=YEARLY;BYMONTHDAY=6", RecurrenceError::MissingPair {
                present: "BYMONTHDAY",
                missing: "BYMONTH",
                freq: Frequency::Yearly,
            }),
            ("FREQ=MONTHLY;BYMONTHDAY=1,15", RecurrenceError::ExpectedSingleValue {
                attribute: "BYMONTHDAY",
                freq: Frequency::Monthly,
                count: 2,
            }),
            ("FREQ=MONTHLY;BYDAY=1MO,2MO", RecurrenceError::ExpectedSingleValue {
                attribute: "BYDAY",
                freq: Frequency::Monthly,
                count: 2,
            }),
            ("FREQ=YEARLY;BYMONTH=1,2;BYMONTHDAY=1", RecurrenceError::ExpectedSingleValue {
                attribute: "BYMONTH",
                freq: Frequency::Yearly,
                count: 2,
            }),
            ("FREQ=WEEKLY;BYDAY=1MO", RecurrenceError::WeekDayOrdinal {
                entry: "1MO".to_string(),
            }),
            ("FREQ=MONTHLY;BYDAY=MO", RecurrenceError::MissingOrdinal {
                entry: "MO".to_string(),
            }),
        ];
        for (src, expected) in fail_cases {
            assert_eq!(interpret(src), Err(expected), "{src}");
        }

        assert!(matches!(
            interpret("FREQ=DAILY;FOO=1"),
            Err(RecurrenceError::Parse(_))
        ));
    }

    #[test]
    fn rejects_extra_recurrence_properties() {
        let start = Timestamp::UNIX_EPOCH;
        let cases = [
            (("20201122T000000Z", "", ""), "RDATE"),
            (("", "FREQ=DAILY", ""), "EXRULE"),
            (("", "", "20201122T000000Z"), "EXDATE"),
        ];
        for ((rdate, exrule, exdate), property) in cases {
            let result =
                CalendarRecurrence::interpret(start, "UTC", "FREQ=DAILY", rdate, exrule, exdate);
            assert_eq!(result, Err(RecurrenceError::Unsupported { property }));
        }

        // blank text is treated as absent
        assert!(CalendarRecurrence::interpret(start, "UTC", "FREQ=DAILY", " ", "", "").is_ok());
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let start = Timestamp::UNIX_EPOCH;
        let result = CalendarRecurrence::interpret(start, "Mars/Olympus", "FREQ=DAILY", "", "", "");
        assert_eq!(
            result,
            Err(RecurrenceError::InvalidTimeZone {
                tz: "Mars/Olympus".to_string()
            })
        );
    }

    #[test]
    fn names_attribute_and_frequency_in_message() {
        let err = interpret("FREQ=DAILY;BYMONTH=1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "BYMONTH is not supported for DAILY recurrent events"
        );
    }

    #[test]
    fn swallows_failures_in_try_interpret() {
        let start = Timestamp::UNIX_EPOCH;
        assert!(CalendarRecurrence::try_interpret(start, "UTC", "FOO=1", "", "", "").is_none());
        assert!(
            CalendarRecurrence::try_interpret(start, "UTC", "FREQ=DAILY", "", "", "").is_some()
        );
    }
}

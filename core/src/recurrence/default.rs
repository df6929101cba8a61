// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrences derived from the date of a first instance, used when
//! recurrence is newly enabled on an event.

use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned};
use remindcal_ical::{WeekDay, WeekDays};

use crate::RecurrenceError;
use crate::recurrence::{CalendarRecurrence, CalendarRecurrenceLimit, MonthDay, RecurrenceKind};

impl CalendarRecurrence {
    /// Every day.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn default_daily(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
    ) -> Result<Self, RecurrenceError> {
        local(first_instance_start, event_time_zone)?;
        Ok(Self::with_kind(
            first_instance_start,
            event_time_zone,
            week_start,
            RecurrenceKind::Daily,
        ))
    }

    /// Every week on the weekday of the first instance.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn default_weekly(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
    ) -> Result<Self, RecurrenceError> {
        let day = WeekDay::from(local(first_instance_start, event_time_zone)?.weekday());
        let week_days = [day].into_iter().collect::<WeekDays>();
        Ok(Self::with_kind(
            first_instance_start,
            event_time_zone,
            week_start,
            RecurrenceKind::Weekly {
                week_days: Some(week_days),
            },
        ))
    }

    /// Every month on the day of month of the first instance.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn default_monthly(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
    ) -> Result<Self, RecurrenceError> {
        let month_day = Self::monthly_default_month_day(first_instance_start, event_time_zone)?;
        Ok(Self::with_kind(
            first_instance_start,
            event_time_zone,
            week_start,
            RecurrenceKind::Monthly {
                month_day: Some(month_day),
            },
        ))
    }

    /// Every month on the n-th weekday of the first instance, counted from
    /// the end of the month when `take_last` is set.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn default_monthly_by_week_day(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
        take_last: bool,
    ) -> Result<Self, RecurrenceError> {
        let (week_day, week_day_num) =
            Self::week_day_and_ordinal(first_instance_start, event_time_zone, take_last)?;
        Ok(Self::with_kind(
            first_instance_start,
            event_time_zone,
            week_start,
            RecurrenceKind::MonthlyByWeekDay {
                week_day,
                week_day_num,
            },
        ))
    }

    /// Every year on the month and day of the first instance.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn default_yearly(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
    ) -> Result<Self, RecurrenceError> {
        let local = local(first_instance_start, event_time_zone)?;
        let date = MonthDay {
            month: local.month().unsigned_abs(),
            day: local.day(),
        };
        Ok(Self::with_kind(
            first_instance_start,
            event_time_zone,
            week_start,
            RecurrenceKind::Yearly { date: Some(date) },
        ))
    }

    /// Day of month of the first instance in the event time zone.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn monthly_default_month_day(
        first_instance_start: Timestamp,
        event_time_zone: &str,
    ) -> Result<i8, RecurrenceError> {
        Ok(local(first_instance_start, event_time_zone)?.day())
    }

    /// Weekday of the first instance and its occurrence within the month.
    ///
    /// The occurrence counts from the start of the month, e.g. `4` for the
    /// fourth Sunday. With `take_last` it counts from the end instead: `-1`
    /// minus the number of the same weekdays still to come in the month.
    ///
    /// ## Errors
    ///
    /// If `event_time_zone` is not a known time zone.
    pub fn week_day_and_ordinal(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        take_last: bool,
    ) -> Result<(WeekDay, i8), RecurrenceError> {
        let local = local(first_instance_start, event_time_zone)?;
        let week_day = WeekDay::from(local.weekday());
        let date = local.date();
        if !take_last {
            return Ok((week_day, (date.day() - 1) / 7 + 1));
        }

        // at most four more of the same weekday fit in a month
        let mut remaining: i8 = 0;
        let mut cursor = date;
        loop {
            match cursor.checked_add(Span::new().days(7)) {
                Ok(next) if next.month() == date.month() => {
                    remaining += 1;
                    cursor = next;
                }
                _ => break,
            }
        }
        tracing::debug!(%date, %week_day, remaining, "counted remaining weekdays in month");
        Ok((week_day, -1 - remaining))
    }

    /// Days, `0..=6`, to move the first instance forward so that it lands on
    /// one of `week_days`. Zero if it already does or nothing is selected.
    ///
    /// ## Errors
    ///
    /// If the event time zone is not a known time zone.
    pub fn generate_start_time_adjust(&self, week_days: WeekDays) -> Result<u8, RecurrenceError> {
        let local = local(self.first_instance_start, &self.event_time_zone)?;
        Ok(week_days.days_until_selected(local.weekday().into()))
    }

    fn with_kind(
        first_instance_start: Timestamp,
        event_time_zone: &str,
        week_start: WeekDay,
        kind: RecurrenceKind,
    ) -> Self {
        Self {
            first_instance_start,
            event_time_zone: event_time_zone.to_owned(),
            interval: 1,
            limit: CalendarRecurrenceLimit::NoLimit,
            week_start: Some(week_start),
            kind,
        }
    }
}

/// The instant in the given zone.
fn local(timestamp: Timestamp, time_zone: &str) -> Result<Zoned, RecurrenceError> {
    let tz = TimeZone::get(time_zone).map_err(|_| RecurrenceError::InvalidTimeZone {
        tz: time_zone.to_owned(),
    })?;
    Ok(timestamp.to_zoned(tz))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2020-11-22T09:45:13Z, the 4th and second to last Sunday of November
    const FOURTH_SUNDAY_MS: i64 = 1_606_038_313_290;

    fn fourth_sunday() -> Timestamp {
        Timestamp::from_millisecond(FOURTH_SUNDAY_MS).unwrap()
    }

    #[test]
    fn derives_week_day_ordinal() {
        let start = fourth_sunday();
        assert_eq!(
            CalendarRecurrence::week_day_and_ordinal(start, "UTC", false).unwrap(),
            (WeekDay::Sunday, 4)
        );
        assert_eq!(
            CalendarRecurrence::week_day_and_ordinal(start, "UTC", true).unwrap(),
            (WeekDay::Sunday, -2)
        );
    }

    #[test]
    fn derives_last_week_day_ordinal() {
        let cases = [
            // last Friday of a 4-Friday month
            ("2021-02-26T12:00:00Z", WeekDay::Friday, 4, -1),
            // 1st Monday of a 5-Monday month
            ("2021-03-01T12:00:00Z", WeekDay::Monday, 1, -5),
            // last day of a 31-day month
            ("2021-01-31T12:00:00Z", WeekDay::Sunday, 5, -1),
        ];
        for (src, day, nth, last) in cases {
            let start: Timestamp = src.parse().unwrap();
            assert_eq!(
                CalendarRecurrence::week_day_and_ordinal(start, "UTC", false).unwrap(),
                (day, nth),
                "{src}"
            );
            assert_eq!(
                CalendarRecurrence::week_day_and_ordinal(start, "UTC", true).unwrap(),
                (day, last),
                "{src}"
            );
        }
    }

    #[test]
    fn derives_in_event_time_zone() {
        // Sunday in UTC is already Monday in Tokyo
        let start: Timestamp = "2020-11-22T20:00:00Z".parse().unwrap();
        assert_eq!(
            CalendarRecurrence::monthly_default_month_day(start, "UTC").unwrap(),
            22
        );
        assert_eq!(
            CalendarRecurrence::monthly_default_month_day(start, "Asia/Tokyo").unwrap(),
            23
        );
        let weekly = CalendarRecurrence::default_weekly(start, "Asia/Tokyo", WeekDay::Monday)
            .unwrap();
        assert_eq!(weekly.serialize().unwrap(), "FREQ=WEEKLY;WKST=MO;BYDAY=MO");
    }

    #[test]
    fn creates_defaults_for_date() {
        let start = fourth_sunday();
        let cases = [
            (
                CalendarRecurrence::default_daily(start, "UTC", WeekDay::Monday),
                "FREQ=DAILY;WKST=MO",
            ),
            (
                CalendarRecurrence::default_weekly(start, "UTC", WeekDay::Sunday),
                "FREQ=WEEKLY;WKST=SU;BYDAY=SU",
            ),
            (
                CalendarRecurrence::default_monthly(start, "UTC", WeekDay::Monday),
                "FREQ=MONTHLY;WKST=MO;BYMONTHDAY=22",
            ),
            (
                CalendarRecurrence::default_monthly_by_week_day(start, "UTC", WeekDay::Monday, false),
                "FREQ=MONTHLY;WKST=MO;BYDAY=4SU",
            ),
            (
                CalendarRecurrence::default_monthly_by_week_day(start, "UTC", WeekDay::Monday, true),
                "FREQ=MONTHLY;WKST=MO;BYDAY=-2SU",
            ),
            (
                CalendarRecurrence::default_yearly(start, "UTC", WeekDay::Monday),
                "FREQ=YEARLY;WKST=MO;BYMONTH=11;BYMONTHDAY=22",
            ),
        ];
        for (rec, expected) in cases {
            let rec = rec.unwrap();
            assert_eq!(rec.interval, 1);
            assert_eq!(rec.limit, CalendarRecurrenceLimit::NoLimit);
            assert_eq!(rec.serialize().unwrap(), expected);
        }
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let start = fourth_sunday();
        let err = CalendarRecurrence::default_daily(start, "Nowhere/Zone", WeekDay::Monday);
        assert!(matches!(err, Err(RecurrenceError::InvalidTimeZone { .. })));
    }

    #[test]
    fn generates_start_time_adjust() {
        let rec = CalendarRecurrence::default_weekly(fourth_sunday(), "UTC", WeekDay::Monday)
            .unwrap();
        let tu_th = [WeekDay::Tuesday, WeekDay::Thursday].into_iter().collect();
        assert_eq!(rec.generate_start_time_adjust(tu_th).unwrap(), 2);

        let sunday = [WeekDay::Sunday].into_iter().collect();
        assert_eq!(rec.generate_start_time_adjust(sunday).unwrap(), 0);
        assert_eq!(rec.generate_start_time_adjust(WeekDays::empty()).unwrap(), 0);
    }
}

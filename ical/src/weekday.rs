// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Weekday model shared by `WKST` and `BYDAY`.

use std::fmt::{self, Display};

use strum::IntoEnumIterator;

use crate::keyword::{KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE};
use crate::rrule::describe::signed_ordinal;

/// Day of the week, in ISO order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::EnumCount,
)]
#[expect(missing_docs)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// ISO 8601 day number, Monday is 1 and Sunday is 7.
    #[must_use]
    pub const fn iso_number(self) -> u8 {
        match self {
            WeekDay::Monday => 1,
            WeekDay::Tuesday => 2,
            WeekDay::Wednesday => 3,
            WeekDay::Thursday => 4,
            WeekDay::Friday => 5,
            WeekDay::Saturday => 6,
            WeekDay::Sunday => 7,
        }
    }

    /// Inverse of [`WeekDay::iso_number`].
    #[must_use]
    pub fn from_iso_number(number: u8) -> Option<Self> {
        Self::iter().find(|day| day.iso_number() == number)
    }

    /// Two-letter code used in `BYDAY` and `WKST`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            WeekDay::Monday => KW_DAY_MO,
            WeekDay::Tuesday => KW_DAY_TU,
            WeekDay::Wednesday => KW_DAY_WE,
            WeekDay::Thursday => KW_DAY_TH,
            WeekDay::Friday => KW_DAY_FR,
            WeekDay::Saturday => KW_DAY_SA,
            WeekDay::Sunday => KW_DAY_SU,
        }
    }

    /// Inverse of [`WeekDay::code`], case-sensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|day| day.code() == code)
    }

    /// English display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WeekDay::Monday => "Monday",
            WeekDay::Tuesday => "Tuesday",
            WeekDay::Wednesday => "Wednesday",
            WeekDay::Thursday => "Thursday",
            WeekDay::Friday => "Friday",
            WeekDay::Saturday => "Saturday",
            WeekDay::Sunday => "Sunday",
        }
    }

    /// The weekday `days` days after this one.
    #[must_use]
    pub fn wrapping_add(self, days: u8) -> Self {
        jiff::civil::Weekday::from(self).wrapping_add(days).into()
    }

    const fn bit(self) -> u8 {
        1 << (self.iso_number() - 1)
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<jiff::civil::Weekday> for WeekDay {
    fn from(value: jiff::civil::Weekday) -> Self {
        use jiff::civil::Weekday;
        match value {
            Weekday::Monday => WeekDay::Monday,
            Weekday::Tuesday => WeekDay::Tuesday,
            Weekday::Wednesday => WeekDay::Wednesday,
            Weekday::Thursday => WeekDay::Thursday,
            Weekday::Friday => WeekDay::Friday,
            Weekday::Saturday => WeekDay::Saturday,
            Weekday::Sunday => WeekDay::Sunday,
        }
    }
}

impl From<WeekDay> for jiff::civil::Weekday {
    fn from(value: WeekDay) -> Self {
        match value {
            WeekDay::Monday => Self::Monday,
            WeekDay::Tuesday => Self::Tuesday,
            WeekDay::Wednesday => Self::Wednesday,
            WeekDay::Thursday => Self::Thursday,
            WeekDay::Friday => Self::Friday,
            WeekDay::Saturday => Self::Saturday,
            WeekDay::Sunday => Self::Sunday,
        }
    }
}

/// Day of week with optional occurrence within the month.
///
/// A positive ordinal counts from the start of the month, a negative one
/// from its end; `None` matches every such weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthWeekDay {
    day: WeekDay,
    ordinal: Option<i8>,
}

impl NthWeekDay {
    /// Largest magnitude an ordinal may have, a month holds at most five of
    /// any weekday.
    pub const MAX_ORDINAL: i8 = 5;

    /// Every occurrence of `day`.
    #[must_use]
    pub const fn every(day: WeekDay) -> Self {
        Self { day, ordinal: None }
    }

    /// The `ordinal`-th occurrence of `day`, `None` if the ordinal is zero or
    /// out of range.
    #[must_use]
    pub fn new(day: WeekDay, ordinal: i8) -> Option<Self> {
        Self::is_valid_ordinal(ordinal).then_some(Self {
            day,
            ordinal: Some(ordinal),
        })
    }

    /// Whether `ordinal` is one of `-5..=-1` or `1..=5`.
    #[must_use]
    pub const fn is_valid_ordinal(ordinal: i8) -> bool {
        ordinal != 0 && ordinal.unsigned_abs() <= Self::MAX_ORDINAL.unsigned_abs()
    }

    /// Day of the week
    #[must_use]
    pub const fn day(&self) -> WeekDay {
        self.day
    }

    /// Occurrence in month
    #[must_use]
    pub const fn ordinal(&self) -> Option<i8> {
        self.ordinal
    }

    /// Human readable form, e.g. "1st Monday", "last Friday" or
    /// "2nd last Tuesday".
    #[must_use]
    pub fn describe(&self) -> String {
        let name = self.day.name();
        match self.ordinal {
            None => name.to_string(),
            Some(n) => format!("{} {name}", signed_ordinal(n.into())),
        }
    }
}

impl Display for NthWeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

impl From<WeekDay> for NthWeekDay {
    fn from(day: WeekDay) -> Self {
        Self::every(day)
    }
}

/// A set of weekdays without ordinals, as used by weekly rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekDays(u8);

impl WeekDays {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether `day` is selected.
    #[must_use]
    pub const fn contains(self, day: WeekDay) -> bool {
        self.0 & day.bit() != 0
    }

    /// Select `day`.
    pub fn insert(&mut self, day: WeekDay) {
        self.0 |= day.bit();
    }

    /// Deselect `day`.
    pub fn remove(&mut self, day: WeekDay) {
        self.0 &= !day.bit();
    }

    /// Whether no day is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected days.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Selected days, Monday first.
    pub fn iter(self) -> impl Iterator<Item = WeekDay> {
        WeekDay::iter().filter(move |day| self.contains(*day))
    }

    /// Smallest number of days, `0..=6`, to move forward from `from` to land
    /// on a selected day. Zero when nothing is selected.
    #[must_use]
    pub fn days_until_selected(self, from: WeekDay) -> u8 {
        (0..7)
            .find(|&n| self.contains(from.wrapping_add(n)))
            .unwrap_or(0)
    }
}

impl FromIterator<WeekDay> for WeekDays {
    fn from_iter<T: IntoIterator<Item = WeekDay>>(iter: T) -> Self {
        let mut days = Self::empty();
        for day in iter {
            days.insert(day);
        }
        days
    }
}

impl Display for WeekDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! English phrases for recurrence rules.

use jiff::Timestamp;
use jiff::tz::{Offset, TimeZone};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `1` -> `1st`, `12` -> `12th`, `22` -> `22nd`
pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Ordinal counted from the start when positive and from the end when
/// negative: `2` -> `2nd`, `-1` -> `last`, `-3` -> `3rd last`.
pub(crate) fn signed_ordinal(n: i32) -> String {
    match n {
        -1 => "last".to_string(),
        n if n < 0 => format!("{} last", ordinal(n.unsigned_abs())),
        n => ordinal(n.unsigned_abs()),
    }
}

pub(crate) fn month_name(month: u8) -> String {
    usize::from(month)
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i))
        .map_or_else(|| month.to_string(), |name| (*name).to_string())
}

/// Join with `", "`.
pub(crate) fn join<T>(items: impl IntoIterator<Item = T>, f: impl Fn(T) -> String) -> String {
    items.into_iter().map(f).collect::<Vec<_>>().join(", ")
}

/// Render an instant in the local time given by `offset`, dropping the time
/// when it is the last second of the day.
pub(crate) fn local_date_time(timestamp: Timestamp, offset: Offset) -> String {
    let local = timestamp.to_zoned(TimeZone::fixed(offset));
    if local.hour() == 23 && local.minute() == 59 && local.second() == 59 {
        local.strftime("%Y-%m-%d").to_string()
    } else {
        local.strftime("%Y-%m-%d %H:%M").to_string()
    }
}

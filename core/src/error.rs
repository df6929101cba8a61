// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use remindcal_ical::{Frequency, ParseError};

/// Errors raised while turning rule text into a structured recurrence.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// The rule text itself is malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A recurrence property that cannot be edited, e.g. `RDATE`
    #[error("{property} is not supported")]
    Unsupported {
        /// The property name
        property: &'static str,
    },

    /// The rule has no parts at all
    #[error("Recurrence rule is empty")]
    EmptyRule,

    /// The rule has parts but no `FREQ`
    #[error("Recurrence rule has no FREQ")]
    MissingFrequency,

    /// A rule part that has no meaning for the frequency
    #[error("{attribute} is not supported for {freq} recurrent events")]
    UnsupportedAttribute {
        /// The rule part name
        attribute: &'static str,
        /// The frequency of the rule
        freq: Frequency,
    },

    /// Both `COUNT` and `UNTIL` are set
    #[error("COUNT and UNTIL cannot both be set")]
    CountAndUntil,

    /// Both `BYDAY` and `BYMONTHDAY` are set on a monthly rule
    #[error("BYDAY and BYMONTHDAY cannot both be set for MONTHLY recurrent events")]
    ByDayWithByMonthDay,

    /// A list part with other than exactly one value
    #[error("{attribute} must have exactly one value for {freq} recurrent events, got {count}")]
    ExpectedSingleValue {
        /// The rule part name
        attribute: &'static str,
        /// The frequency of the rule
        freq: Frequency,
        /// Number of values found
        count: usize,
    },

    /// One part of a pair is set without the other
    #[error("{present} requires {missing} for {freq} recurrent events")]
    MissingPair {
        /// The rule part that is present
        present: &'static str,
        /// The rule part that is missing
        missing: &'static str,
        /// The frequency of the rule
        freq: Frequency,
    },

    /// A weekly `BYDAY` entry carries an ordinal
    #[error("BYDAY entry '{entry}' must not have an ordinal for WEEKLY recurrent events")]
    WeekDayOrdinal {
        /// The offending entry, e.g. `1MO`
        entry: String,
    },

    /// A monthly `BYDAY` entry lacks an ordinal
    #[error("BYDAY entry '{entry}' must have an ordinal for MONTHLY recurrent events")]
    MissingOrdinal {
        /// The offending entry, e.g. `MO`
        entry: String,
    },

    /// A monthly weekday ordinal outside `-5..=-1` and `1..=5`
    #[error("Weekday ordinal {ordinal} is out of range, expected 1..=5 or -5..=-1")]
    OrdinalOutOfRange {
        /// The offending ordinal
        ordinal: i8,
    },

    /// The event time zone is not a known IANA zone
    #[error("Unknown time zone '{tz}'")]
    InvalidTimeZone {
        /// The offending zone name
        tz: String,
    },
}

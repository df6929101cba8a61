// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Structured recurrence of calendar events, interpreted from and serialized
//! back to iCalendar recurrence rules.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod config;
mod error;
pub mod provider;
mod recurrence;

pub use crate::config::{APP_NAME, Config};
pub use crate::error::RecurrenceError;
pub use crate::recurrence::{CalendarRecurrence, CalendarRecurrenceLimit, MonthDay, RecurrenceKind};
pub use remindcal_ical::{
    Frequency, NthWeekDay, ParseError, RRule, RRuleVal, WeekDay, WeekDays, format_duration,
    parse_duration,
};

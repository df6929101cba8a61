// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and render iCalendar recurrence rules and duration literals.

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

mod duration;
mod error;
pub mod keyword;
mod rrule;
mod weekday;

pub use crate::duration::{format_duration, parse_duration};
pub use crate::error::ParseError;
pub use crate::rrule::{Frequency, RRule, RRuleVal};
pub use crate::weekday::{NthWeekDay, WeekDay, WeekDays};

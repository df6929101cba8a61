// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration literal codec as used by calendar providers (RFC 2445 Section 4.3.6).

use jiff::SignedDuration;

use crate::ParseError;

const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_MINUTE: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before `P`, an optional sign may appear
    Start,
    /// Accumulating the digits of a component
    InDigit,
    /// After `P`, `T` or a unit designator, waiting for digits or `T`
    InTimeUnit,
}

/// Decode a duration literal into a signed span.
///
/// Format Definition:
///
/// ```txt
/// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
///
/// dur-date   = dur-day [dur-time]
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// dur-week   = 1*DIGIT "W"
/// dur-hour   = 1*DIGIT "H" [dur-minute]
/// dur-minute = 1*DIGIT "M" [dur-second]
/// dur-second = 1*DIGIT "S"
/// dur-day    = 1*DIGIT "D"
/// ```
///
/// The scanner is lenient about the order of the components: each unit
/// designator adds its accumulated digits to a running total, and `T` only
/// separates.
///
/// ## Errors
///
/// Returns [`ParseError::InvalidDuration`] when the text is missing `P`,
/// contains a character outside the grammar, has a designator without
/// digits, ends in digits or overflows. A bare `P`, `PT` or `-P` carries no
/// component and decodes to zero.
pub fn parse_duration(text: &str) -> Result<SignedDuration, ParseError> {
    let invalid = || ParseError::InvalidDuration {
        text: text.to_owned(),
    };

    let mut state = State::Start;
    let mut sign = None;
    let mut digits: i64 = 0;
    let mut total: i64 = 0;

    for c in text.chars() {
        state = match (state, c) {
            (State::Start, '+' | '-') if sign.is_none() => {
                sign = Some(c);
                State::Start
            }
            (State::Start, 'P') => State::InTimeUnit,
            (State::InTimeUnit | State::InDigit, '0'..='9') => {
                let digit = c.to_digit(10).map(i64::from).ok_or_else(invalid)?;
                digits = digits
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or_else(invalid)?;
                State::InDigit
            }
            (State::InTimeUnit, 'T') => State::InTimeUnit,
            (State::InDigit, 'W' | 'D' | 'H' | 'M' | 'S') => {
                total = digits
                    .checked_mul(unit_seconds(c))
                    .and_then(|v| total.checked_add(v))
                    .ok_or_else(invalid)?;
                digits = 0;
                State::InTimeUnit
            }
            _ => return Err(invalid()),
        };
    }

    if state != State::InTimeUnit {
        return Err(invalid());
    }

    let seconds = match sign {
        Some('-') => -total,
        _ => total,
    };
    Ok(SignedDuration::from_secs(seconds))
}

/// Encode a span as the canonical `P{seconds}S` literal.
///
/// Sub-second precision is truncated. Negative spans carry a leading `-`.
#[must_use]
pub fn format_duration(duration: SignedDuration) -> String {
    let seconds = duration.as_secs();
    if seconds < 0 {
        format!("-P{}S", seconds.unsigned_abs())
    } else {
        format!("P{seconds}S")
    }
}

const fn unit_seconds(designator: char) -> i64 {
    match designator {
        'W' => SECONDS_PER_WEEK,
        'D' => SECONDS_PER_DAY,
        'H' => SECONDS_PER_HOUR,
        'M' => SECONDS_PER_MINUTE,
        _ => 1,
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the values of recurrence rule parts, RFC 5545 Section 3.3.10.

use std::borrow::Cow;

use chumsky::error::RichPattern;
use chumsky::extra::{self, ParserExtra};
use chumsky::input::{Input, Stream};
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::ParseError;
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_FREQ,
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY,
    KW_RRULE_UNTIL,
};
use crate::rrule::Frequency;
use crate::weekday::{NthWeekDay, WeekDay};

type CharStream<'src> = Stream<std::str::Chars<'src>>;
type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Failure reasons when a specific value was expected but not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueExpected {
    /// A positive integer that fits 32 bits
    PositiveInteger,
    /// A UTC date-time in `YYYYMMDDTHHMMSSZ` form
    UtcDateTime,
    /// A weekday ordinal in `-5..=-1` or `1..=5`
    Ordinal,
    /// A month number in `1..=12`
    MonthNum,
    /// A day of month in `-31..=-1` or `1..=31`
    MonthDayNum,
    /// A day of year in `-366..=-1` or `1..=366`
    YearDayNum,
    /// A week number in `-53..=-1` or `1..=53`
    WeekNum,
}

impl From<ValueExpected> for RichPattern<'_, char> {
    fn from(expected: ValueExpected) -> Self {
        match expected {
            ValueExpected::PositiveInteger => Self::Label(Cow::Borrowed("positive integer")),
            ValueExpected::UtcDateTime => {
                Self::Label(Cow::Borrowed("UTC date-time YYYYMMDDTHHMMSSZ"))
            }
            ValueExpected::Ordinal => Self::Label(Cow::Borrowed("weekday ordinal 1..5 or -5..-1")),
            ValueExpected::MonthNum => Self::Label(Cow::Borrowed("month 1..12")),
            ValueExpected::MonthDayNum => {
                Self::Label(Cow::Borrowed("day of month 1..31 or -31..-1"))
            }
            ValueExpected::YearDayNum => {
                Self::Label(Cow::Borrowed("day of year 1..366 or -366..-1"))
            }
            ValueExpected::WeekNum => Self::Label(Cow::Borrowed("week number 1..53 or -53..-1")),
        }
    }
}

pub(crate) fn parse_freq(value: &str) -> Result<Frequency, ParseError> {
    parse_value(KW_RRULE_FREQ, value, freq::<'_, CharStream<'_>, Extra<'_>>())
}

pub(crate) fn parse_positive(name: &'static str, value: &str) -> Result<u32, ParseError> {
    parse_value(
        name,
        value,
        int_in::<'_, CharStream<'_>, Extra<'_>, u32>(1, i32::MAX, ValueExpected::PositiveInteger),
    )
}

pub(crate) fn parse_until(value: &str) -> Result<Timestamp, ParseError> {
    parse_value(
        KW_RRULE_UNTIL,
        value,
        utc_date_time::<'_, CharStream<'_>, Extra<'_>>(),
    )
}

pub(crate) fn parse_weekday(name: &'static str, value: &str) -> Result<WeekDay, ParseError> {
    parse_value(name, value, weekday::<'_, CharStream<'_>, Extra<'_>>())
}

pub(crate) fn parse_by_day(name: &'static str, value: &str) -> Result<Vec<NthWeekDay>, ParseError> {
    parse_value(name, value, bywdaylist::<'_, CharStream<'_>, Extra<'_>>())
}

pub(crate) fn parse_by_month(name: &'static str, value: &str) -> Result<Vec<u8>, ParseError> {
    let monthnum = int_in::<'_, CharStream<'_>, Extra<'_>, u8>(1, 12, ValueExpected::MonthNum);
    parse_value(name, value, list(monthnum))
}

pub(crate) fn parse_by_month_day(name: &'static str, value: &str) -> Result<Vec<i8>, ParseError> {
    let monthdaynum =
        int_in::<'_, CharStream<'_>, Extra<'_>, i8>(-31, 31, ValueExpected::MonthDayNum);
    parse_value(name, value, list(monthdaynum))
}

pub(crate) fn parse_by_year_day(name: &'static str, value: &str) -> Result<Vec<i16>, ParseError> {
    let yeardaynum =
        int_in::<'_, CharStream<'_>, Extra<'_>, i16>(-366, 366, ValueExpected::YearDayNum);
    parse_value(name, value, list(yeardaynum))
}

pub(crate) fn parse_by_week_no(name: &'static str, value: &str) -> Result<Vec<i8>, ParseError> {
    let weeknum = int_in::<'_, CharStream<'_>, Extra<'_>, i8>(-53, 53, ValueExpected::WeekNum);
    parse_value(name, value, list(weeknum))
}

pub(crate) fn parse_set_pos(name: &'static str, value: &str) -> Result<i16, ParseError> {
    parse_value(
        name,
        value,
        int_in::<'_, CharStream<'_>, Extra<'_>, i16>(-366, 366, ValueExpected::YearDayNum),
    )
}

/// Run `parser` over the whole of `value`, turning its reports into a
/// [`ParseError::InvalidValue`] for the rule part `name`.
fn parse_value<'src, O>(
    name: &'static str,
    value: &'src str,
    parser: impl Parser<'src, CharStream<'src>, O, Extra<'src>>,
) -> Result<O, ParseError> {
    parser
        .then_ignore(end())
        .parse(Stream::from_iter(value.chars()))
        .into_result()
        .map_err(|errs| ParseError::InvalidValue {
            name,
            value: value.to_owned(),
            reason: errs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
}

/// ```txt
/// freq        = "SECONDLY" / "MINUTELY" / "HOURLY" / "DAILY"
///             / "WEEKLY" / "MONTHLY" / "YEARLY"
/// ```
///
/// Only the day-or-coarser frequencies are accepted.
fn freq<'src, I, E>() -> impl Parser<'src, I, Frequency, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_RRULE_FREQ_DAILY).to(Frequency::Daily),
        just(KW_RRULE_FREQ_WEEKLY).to(Frequency::Weekly),
        just(KW_RRULE_FREQ_MONTHLY).to(Frequency::Monthly),
        just(KW_RRULE_FREQ_YEARLY).to(Frequency::Yearly),
    ))
}

/// ```txt
/// enddate     = date-value "T" time-value "Z"
/// ```
///
/// Only the 16 character UTC form `YYYYMMDDTHHMMSSZ` is accepted, the `T`
/// and `Z` markers are case-insensitive. The 15 character floating form
/// `YYYYMMDDTHHMMSS` fails, and so does any longer value such as
/// `19971224T000000ZZ` or a local time qualified with a `TZID`.
fn utc_date_time<'src, I, E>() -> impl Parser<'src, I, Timestamp, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let fixed = |width: usize| {
        select! { c @ '0'..='9' => c }
            .repeated()
            .exactly(width)
            .collect::<String>()
            .try_map_with(|str, e| {
                lexical::parse::<i16, _>(&str).map_err(|_| {
                    E::Error::expected_found([ValueExpected::UtcDateTime], None, e.span())
                })
            })
    };

    fixed(4)
        .then(fixed(2))
        .then(fixed(2))
        .then_ignore(choice((just('T'), just('t'))))
        .then(fixed(2))
        .then(fixed(2))
        .then(fixed(2))
        .then_ignore(choice((just('Z'), just('z'))))
        .try_map(|(((((year, month), day), hour), minute), second), span| {
            utc_timestamp(year, month, day, hour, minute, second).ok_or_else(|| {
                E::Error::expected_found([ValueExpected::UtcDateTime], None, span)
            })
        })
}

fn utc_timestamp(
    year: i16,
    month: i16,
    day: i16,
    hour: i16,
    minute: i16,
    second: i16,
) -> Option<Timestamp> {
    let datetime = jiff::civil::DateTime::new(
        year,
        i8::try_from(month).ok()?,
        i8::try_from(day).ok()?,
        i8::try_from(hour).ok()?,
        i8::try_from(minute).ok()?,
        i8::try_from(second).ok()?,
        0,
    )
    .ok()?;
    datetime
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

/// ```txt
/// bywdaylist  = ( weekdaynum *("," weekdaynum) )
/// ```
fn bywdaylist<'src, I, E>() -> impl Parser<'src, I, Vec<NthWeekDay>, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    list(weekdaynum())
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// ```
///
/// The ordinal is restricted to the occurrences a month can hold.
fn weekdaynum<'src, I, E>() -> impl Parser<'src, I, NthWeekDay, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let max = i32::from(NthWeekDay::MAX_ORDINAL);
    int_in::<'src, I, E, i8>(-max, max, ValueExpected::Ordinal)
        .or_not()
        .then(weekday())
        .try_map(|(ordinal, day), span| match ordinal {
            None => Ok(NthWeekDay::every(day)),
            Some(n) => NthWeekDay::new(day, n)
                .ok_or_else(|| E::Error::expected_found([ValueExpected::Ordinal], None, span)),
        })
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src, I, E>() -> impl Parser<'src, I, WeekDay, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_DAY_SU).to(WeekDay::Sunday),
        just(KW_DAY_MO).to(WeekDay::Monday),
        just(KW_DAY_TU).to(WeekDay::Tuesday),
        just(KW_DAY_WE).to(WeekDay::Wednesday),
        just(KW_DAY_TH).to(WeekDay::Thursday),
        just(KW_DAY_FR).to(WeekDay::Friday),
        just(KW_DAY_SA).to(WeekDay::Saturday),
    ))
}

/// A non-empty COMMA-separated list, whitespace around each item is ignored.
fn list<'src, I, O, E>(item: impl Parser<'src, I, O, E>) -> impl Parser<'src, I, Vec<O>, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    item.padded().separated_by(just(',')).at_least(1).collect()
}

/// A signed, non-zero integer within `min..=max`.
fn int_in<'src, I, E, T>(min: i32, max: i32, expected: ValueExpected) -> impl Parser<'src, I, T, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
    T: TryFrom<i32>,
{
    is_positive()
        .then(digits())
        .try_map(move |(positive, n), span| {
            let n = if positive { n } else { -n };
            if n == 0 || n < min || n > max {
                return Err(E::Error::expected_found([expected], None, span));
            }
            T::try_from(n).map_err(|_| E::Error::expected_found([expected], None, span))
        })
}

/// 1*DIGIT, bounded so the value fits an `i32`
fn digits<'src, I, E>() -> impl Parser<'src, I, i32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(9)
        .collect::<String>()
        .try_map_with(|str, e| {
            lexical::parse::<i32, _>(&str).map_err(|_| {
                E::Error::expected_found([ValueExpected::PositiveInteger], None, e.span())
            })
        })
}

fn is_positive<'src, I, E>() -> impl Parser<'src, I, bool, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }
        .or_not()
        .map(|c| !matches!(c, Some('-')))
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar provider seam: event records as the provider stores them and the
//! capability to read and write them.

use std::error::Error;
use std::hash::{DefaultHasher, Hash, Hasher};

use jiff::{SignedDuration, Timestamp};
use remindcal_ical::{ParseError, format_duration, parse_duration};

use crate::{CalendarRecurrence, RecurrenceError};

/// Event content as stored by a calendar provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventRecord {
    /// Provider specific event id
    pub id: String,
    /// Provider specific calendar id
    pub calendar_id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Location
    pub location: String,
    /// Start of the first instance
    pub start: Timestamp,
    /// IANA time zone of the event
    pub time_zone: String,
    /// Whether the event spans whole days
    pub all_day: bool,
    /// RFC 2445 duration literal, set for recurring events
    pub duration: Option<String>,
    /// `RRULE` text, empty when not recurring
    pub rrule: String,
    /// `RDATE` text
    pub rdate: String,
    /// `EXRULE` text
    pub exrule: String,
    /// `EXDATE` text
    pub exdate: String,
}

impl EventRecord {
    /// Identity hash of the event content, equal content hashes equal.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Structured recurrence of the event, `None` if it does not recur or
    /// its rule cannot be edited.
    #[must_use]
    pub fn recurrence(&self) -> Option<CalendarRecurrence> {
        if self.rrule.trim().is_empty() {
            return None;
        }

        CalendarRecurrence::try_interpret(
            self.start,
            &self.time_zone,
            &self.rrule,
            &self.rdate,
            &self.exrule,
            &self.exdate,
        )
    }

    /// Decoded duration, `None` if unset or malformed.
    #[must_use]
    pub fn duration(&self) -> Option<SignedDuration> {
        let text = self.duration.as_deref()?;
        match parse_duration(text) {
            Ok(duration) => Some(duration),
            Err(err) => {
                tracing::debug!(id = %self.id, %err, "ignoring malformed event duration");
                None
            }
        }
    }
}

/// Storage that supplies calendar events and accepts edits.
pub trait CalendarProvider {
    /// Error raised by the storage
    type Error: Error + 'static;

    /// The event with `id`, if any.
    ///
    /// ## Errors
    ///
    /// If the storage cannot be read.
    fn event(&self, id: &str) -> Result<Option<EventRecord>, Self::Error>;

    /// All events of a calendar.
    ///
    /// ## Errors
    ///
    /// If the storage cannot be read.
    fn events(&self, calendar_id: &str) -> Result<Vec<EventRecord>, Self::Error>;

    /// Replace the stored event with the same id.
    ///
    /// ## Errors
    ///
    /// If the storage cannot be written.
    fn update_event(&mut self, event: &EventRecord) -> Result<(), Self::Error>;
}

/// Errors raised by [`update_recurrence`].
#[derive(Debug, thiserror::Error)]
pub enum UpdateError<E: Error + 'static> {
    /// No event with the id exists
    #[error("Event '{id}' not found")]
    NotFound {
        /// The missing event id
        id: String,
    },

    /// The recurrence cannot be written as rule text
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// The provider failed
    #[error(transparent)]
    Provider(E),
}

/// Rewrite the recurrence of an event, `None` removes it.
///
/// Returns whether the provider was written to; an edit that leaves the
/// event content unchanged is skipped.
///
/// ## Errors
///
/// If the event does not exist, the recurrence holds a field rule text
/// cannot carry, or the provider fails. Nothing is written on error.
#[tracing::instrument(skip(provider, recurrence))]
pub fn update_recurrence<P: CalendarProvider>(
    provider: &mut P,
    event_id: &str,
    recurrence: Option<&CalendarRecurrence>,
) -> Result<bool, UpdateError<P::Error>> {
    let event = provider
        .event(event_id)
        .map_err(UpdateError::Provider)?
        .ok_or_else(|| UpdateError::NotFound {
            id: event_id.to_owned(),
        })?;

    let mut updated = event.clone();
    updated.rrule = match recurrence {
        Some(recurrence) => recurrence.serialize()?,
        None => String::new(),
    };
    if updated.content_hash() == event.content_hash() {
        tracing::debug!("recurrence unchanged, skipping update");
        return Ok(false);
    }

    tracing::debug!(rrule = %updated.rrule, "updating recurrence");
    provider
        .update_event(&updated)
        .map_err(UpdateError::Provider)?;
    Ok(true)
}

/// Decode an RFC 2445 duration literal into milliseconds.
///
/// ## Errors
///
/// If the literal is malformed or does not fit in milliseconds.
pub fn parse_rfc2445_duration(text: &str) -> Result<i64, ParseError> {
    let duration = parse_duration(text)?;
    i64::try_from(duration.as_millis()).map_err(|_| ParseError::InvalidDuration {
        text: text.to_owned(),
    })
}

/// Encode milliseconds as an RFC 2445 duration literal, `P{seconds}S`.
#[must_use]
pub fn encode_rfc2445_duration(millis: i64) -> String {
    format_duration(SignedDuration::from_millis(millis))
}

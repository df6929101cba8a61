// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while reading duration literals and recurrence rules.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not a valid RFC 2445 duration literal
    #[error("Invalid duration '{text}'")]
    InvalidDuration {
        /// The offending text
        text: String,
    },

    /// A rule part carries a value that does not match its grammar
    #[error("Invalid {name} value '{value}': {reason}")]
    InvalidValue {
        /// The rule part name, e.g. `UNTIL`
        name: &'static str,
        /// The offending value text
        value: String,
        /// What the grammar expected instead
        reason: String,
    },

    /// A rule part has no `=` between its name and value
    #[error("Rule part '{part}' is missing '='")]
    MissingSeparator {
        /// The offending rule part
        part: String,
    },

    /// A rule part name outside the supported attribute set
    #[error("Unknown RRULE attribute '{name}'")]
    UnknownAttribute {
        /// The unknown name
        name: String,
    },

    /// A rule part appears more than once in the same rule
    #[error("RRULE attribute '{name}' appears twice")]
    DuplicateAttribute {
        /// The duplicated name
        name: &'static str,
    },
}

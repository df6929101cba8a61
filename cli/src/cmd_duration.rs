// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgGroup, ArgMatches, Command, arg, value_parser};
use remindcal_core::provider::{encode_rfc2445_duration, parse_rfc2445_duration};

/// Decode a duration literal into milliseconds, or encode milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdDuration {
    Decode(String),
    Encode(i64),
}

impl CmdDuration {
    pub const NAME: &str = "duration";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Decode an RFC 2445 duration into milliseconds, or encode milliseconds")
            .arg(arg!([TEXT] "Duration literal, e.g. P15DT5H0M20S").allow_hyphen_values(true))
            .arg(
                arg!(--encode <MILLIS> "Encode milliseconds as a duration literal")
                    .value_parser(value_parser!(i64))
                    .allow_negative_numbers(true),
            )
            .group(
                ArgGroup::new("input")
                    .args(["TEXT", "encode"])
                    .required(true),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        if let Some(millis) = matches.get_one::<i64>("encode") {
            Ok(Self::Encode(*millis))
        } else if let Some(text) = matches.get_one::<String>("TEXT") {
            Ok(Self::Decode(text.clone()))
        } else {
            Err("Either a duration literal or --encode is required".into())
        }
    }

    pub fn run(self) -> Result<String, Box<dyn Error>> {
        tracing::debug!(?self, "converting duration...");
        match self {
            Self::Decode(text) => Ok(parse_rfc2445_duration(&text)?.to_string()),
            Self::Encode(millis) => Ok(encode_rfc2445_duration(millis)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_literals() {
        let success_cases = [
            ("P15DT5H0M20S", "1314020000"),
            ("-P7W", "-4233600000"),
            ("PT1H", "3600000"),
            ("P3600S", "3600000"),
            ("P", "0"),
        ];
        for (src, expected) in success_cases {
            let output = CmdDuration::Decode(src.to_string()).run().unwrap();
            assert_eq!(output, expected, "{src}");
        }

        for src in ["", "-", "P3X", "15D"] {
            let result = CmdDuration::Decode(src.to_string()).run();
            assert!(result.is_err(), "Decode {src:?} should fail");
        }
    }

    #[test]
    fn encodes_millis() {
        assert_eq!(CmdDuration::Encode(3_600_000).run().unwrap(), "P3600S");
        assert_eq!(CmdDuration::Encode(-60_000).run().unwrap(), "-P60S");
        assert_eq!(CmdDuration::Encode(0).run().unwrap(), "P0S");
    }

    #[test]
    fn parses_arguments() {
        let matches = CmdDuration::command()
            .try_get_matches_from(["duration", "-P7W"])
            .unwrap();
        assert_eq!(
            CmdDuration::from(&matches).unwrap(),
            CmdDuration::Decode("-P7W".to_string())
        );

        let matches = CmdDuration::command()
            .try_get_matches_from(["duration", "--encode", "-1000"])
            .unwrap();
        assert_eq!(
            CmdDuration::from(&matches).unwrap(),
            CmdDuration::Encode(-1000)
        );

        let result = CmdDuration::command().try_get_matches_from(["duration", "PT1H", "--encode", "1"]);
        assert!(result.is_err());
    }
}

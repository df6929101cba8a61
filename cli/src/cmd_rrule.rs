// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use remindcal_core::{Config, RRule};

use crate::util::{arg_offset, get_offset, resolve_offset};

/// Normalize a rule text and explain it in English.
#[derive(Debug, Clone)]
pub struct CmdRRule {
    pub rule: String,
    pub offset: Option<i32>,
}

impl CmdRRule {
    pub const NAME: &str = "rrule";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Normalize a recurrence rule and explain it")
            .arg(arg!(<RULE> "Recurrence rule, e.g. FREQ=WEEKLY;BYDAY=TU,TH"))
            .arg(arg_offset())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: matches
                .get_one::<String>("RULE")
                .cloned()
                .unwrap_or_default(),
            offset: get_offset(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<String, Box<dyn Error>> {
        tracing::debug!(?self, "explaining recurrence rule...");
        let offset = resolve_offset(self.offset, config)?;
        let rule = RRule::parse(&self.rule)?;
        if rule.is_empty() {
            return Err("Recurrence rule is empty".into());
        }
        Ok(format!("{rule}\n{}", rule.describe(offset)))
    }
}

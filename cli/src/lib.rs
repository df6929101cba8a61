// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface of remindcal.

mod cli;
mod cmd_default;
mod cmd_duration;
mod cmd_recurrence;
mod cmd_rrule;
mod config;
mod util;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::parse_config;

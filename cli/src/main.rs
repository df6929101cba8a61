// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! remindcal - personal calendar reminders with an iCalendar recurrence engine

use std::process::ExitCode;

use remindcal_cli::run;

fn main() -> ExitCode {
    run()
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, process::ExitCode};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use remindcal_core::APP_NAME;
use tracing_subscriber::EnvFilter;

use crate::cmd_default::CmdDefault;
use crate::cmd_duration::CmdDuration;
use crate::cmd_recurrence::CmdRecurrence;
use crate::cmd_rrule::CmdRRule;
use crate::config::parse_config;

/// Run the remindcal command-line interface.
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = Cli::parse().and_then(Cli::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    #[must_use]
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new("remind")
            .about("Inspect, derive and explain calendar recurrence rules.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(format!(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/{APP_NAME}/config.toml on Linux and \
MacOS, %LOCALAPPDATA%/{APP_NAME}/config.toml on Windows."
                    ))
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdRRule::command())
            .subcommand(CmdRecurrence::command())
            .subcommand(CmdDefault::command())
            .subcommand(CmdDuration::command())
    }

    /// Parse the command-line arguments
    ///
    /// ## Errors
    ///
    /// If the arguments are invalid.
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    ///
    /// ## Errors
    ///
    /// If the arguments are invalid.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    ///
    /// ## Errors
    ///
    /// If a subcommand argument is invalid.
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::{Default, Duration, RRule, Recurrence};
        let command = match matches.subcommand() {
            Some((CmdRRule::NAME, matches)) => RRule(CmdRRule::from(matches)),
            Some((CmdRecurrence::NAME, matches)) => Recurrence(CmdRecurrence::from(matches)),
            Some((CmdDefault::NAME, matches)) => Default(CmdDefault::from(matches)?),
            Some((CmdDuration::NAME, matches)) => Duration(CmdDuration::from(matches)?),
            _ => return Err("A subcommand is required".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    ///
    /// ## Errors
    ///
    /// If the configuration cannot be loaded or the command fails.
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config)
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Normalize and explain a recurrence rule
    RRule(CmdRRule),

    /// Interpret a recurrence rule into its structured form
    Recurrence(CmdRecurrence),

    /// Derive the default recurrence for a date
    Default(CmdDefault),

    /// Decode or encode a duration literal
    Duration(CmdDuration),
}

impl Commands {
    /// Run the command with the given configuration
    ///
    /// ## Errors
    ///
    /// If the configuration cannot be loaded or the command fails.
    pub fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config)?;

        let output = match self {
            Commands::RRule(a) => a.run(&config)?,
            Commands::Recurrence(a) => a.run(&config)?,
            Commands::Default(a) => a.run(&config)?,
            Commands::Duration(a) => a.run()?,
        };
        println!("{output}");
        Ok(())
    }
}

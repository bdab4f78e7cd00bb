//! Clap adapter for flagbind.
//!
//! This module is the optional command-line layer on top of the clap-free
//! core. It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`FlagSet::command`] turns every registered flag into a long option, and
//! [`FlagSet::parse`] feeds each occurrence to that flag's adapter, in
//! command-line order. Both `--name=value` and `--name value` are accepted;
//! presence flags (booleans) may be given bare (`--verbose`) but take an
//! explicit value only with `=` (`--verbose=false`).
//!
//! If you use a different argument parser, skip this module and drive
//! [`FlagSet::set`] yourself.

use std::ffi::OsString;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, Command};

use crate::error::FlagbindError;
use crate::flagset::FlagSet;

const REMAINING: &str = "flagbind-remaining";

impl FlagSet {
    /// A clap command with one long option per registered flag, plus a
    /// hidden catch-all for positional arguments.
    pub fn command(&self) -> Command {
        let mut command = Command::new(self.name().to_string())
            .no_binary_name(true)
            .arg(
                Arg::new(REMAINING)
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .value_parser(ValueParser::string())
                    .hide(true),
            );
        if self.flag("help").is_some() {
            command = command.disable_help_flag(true);
        }

        for flag in self.iter() {
            let arg = Arg::new(flag.name().to_string())
                .long(flag.name().to_string())
                .help(flag.usage().to_string())
                .action(ArgAction::Append)
                .value_parser(ValueParser::string());
            let arg = if flag.value().is_presence_flag() {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg.num_args(1).allow_hyphen_values(true)
            };
            command = command.arg(arg);
        }
        command
    }

    /// Parse command-line arguments (without the binary name) into the
    /// registered flags and return the positional arguments.
    ///
    /// Occurrences are applied in argument order, so later occurrences win
    /// and a rejected value stops the pass before anything after it. Syntax errors come back as [`FlagbindError::Cli`]; a value its
    /// adapter rejects comes back as [`FlagbindError::InvalidFlagValue`].
    pub fn parse<I, T>(&mut self, args: I) -> Result<Vec<String>, FlagbindError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;

        let mut occurrences: Vec<(usize, String, String)> = Vec::new();
        for flag in self.iter() {
            let name = flag.name();
            let (Some(indices), Some(values)) =
                (matches.indices_of(name), matches.get_many::<String>(name))
            else {
                continue;
            };
            occurrences.extend(
                indices
                    .zip(values)
                    .map(|(index, value)| (index, name.to_string(), value.clone())),
            );
        }
        occurrences.sort_by_key(|(index, ..)| *index);

        for (_, name, value) in occurrences {
            self.set(&name, &value)?;
        }

        Ok(matches
            .get_many::<String>(REMAINING)
            .map(|values| values.cloned().collect())
            .unwrap_or_default())
    }
}

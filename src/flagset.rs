//! The host flag set: a name-indexed collection of flag adapters.
//!
//! [`FlagRegistry`] is all registration and loading need from a host. The
//! concrete [`FlagSet`] adds direct assignment ([`FlagSet::set`]), a usage
//! listing, and two input layers: TOML files ([`FlagSet::apply_file`]) and,
//! with the `clap` feature, command-line arguments ([`FlagSet::parse`]).

use std::collections::BTreeMap;
use std::fmt;

use log::trace;

use crate::error::FlagbindError;
use crate::value::FlagValue;

/// A registry of named flags.
pub trait FlagRegistry {
    fn register(
        &mut self,
        name: &str,
        value: Box<dyn FlagValue>,
        usage: String,
    ) -> Result<(), FlagbindError>;

    fn lookup(&self, name: &str) -> Option<&dyn FlagValue>;
}

/// One registered flag.
pub struct Flag {
    name: String,
    usage: String,
    /// Textual form of the value at registration time.
    default: String,
    value: Box<dyn FlagValue>,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn default_text(&self) -> &str {
        &self.default
    }

    pub fn value(&self) -> &dyn FlagValue {
        &*self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut dyn FlagValue {
        &mut *self.value
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("value", &self.value.to_string())
            .finish()
    }
}

#[derive(Debug)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
}

impl FlagSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse `text` into the flag called `name`.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), FlagbindError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagbindError::UnknownFlag {
                name: name.to_string(),
            })?;
        trace!("{}: -{name}={text:?}", self.name);
        flag.value_mut()
            .set(text)
            .map_err(|source| FlagbindError::InvalidFlagValue {
                name: name.to_string(),
                value: text.to_string(),
                source: Box::new(source),
            })
    }

    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Usage listing, one flag per entry:
    ///
    /// ```text
    ///   -port value
    ///     	Set App.port (default "8080")
    /// ```
    pub fn defaults(&self) -> String {
        let mut out = String::new();
        for flag in self.iter() {
            let placeholder = if flag.value().is_presence_flag() {
                ""
            } else {
                " value"
            };
            out.push_str(&format!("  -{}{placeholder}\n    \t{}", flag.name, flag.usage));
            if !is_zero_text(flag) {
                out.push_str(&format!(" (default {:?})", flag.default));
            }
            out.push('\n');
        }
        out
    }
}

fn is_zero_text(flag: &Flag) -> bool {
    matches!(flag.default.as_str(), "" | "0" | "false" | "0s")
}

impl FlagRegistry for FlagSet {
    fn register(
        &mut self,
        name: &str,
        value: Box<dyn FlagValue>,
        usage: String,
    ) -> Result<(), FlagbindError> {
        if self.flags.contains_key(name) {
            return Err(FlagbindError::FlagRedefined {
                name: name.to_string(),
            });
        }
        let flag = Flag {
            name: name.to_string(),
            usage,
            default: value.to_string(),
            value,
        };
        self.flags.insert(name.to_string(), flag);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<&dyn FlagValue> {
        self.flags.get(name).map(Flag::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BoolValue, IntValue, StringValue};

    fn sample() -> FlagSet {
        let mut flags = FlagSet::new("test");
        flags
            .register("port", Box::new(IntValue(8080u16)), "Set App.port".into())
            .unwrap();
        flags
            .register("verbose", Box::new(BoolValue(false)), "Set App.verbose".into())
            .unwrap();
        flags
            .register("host", Box::new(StringValue(String::new())), "Set App.host".into())
            .unwrap();
        flags
    }

    #[test]
    fn set_updates_the_adapter() {
        let mut flags = sample();
        flags.set("port", "9000").unwrap();
        let value = flags.lookup("port").unwrap().get();
        assert_eq!(value.downcast::<u16>(), Some(9000));
        assert_eq!(flags.flag("port").unwrap().default_text(), "8080");
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut flags = sample();
        let err = flags
            .register("port", Box::new(IntValue(1u16)), String::new())
            .unwrap_err();
        assert!(matches!(err, FlagbindError::FlagRedefined { name } if name == "port"));
        assert_eq!(flags.len(), 3);
    }

    #[test]
    fn unknown_flag() {
        let mut flags = sample();
        let err = flags.set("nope", "1").unwrap_err();
        assert_eq!(err.to_string(), "no such flag -nope");
        assert!(flags.lookup("nope").is_none());
    }

    #[test]
    fn invalid_value_names_flag_and_text() {
        let mut flags = sample();
        let err = flags.set("port", "70000").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid value \"70000\" for flag -port: "), "{msg}");
        assert!(matches!(err.innermost(), FlagbindError::OutOfRange { .. }));
        let value = flags.lookup("port").unwrap().get();
        assert_eq!(value.downcast::<u16>(), Some(8080));
    }

    #[test]
    fn iteration_is_sorted() {
        let flags = sample();
        let names: Vec<&str> = flags.iter().map(Flag::name).collect();
        assert_eq!(names, ["host", "port", "verbose"]);
    }

    #[test]
    fn defaults_lists_every_flag() {
        let flags = sample();
        let usage = flags.defaults();
        assert!(usage.contains("  -port value\n    \tSet App.port (default \"8080\")\n"));
        assert!(usage.contains("  -verbose\n    \tSet App.verbose\n"));
        assert!(usage.contains("  -host value\n    \tSet App.host\n"));
    }
}

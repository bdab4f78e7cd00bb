//! Flag-value adapters: the mutable, name-bound holders the flag set parses
//! into. One adapter exists per registered flag.

use std::fmt;
use std::time::Duration;

use crate::error::FlagbindError;
use crate::list::ListValue;
use crate::parse::{self, Float, Integer};
use crate::slot::Slot;
use crate::types::Dynamic;

/// A flag's value holder. [`Display`](fmt::Display) renders the current
/// value in the same textual form [`set`](Self::set) accepts.
pub trait FlagValue: fmt::Display {
    /// Parse `text` and store the result. On failure the stored value is
    /// left untouched.
    fn set(&mut self, text: &str) -> Result<(), FlagbindError>;

    fn get(&self) -> Dynamic;

    /// Presence flags may appear without a value (`--verbose`), meaning
    /// `"true"`.
    fn is_presence_flag(&self) -> bool {
        false
    }

    fn as_list(&self) -> Option<&ListValue> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolValue(pub bool);

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FlagValue for BoolValue {
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        self.0 = parse::parse_bool(text)?;
        Ok(())
    }

    fn get(&self) -> Dynamic {
        self.0.to_dynamic()
    }

    fn is_presence_flag(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntValue<T>(pub T);

impl<T: Integer> fmt::Display for IntValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Integer> FlagValue for IntValue<T> {
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        self.0 = parse::parse_integer(text)?;
        Ok(())
    }

    fn get(&self) -> Dynamic {
        self.0.to_dynamic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatValue<T>(pub T);

impl<T: Float> fmt::Display for FloatValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Float> FlagValue for FloatValue<T> {
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        self.0 = T::parse_text(text)?;
        Ok(())
    }

    fn get(&self) -> Dynamic {
        self.0.to_dynamic()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue(pub String);

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FlagValue for StringValue {
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        text.clone_into(&mut self.0);
        Ok(())
    }

    fn get(&self) -> Dynamic {
        self.0.to_dynamic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationValue(pub Duration);

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&parse::format_duration(self.0))
    }
}

impl FlagValue for DurationValue {
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        self.0 = parse::parse_duration(text)?;
        Ok(())
    }

    fn get(&self) -> Dynamic {
        self.0.to_dynamic()
    }
}

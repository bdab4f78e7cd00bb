//! TOML file layer for a [`FlagSet`].
//!
//! A flag file is a flat TOML table whose keys are flag names:
//!
//! ```toml
//! msg = "my message"
//! elapsed = "1h15m"
//! values = [100, 15, 20]
//! ```
//!
//! Each value is turned into the same text a command line would carry and
//! handed to [`FlagSet::set`], so applying a file before
//! [`parse`](FlagSet::parse) lets command-line flags override file values.
//! Strings pass through verbatim, other scalars use their TOML spelling, and
//! arrays become the quoted comma-separated list form. Tables are rejected.

use std::path::Path;

use log::debug;
use toml::{Table, Value};

use crate::error::FlagbindError;
use crate::flagset::FlagSet;
use crate::list::join_quoted;

impl FlagSet {
    /// Read a TOML file and apply every key in it as a flag.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), FlagbindError> {
        let content = std::fs::read_to_string(path).map_err(|e| FlagbindError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: Table = toml::from_str(&content).map_err(|e| FlagbindError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("{}: applying {} flag(s) from {}", self.name(), table.len(), path.display());
        self.apply_table(&table)
    }

    /// Apply an already-parsed table. Keys are applied in table order and the
    /// first failure stops the pass.
    pub fn apply_table(&mut self, table: &Table) -> Result<(), FlagbindError> {
        for (key, value) in table {
            let text = value_text(key, value)?;
            self.set(key, &text)?;
        }
        Ok(())
    }
}

fn value_text(key: &str, value: &Value) -> Result<String, FlagbindError> {
    match value {
        Value::Array(items) => {
            let texts = items
                .iter()
                .map(|item| scalar_text(key, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(join_quoted(&texts))
        }
        other => scalar_text(key, other),
    }
}

fn scalar_text(key: &str, value: &Value) -> Result<String, FlagbindError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) => Err(FlagbindError::InvalidValue {
            key: key.to_string(),
            reason: "nested arrays are not supported".into(),
        }),
        Value::Table(_) => Err(FlagbindError::InvalidValue {
            key: key.to_string(),
            reason: "tables are not supported; flag names must be top-level keys".into(),
        }),
    }
}

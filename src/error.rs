use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagbindError {
    #[error("unable to register flags for {type_name:?}: not a struct type")]
    NotAStruct { type_name: String },

    #[error("unable to register flags for type {type_name:?}: no exported fields")]
    NoExportedFields { type_name: &'static str },

    #[error("no flag adapter registered for {shape}")]
    NoAdapter { shape: String },

    #[error("uninitialized optional: {shape} has no zero value")]
    UninitializedOptional { shape: String },

    #[error("mismatched flag and field type: flag holds {found}, field is {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("unable to lookup flag {name:?}. Was register_flags called with the same options?")]
    FlagNotRegistered { name: String },

    #[error("cannot convert between {from} and {to}: differ by more than optional wrapping")]
    Conversion { from: String, to: String },

    #[error("parsing {text:?}: invalid {expected} syntax")]
    InvalidSyntax { text: String, expected: &'static str },

    #[error("parsing {text:?}: value out of range for {target}")]
    OutOfRange { text: String, target: &'static str },

    #[error("unable to register flag for field {owner}.{field}: {source}")]
    Register {
        owner: &'static str,
        field: &'static str,
        source: Box<FlagbindError>,
    },

    #[error("unable to load flag for field {owner}.{field}: {source}")]
    Load {
        owner: &'static str,
        field: &'static str,
        source: Box<FlagbindError>,
    },

    #[error("flag redefined: {name}")]
    FlagRedefined { name: String },

    #[error("no such flag -{name}")]
    UnknownFlag { name: String },

    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidFlagValue {
        name: String,
        value: String,
        source: Box<FlagbindError>,
    },

    #[error("failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[cfg(feature = "clap")]
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl FlagbindError {
    /// Follow the field-context and flag-value wrappers down to the error
    /// that actually stopped the traversal.
    pub fn innermost(&self) -> &FlagbindError {
        match self {
            FlagbindError::Register { source, .. }
            | FlagbindError::Load { source, .. }
            | FlagbindError::InvalidFlagValue { source, .. } => source.innermost(),
            other => other,
        }
    }
}

//! Bind command-line flags to struct fields. Declare a struct once, tag the
//! fields you want exposed, and get both flag registration and population
//! from it.
//!
//! ```ignore
//! #[derive(Flags, Default)]
//! struct Config {
//!     #[tag(flag = "msg")]
//!     pub msg: Option<String>,
//!     #[tag(flag = "elapsed")]
//!     pub elapsed: Duration,
//!     #[tag(flag = "values")]
//!     pub values: Vec<i64>,
//! }
//!
//! let options = Options::new();
//! let mut flags = FlagSet::new("app");
//! register_flags(&mut flags, &Config::default(), &options)?;
//! flags.parse(std::env::args().skip(1))?;
//!
//! let mut config = Config::default();
//! load_from_flags(&flags, &mut config, &options)?;
//! ```
//!
//! With `--msg="my message" --elapsed=1h15m --values=100,15,20`, `config`
//! ends up with `msg == Some("my message")`, an elapsed time of 75 minutes
//! and `values == [100, 15, 20]`.
//!
//! # Two passes, one struct
//!
//! [`register_flags`] walks a *template* instance and registers one flag per
//! tagged field, seeded with the field's current value (which becomes the
//! flag's default). The host flag set then parses arguments into those
//! flags. [`load_from_flags`] walks a *destination* instance with the same
//! routing and copies every flag's value back.
//!
//! Both passes must use equivalent [`Options`]. Loading looks flags up by the
//! name registration computed; a mismatched tag key or prefix fails with
//! [`FlagbindError::FlagNotRegistered`].
//!
//! # Field routing
//!
//! Per exported field:
//!
//! - **`#[tag(flag = "name")]`** binds the field to the flag `prefix + name`.
//!   The tag is the literal flag name; there is no further syntax. Several
//!   tag keys can coexist (`#[tag(flag = "a", cli = "b")]`) and
//!   [`Options::tag_key`] selects which one counts.
//! - **No tag, struct type** (possibly behind `Option` layers): descend into
//!   it. Nested flags are *not* qualified by the enclosing field name; a leaf
//!   two levels down is reachable by its own tag alone.
//! - **No tag, anything else**: skipped. This is how a field opts out.
//!
//! Private fields are never listed, never inspected for tags, and never
//! descended into. Every listed field's type must implement [`Slot`]; mark a
//! `pub` field of any other type with `#[tag(skip)]` to leave it out the
//! same way.
//!
//! # Types and optional depth
//!
//! Every base type has a flag adapter, looked up by *canonical type*: the
//! type left after removing every `Option` layer. A field of type
//! `Option<Option<u16>>` uses the `u16` adapter. When loading, the flag's
//! value is converted to the destination field's exact type:
//!
//! - deeper destinations get new `Some` layers;
//! - shallower destinations drop layers, and a `None` met on the way yields
//!   the zero value of what remains;
//! - different base types never convert; that fails with
//!   [`FlagbindError::Conversion`].
//!
//! `Vec<T>` fields with an adaptable `T`, including `Option<Vec<T>>`, use
//! the list adapter: a single comma-separated, double-quote aware value
//! (`--tags='a,"b, c"'`). Each occurrence replaces the whole list.
//!
//! Built-in base types: `bool` (a presence flag: `--verbose` means
//! `--verbose=true`), all fixed-width integers, `f32`, `f64`, `String` and
//! [`Duration`](std::time::Duration) (`1h15m`, `1.5s`, `300ms`). Declare
//! your own with [`base_type!`] and give it an adapter with
//! [`Options::adapter`]:
//!
//! ```ignore
//! #[derive(Clone, Copy, Default)]
//! enum Level { #[default] Info, Debug }
//! flagbind::base_type!(Level, default);
//!
//! let options = Options::new().adapter(LevelValue);
//! ```
//!
//! # Host flag set
//!
//! Registration and loading only need [`FlagRegistry`]. The bundled
//! [`FlagSet`] implements it and adds the input layers:
//!
//! - [`FlagSet::set`]: assign one flag from text.
//! - [`FlagSet::apply_file`]: a flat TOML file of `flag = value` pairs.
//! - `FlagSet::parse` (behind the `clap` Cargo feature, on by default):
//!   command-line arguments, tokenized by [clap](https://docs.rs/clap).
//!
//! Apply the file first and the command line second, and command-line
//! values win.
//!
//! # Error handling
//!
//! All fallible operations return [`FlagbindError`]. Field failures are
//! wrapped once per struct level they pass through, so the message names
//! the full path (`Outer.inner: Inner.leaf: ...`);
//! [`FlagbindError::innermost`] gets at the root cause. Registration is not
//! transactional: flags registered before a failure stay registered.

extern crate self as flagbind;

pub mod error;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod file;
mod flagset;
mod list;
mod load;
mod options;
mod parse;
mod register;
mod resolve;
mod slot;
mod value;

#[cfg(test)]
mod fixtures;

pub use error::FlagbindError;
pub use flagbind_derive::Flags;
pub use flagset::{Flag, FlagRegistry, FlagSet};
pub use list::ListValue;
pub use load::load_from_flags;
pub use options::{Adapters, Options};
pub use parse::{Float, Integer};
pub use register::register_flags;
pub use resolve::{convert_value_to, deref_fully};
#[doc(hidden)]
pub use slot::assign_from;
pub use slot::{BaseType, Field, FieldMut, Flags, Nested, Slot};
pub use types::{BaseValue, Canonical, Dynamic, Shape};
pub use value::{BoolValue, DurationValue, FlagValue, FloatValue, IntValue, StringValue};

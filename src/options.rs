//! Options shared by [`register_flags`](crate::register_flags) and
//! [`load_from_flags`](crate::load_from_flags), including the adapter
//! registry.

use std::fmt;

use crate::error::FlagbindError;
use crate::resolve::convert_value_to;
use crate::slot::BaseType;
use crate::types::{BaseValue, Canonical, Dynamic, Shape};
use crate::value::{BoolValue, DurationValue, FlagValue, FloatValue, IntValue, StringValue};

type Factory = Box<dyn Fn(BaseValue) -> Option<Box<dyn FlagValue>>>;

/// Maps canonical base types to the factories that build their flag
/// adapters. Lookups go in insertion order.
pub struct Adapters {
    entries: Vec<(Canonical, Factory)>,
}

impl Adapters {
    /// A registry with no adapters at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adapters for every built-in base type.
    pub fn builtin() -> Self {
        let mut adapters = Self::empty();
        adapters.insert(BoolValue);
        adapters.insert(IntValue::<i8>);
        adapters.insert(IntValue::<i16>);
        adapters.insert(IntValue::<i32>);
        adapters.insert(IntValue::<i64>);
        adapters.insert(IntValue::<isize>);
        adapters.insert(IntValue::<u8>);
        adapters.insert(IntValue::<u16>);
        adapters.insert(IntValue::<u32>);
        adapters.insert(IntValue::<u64>);
        adapters.insert(IntValue::<usize>);
        adapters.insert(FloatValue::<f32>);
        adapters.insert(FloatValue::<f64>);
        adapters.insert(StringValue);
        adapters.insert(DurationValue);
        adapters
    }

    /// Register the adapter factory for `T`. An existing entry for the same
    /// canonical type is replaced where it stands.
    pub fn insert<T, A>(&mut self, factory: impl Fn(T) -> A + 'static)
    where
        T: BaseType,
        A: FlagValue + 'static,
    {
        let canonical = Canonical::of::<T>();
        let factory: Factory = Box::new(move |seed: BaseValue| {
            let seed = seed.downcast::<T>()?;
            Some(Box::new(factory(seed)) as Box<dyn FlagValue>)
        });
        match self.entries.iter_mut().find(|(known, _)| *known == canonical) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((canonical, factory)),
        }
    }

    pub fn contains(&self, canonical: &Canonical) -> bool {
        self.entries.iter().any(|(known, _)| known == canonical)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the adapter for a field's current value, seeded with that value
    /// once every optional layer is stripped.
    ///
    /// `Ok(None)` means no registered type matches. A nil seed whose base type
    /// has no zero value fails with [`FlagbindError::UninitializedOptional`].
    pub fn adapter_for(&self, value: Dynamic) -> Result<Option<Box<dyn FlagValue>>, FlagbindError> {
        let shape = value.shape();
        let Shape::Base(canonical) = shape.base() else {
            return Ok(None);
        };
        let Some((known, factory)) = self.entries.iter().find(|(known, _)| known == canonical) else {
            return Ok(None);
        };
        match convert_value_to(value, &Shape::Base(*known))? {
            Dynamic::Base(seed) => Ok(factory(seed)),
            _ => Ok(None),
        }
    }
}

impl Default for Adapters {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Adapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(canonical, _)| canonical))
            .finish()
    }
}

/// Controls how struct fields map to flag names, and which adapters are
/// available. Build once and pass the same value to both registration and
/// loading.
///
/// ```ignore
/// let options = Options::new()
///     .tag_key("flagname")
///     .prefix("lib_")
///     .adapter(|level: Level| LevelValue(level));
/// ```
#[derive(Debug)]
pub struct Options {
    tag_key: String,
    prefix: String,
    adapters: Adapters,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which tag key names a field's flag (default: `"flag"`).
    pub fn tag_key(mut self, key: &str) -> Self {
        self.tag_key = key.to_string();
        self
    }

    /// Prepended to every flag name (default: empty).
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Add or override the adapter for base type `T`.
    pub fn adapter<T, A>(mut self, factory: impl Fn(T) -> A + 'static) -> Self
    where
        T: BaseType,
        A: FlagValue + 'static,
    {
        self.adapters.insert(factory);
        self
    }

    /// Replace the whole adapter registry.
    pub fn adapters(mut self, adapters: Adapters) -> Self {
        self.adapters = adapters;
        self
    }

    pub fn key(&self) -> &str {
        &self.tag_key
    }

    pub fn name_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn registry(&self) -> &Adapters {
        &self.adapters
    }

    /// The flag name for a field tagged `tag`.
    pub fn flag_name(&self, tag: &str) -> String {
        format!("{}{tag}", self.prefix)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag_key: "flag".to_string(),
            prefix: String::new(),
            adapters: Adapters::builtin(),
        }
    }
}

//! The type model shared by registration and loading.
//!
//! Rust has no runtime reflection, so field types describe themselves through
//! [`Shape`] and hand their contents over as [`Dynamic`] values. Optional
//! wrapping (`Option<T>`) plays the role of pointer indirection: a value may
//! sit under any number of `Option` layers, and two values share a
//! *canonical* type when their shapes agree once every layer is removed.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::FlagbindError;
use crate::slot::BaseType;

/// Identity of a base value type, independent of how many optional layers
/// surround it.
#[derive(Clone, Copy)]
pub struct Canonical {
    id: TypeId,
    name: &'static str,
    zero: fn() -> Option<BaseValue>,
    clone: fn(&dyn Any) -> Box<dyn Any>,
}

impl Canonical {
    pub fn of<T: BaseType>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            zero: zero_base::<T>,
            clone: clone_base::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type's zero value, if it has one.
    pub fn zero(&self) -> Option<BaseValue> {
        (self.zero)()
    }
}

impl fmt::Debug for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Canonical").field(&self.name).finish()
    }
}

impl PartialEq for Canonical {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Canonical {}

fn zero_base<T: BaseType>() -> Option<BaseValue> {
    T::zero().map(BaseValue::new)
}

fn clone_base<T: BaseType>(value: &dyn Any) -> Box<dyn Any> {
    let value = value
        .downcast_ref::<T>()
        .expect("flagbind: base value does not match its canonical type");
    Box::new(value.clone())
}

/// Static description of a slot's type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Base(Canonical),
    Optional(Box<Shape>),
    Sequence(Box<Shape>),
    Record(&'static str),
}

impl Shape {
    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence(Box::new(element))
    }

    /// Strip every optional layer, returning the base shape and the number
    /// of layers removed.
    pub fn unwrap_depth(&self) -> (&Shape, usize) {
        let mut shape = self;
        let mut depth = 0;
        while let Shape::Optional(inner) = shape {
            shape = inner;
            depth += 1;
        }
        (shape, depth)
    }

    /// The fully unwrapped shape.
    pub fn base(&self) -> &Shape {
        self.unwrap_depth().0
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Shape::Record(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Base(canonical) => f.write_str(canonical.name()),
            Shape::Optional(inner) => write!(f, "Option<{inner}>"),
            Shape::Sequence(element) => write!(f, "Vec<{element}>"),
            Shape::Record(name) => f.write_str(name),
        }
    }
}

/// A base value together with its canonical type.
pub struct BaseValue {
    canonical: Canonical,
    value: Box<dyn Any>,
}

impl BaseValue {
    pub fn new<T: BaseType>(value: T) -> Self {
        Self {
            canonical: Canonical::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn canonical(&self) -> Canonical {
        self.canonical
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub fn downcast<T: 'static>(self) -> Option<T> {
        self.value.downcast::<T>().ok().map(|value| *value)
    }
}

impl Clone for BaseValue {
    fn clone(&self) -> Self {
        Self {
            canonical: self.canonical,
            value: (self.canonical.clone)(&*self.value),
        }
    }
}

impl fmt::Debug for BaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(..)", self.canonical.name())
    }
}

/// The opaque value a slot or flag adapter hands out.
///
/// Optional layers keep the shape of what they wrap, so an absent value
/// still knows its type.
#[derive(Clone, Debug)]
pub enum Dynamic {
    Base(BaseValue),
    Optional(Shape, Option<Box<Dynamic>>),
    Sequence(Shape, Vec<Dynamic>),
    Record(&'static str),
}

impl Dynamic {
    pub fn shape(&self) -> Shape {
        match self {
            Dynamic::Base(base) => Shape::Base(base.canonical()),
            Dynamic::Optional(inner, _) => Shape::optional(inner.clone()),
            Dynamic::Sequence(element, _) => Shape::sequence(element.clone()),
            Dynamic::Record(name) => Shape::Record(*name),
        }
    }

    /// The zero value of `shape`: `None` for optionals, an empty sequence,
    /// or the base type's zero.
    pub fn zero(shape: &Shape) -> Result<Dynamic, FlagbindError> {
        match shape {
            Shape::Base(canonical) => canonical.zero().map(Dynamic::Base).ok_or_else(|| {
                FlagbindError::UninitializedOptional {
                    shape: shape.to_string(),
                }
            }),
            Shape::Optional(inner) => Ok(Dynamic::Optional((**inner).clone(), None)),
            Shape::Sequence(element) => Ok(Dynamic::Sequence((**element).clone(), Vec::new())),
            Shape::Record(name) => Ok(Dynamic::Record(*name)),
        }
    }

    /// Rebuild a concrete value. The shape must match `T` exactly.
    pub fn downcast<T: crate::Slot>(self) -> Option<T> {
        T::from_dynamic(self)
    }

    /// Borrow the base value when this is an unwrapped base.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Dynamic::Base(base) => base.downcast_ref(),
            _ => None,
        }
    }
}

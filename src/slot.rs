//! Field slots: how a struct field's type exposes itself to the walkers.
//!
//! [`Slot`] is implemented for every base type (through [`base_type!`]), for
//! `Option<T>` (one layer of optional wrapping), for `Vec<T>` (an ordered
//! sequence) and, through `#[derive(Flags)]`, for structs. A struct also
//! implements [`Flags`], which lists its exported fields together with their
//! tags.
//!
//! [`base_type!`]: crate::base_type

use std::ops::Deref;
use std::time::Duration;

use crate::error::FlagbindError;
use crate::types::{Dynamic, Shape};

pub trait Slot: 'static {
    fn shape() -> Shape
    where
        Self: Sized;

    /// The value an absent optional of this type resolves to, if any.
    fn zero() -> Option<Self>
    where
        Self: Sized;

    /// Rebuild a value from a dynamic whose shape matches exactly.
    fn from_dynamic(value: Dynamic) -> Option<Self>
    where
        Self: Sized;

    fn slot_shape(&self) -> Shape;

    fn to_dynamic(&self) -> Dynamic;

    /// Replace the slot's contents. `value` must already have this slot's
    /// exact shape.
    fn assign(&mut self, value: Dynamic) -> Result<(), FlagbindError>;

    /// The struct behind this slot after removing every optional layer.
    /// Absent layers resolve to the struct's zero value.
    fn nested(&self) -> Option<Nested<'_>> {
        None
    }

    /// Like [`nested`](Self::nested), but absent layers are filled in with
    /// zero values so the struct can be written through.
    fn nested_mut(&mut self) -> Option<&mut dyn Flags> {
        None
    }

    fn into_nested(self: Box<Self>) -> Option<Box<dyn Flags>> {
        None
    }
}

/// A slot type that is a canonical base type. Implemented by [`base_type!`].
///
/// [`base_type!`]: crate::base_type
pub trait BaseType: Slot + Clone {
    const NAME: &'static str;
}

/// The field table of a struct.
pub trait Flags: 'static {
    fn type_name(&self) -> &'static str;

    /// Exported fields, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

type Tags = &'static [(&'static str, &'static str)];

fn lookup_tag(tags: Tags, key: &str) -> Option<&'static str> {
    tags.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
        .filter(|value| !value.is_empty())
}

pub struct Field<'a> {
    name: &'static str,
    tags: Tags,
    slot: &'a dyn Slot,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, tags: Tags, slot: &'a dyn Slot) -> Self {
        Self { name, tags, slot }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The tag declared under `key`. An empty tag counts as absent.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        lookup_tag(self.tags, key)
    }

    pub fn slot(&self) -> &'a dyn Slot {
        self.slot
    }
}

pub struct FieldMut<'a> {
    name: &'static str,
    tags: Tags,
    slot: &'a mut dyn Slot,
}

impl<'a> FieldMut<'a> {
    pub fn new(name: &'static str, tags: Tags, slot: &'a mut dyn Slot) -> Self {
        Self { name, tags, slot }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self, key: &str) -> Option<&'static str> {
        lookup_tag(self.tags, key)
    }

    pub fn slot_mut(&mut self) -> &mut dyn Slot {
        &mut *self.slot
    }
}

/// A struct reached through [`Slot::nested`]: borrowed from the field, or a
/// zero value built because an optional layer was absent.
pub enum Nested<'a> {
    Borrowed(&'a dyn Flags),
    Owned(Box<dyn Flags>),
}

impl Deref for Nested<'_> {
    type Target = dyn Flags;

    fn deref(&self) -> &Self::Target {
        match self {
            Nested::Borrowed(flags) => *flags,
            Nested::Owned(flags) => &**flags,
        }
    }
}

#[doc(hidden)]
pub fn assign_from<T: Slot>(slot: &mut T, value: Dynamic) -> Result<(), FlagbindError> {
    let found = value.shape();
    match T::from_dynamic(value) {
        Some(value) => {
            *slot = value;
            Ok(())
        }
        None => Err(FlagbindError::TypeMismatch {
            expected: slot.slot_shape().to_string(),
            found: found.to_string(),
        }),
    }
}

/// Declare a type as a canonical base type so it can be used in flagged
/// fields and registered with [`Options::adapter`](crate::Options::adapter).
///
/// `base_type!(T, default)` also gives `T` a zero value through [`Default`];
/// without it, an absent `Option<T>` cannot seed a flag.
#[macro_export]
macro_rules! base_type {
    (@impl $ty:ty, $zero:expr) => {
        impl $crate::BaseType for $ty {
            const NAME: &'static str = ::core::stringify!($ty);
        }

        impl $crate::Slot for $ty {
            fn shape() -> $crate::Shape {
                $crate::Shape::Base($crate::Canonical::of::<$ty>())
            }

            fn zero() -> ::core::option::Option<Self> {
                $zero
            }

            fn from_dynamic(value: $crate::Dynamic) -> ::core::option::Option<Self> {
                match value {
                    $crate::Dynamic::Base(base) => base.downcast::<$ty>(),
                    _ => ::core::option::Option::None,
                }
            }

            fn slot_shape(&self) -> $crate::Shape {
                <Self as $crate::Slot>::shape()
            }

            fn to_dynamic(&self) -> $crate::Dynamic {
                $crate::Dynamic::Base($crate::BaseValue::new(::core::clone::Clone::clone(self)))
            }

            fn assign(
                &mut self,
                value: $crate::Dynamic,
            ) -> ::core::result::Result<(), $crate::FlagbindError> {
                $crate::assign_from(self, value)
            }
        }
    };
    ($ty:ty, default) => {
        $crate::base_type!(
            @impl $ty,
            ::core::option::Option::Some(<$ty as ::core::default::Default>::default())
        );
    };
    ($ty:ty) => {
        $crate::base_type!(@impl $ty, ::core::option::Option::None);
    };
}

crate::base_type!(bool, default);
crate::base_type!(i8, default);
crate::base_type!(i16, default);
crate::base_type!(i32, default);
crate::base_type!(i64, default);
crate::base_type!(isize, default);
crate::base_type!(u8, default);
crate::base_type!(u16, default);
crate::base_type!(u32, default);
crate::base_type!(u64, default);
crate::base_type!(usize, default);
crate::base_type!(f32, default);
crate::base_type!(f64, default);
crate::base_type!(String, default);
crate::base_type!(Duration, default);

impl<T: Slot> Slot for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    fn zero() -> Option<Self> {
        Some(None)
    }

    fn from_dynamic(value: Dynamic) -> Option<Self> {
        match value {
            Dynamic::Optional(inner, value) if inner == T::shape() => match value {
                Some(value) => T::from_dynamic(*value).map(Some),
                None => Some(None),
            },
            _ => None,
        }
    }

    fn slot_shape(&self) -> Shape {
        Self::shape()
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Optional(
            T::shape(),
            self.as_ref().map(|value| Box::new(value.to_dynamic())),
        )
    }

    fn assign(&mut self, value: Dynamic) -> Result<(), FlagbindError> {
        assign_from(self, value)
    }

    fn nested(&self) -> Option<Nested<'_>> {
        match self {
            Some(value) => value.nested(),
            None => T::zero()
                .and_then(|zero| Box::new(zero).into_nested())
                .map(Nested::Owned),
        }
    }

    fn nested_mut(&mut self) -> Option<&mut dyn Flags> {
        if self.is_none() {
            *self = T::zero();
        }
        self.as_mut().and_then(|value| value.nested_mut())
    }

    fn into_nested(self: Box<Self>) -> Option<Box<dyn Flags>> {
        match *self {
            Some(value) => Box::new(value).into_nested(),
            None => T::zero().and_then(|zero| Box::new(zero).into_nested()),
        }
    }
}

impl<T: Slot> Slot for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }

    fn zero() -> Option<Self> {
        Some(Vec::new())
    }

    fn from_dynamic(value: Dynamic) -> Option<Self> {
        match value {
            Dynamic::Sequence(element, items) if element == T::shape() => {
                items.into_iter().map(T::from_dynamic).collect()
            }
            _ => None,
        }
    }

    fn slot_shape(&self) -> Shape {
        Self::shape()
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Sequence(T::shape(), self.iter().map(Slot::to_dynamic).collect())
    }

    fn assign(&mut self, value: Dynamic) -> Result<(), FlagbindError> {
        assign_from(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Inner, Outer};

    #[test]
    fn option_round_trips_through_dynamic() {
        let value = Some(Some(7u32));
        let back = Option::<Option<u32>>::from_dynamic(value.to_dynamic());
        assert_eq!(back, Some(value));
    }

    #[test]
    fn assign_rejects_other_shapes() {
        let mut slot = 1i32;
        let err = slot.assign(String::from("x").to_dynamic()).unwrap_err();
        assert!(matches!(err, FlagbindError::TypeMismatch { .. }));
        assert_eq!(slot, 1);
    }

    #[test]
    fn vec_assign_replaces_contents() {
        let mut slot = vec![1u8, 2, 3];
        slot.assign(vec![9u8].to_dynamic()).unwrap();
        assert_eq!(slot, vec![9]);
    }

    #[test]
    fn empty_tag_counts_as_absent() {
        let value = 0i64;
        let field = Field::new("n", &[("flag", ""), ("alt", "n")], &value);
        assert_eq!(field.tag("flag"), None);
        assert_eq!(field.tag("alt"), Some("n"));
        assert_eq!(field.tag("missing"), None);
    }

    #[test]
    fn absent_optional_struct_resolves_to_zero() {
        let slot: Option<Inner> = None;
        let nested = slot.nested().unwrap();
        assert_eq!(nested.type_name(), "Inner");
        assert!(matches!(nested, Nested::Owned(_)));
    }

    #[test]
    fn nested_mut_fills_absent_layers() {
        let mut slot: Option<Option<Inner>> = None;
        assert!(slot.nested_mut().is_some());
        assert_eq!(slot, Some(Some(Inner::default())));
    }

    #[test]
    fn struct_zero_uses_field_zeros() {
        let zero = Outer::zero().unwrap();
        assert_eq!(zero.name, "");
        assert_eq!(zero.inner.count, 0);
    }

    #[test]
    fn base_types_do_not_nest() {
        assert!(5u64.nested().is_none());
        assert!(Some(5u64).nested().is_none());
    }
}

//! Optional-depth resolution: stripping and adding `Option` layers around a
//! value without changing its canonical type.
//!
//! Both functions are pure. A nil met on the way down never fails by itself;
//! it resolves to the zero value of whatever shape remains. The only hard
//! failures are a base-type mismatch, and a zero value that does not exist.

use crate::error::FlagbindError;
use crate::types::{Dynamic, Shape};

/// Remove every optional layer from `value`.
///
/// A nil layer resolves to the zero value of the fully unwrapped shape. A
/// value without optional layers is returned unchanged.
pub fn deref_fully(value: Dynamic) -> Result<Dynamic, FlagbindError> {
    let mut value = value;
    loop {
        value = match value {
            Dynamic::Optional(_, Some(inner)) => *inner,
            Dynamic::Optional(inner, None) => return Dynamic::zero(inner.base()),
            other => return Ok(other),
        };
    }
}

/// Convert `value` to `target`, which must share its canonical type and may
/// differ only in optional depth.
///
/// Deeper targets wrap the value in new `Some` layers. Shallower targets
/// strip layers; a nil met while stripping yields the zero value of the
/// remaining target shape.
pub fn convert_value_to(value: Dynamic, target: &Shape) -> Result<Dynamic, FlagbindError> {
    let source = value.shape();
    if source == *target {
        return Ok(value);
    }

    let (source_base, source_depth) = source.unwrap_depth();
    let (target_base, target_depth) = target.unwrap_depth();
    if source_base != target_base {
        return Err(FlagbindError::Conversion {
            from: source.to_string(),
            to: target.to_string(),
        });
    }

    let mut value = value;
    if target_depth > source_depth {
        for _ in source_depth..target_depth {
            value = Dynamic::Optional(value.shape(), Some(Box::new(value)));
        }
    } else {
        for _ in target_depth..source_depth {
            value = match value {
                Dynamic::Optional(_, Some(inner)) => *inner,
                Dynamic::Optional(_, None) => return Dynamic::zero(target),
                other => {
                    return Err(FlagbindError::Conversion {
                        from: other.shape().to_string(),
                        to: target.to_string(),
                    });
                }
            };
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Slot;
    use crate::fixtures::test::NoZero;

    #[test]
    fn deref_strips_every_layer() {
        let value = deref_fully(Some(Some(3u8)).to_dynamic()).unwrap();
        assert_eq!(value.downcast::<u8>(), Some(3));
    }

    #[test]
    fn deref_resolves_nil_to_zero() {
        let value = deref_fully(Some(None::<String>).to_dynamic()).unwrap();
        assert_eq!(value.downcast::<String>().as_deref(), Some(""));
    }

    #[test]
    fn deref_leaves_plain_values_alone() {
        let value = deref_fully(vec![1i64, 2].to_dynamic()).unwrap();
        assert_eq!(value.downcast::<Vec<i64>>(), Some(vec![1, 2]));
    }

    #[test]
    fn deref_nil_without_zero_fails() {
        let err = deref_fully(None::<NoZero>.to_dynamic()).unwrap_err();
        assert!(matches!(err, FlagbindError::UninitializedOptional { .. }));
    }

    #[test]
    fn equal_shapes_pass_through() {
        let value = convert_value_to(5i32.to_dynamic(), &i32::shape()).unwrap();
        assert_eq!(value.downcast::<i32>(), Some(5));
    }

    #[test]
    fn wrapping_adds_layers() {
        let target = <Option<Option<f64>>>::shape();
        let value = convert_value_to(1.5f64.to_dynamic(), &target).unwrap();
        assert_eq!(value.shape(), target);
        assert_eq!(value.downcast::<Option<Option<f64>>>(), Some(Some(Some(1.5))));
    }

    #[test]
    fn stripping_removes_layers() {
        let value = convert_value_to(Some(Some(true)).to_dynamic(), &bool::shape()).unwrap();
        assert_eq!(value.downcast::<bool>(), Some(true));
    }

    #[test]
    fn stripping_through_nil_yields_zero() {
        let value = convert_value_to(Some(None::<u32>).to_dynamic(), &u32::shape()).unwrap();
        assert_eq!(value.downcast::<u32>(), Some(0));

        let value =
            convert_value_to(None::<Option<u32>>.to_dynamic(), &<Option<u32>>::shape()).unwrap();
        assert_eq!(value.downcast::<Option<u32>>(), Some(None));
    }

    #[test]
    fn depth_round_trip_preserves_value() {
        let original = String::from("deep").to_dynamic();
        let up = convert_value_to(original, &<Option<Option<String>>>::shape()).unwrap();
        let down = convert_value_to(up, &String::shape()).unwrap();
        assert_eq!(down.downcast::<String>().as_deref(), Some("deep"));
    }

    #[test]
    fn different_base_types_fail() {
        let err = convert_value_to(String::from("x").to_dynamic(), &<Option<i32>>::shape())
            .unwrap_err();
        match err {
            FlagbindError::Conversion { from, to } => {
                assert_eq!(from, "String");
                assert_eq!(to, "Option<i32>");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sequences_convert_as_a_whole() {
        let target = <Option<Vec<u16>>>::shape();
        let value = convert_value_to(vec![4u16].to_dynamic(), &target).unwrap();
        assert_eq!(value.downcast::<Option<Vec<u16>>>(), Some(Some(vec![4])));
    }
}

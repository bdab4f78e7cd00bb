//! Loading: copy parsed flag values back into a destination struct.
//!
//! Routing mirrors registration exactly, so both calls must use equivalent
//! [`Options`]. The destination may differ from the registration template in
//! optional depth: a flag registered from an `Option<String>` field loads
//! into a `String` field and vice versa. Absent optional structs on the way
//! to a tagged field are filled in with their zero value.

use log::debug;

use crate::error::FlagbindError;
use crate::flagset::FlagRegistry;
use crate::options::Options;
use crate::resolve::convert_value_to;
use crate::slot::{FieldMut, Flags, Slot};
use crate::types::{Dynamic, Shape};
use crate::value::FlagValue;

/// Load every tagged field of `root` (recursively) from `flags`.
pub fn load_from_flags<R>(flags: &R, root: &mut dyn Slot, options: &Options) -> Result<(), FlagbindError>
where
    R: FlagRegistry + ?Sized,
{
    let shape = root.slot_shape();
    if !shape.base().is_record() {
        return Err(FlagbindError::NotAStruct {
            type_name: shape.to_string(),
        });
    }
    let record = root
        .nested_mut()
        .ok_or_else(|| FlagbindError::UninitializedOptional {
            shape: shape.to_string(),
        })?;
    load_struct(flags, record, options)
}

fn load_struct<R>(flags: &R, record: &mut dyn Flags, options: &Options) -> Result<(), FlagbindError>
where
    R: FlagRegistry + ?Sized,
{
    let owner = record.type_name();
    for mut field in record.fields_mut() {
        let name = field.name();
        load_field(flags, owner, &mut field, options).map_err(|e| FlagbindError::Load {
            owner,
            field: name,
            source: Box::new(e),
        })?;
    }
    Ok(())
}

fn load_field<R>(
    flags: &R,
    owner: &str,
    field: &mut FieldMut<'_>,
    options: &Options,
) -> Result<(), FlagbindError>
where
    R: FlagRegistry + ?Sized,
{
    let field_name = field.name();
    let tag = field.tag(options.key());
    let slot = field.slot_mut();
    let Some(tag) = tag else {
        let shape = slot.slot_shape();
        if !shape.base().is_record() {
            return Ok(());
        }
        return match slot.nested_mut() {
            Some(nested) => load_struct(flags, nested, options),
            None => Err(FlagbindError::UninitializedOptional {
                shape: shape.to_string(),
            }),
        };
    };

    let name = options.flag_name(tag);
    let flag = flags
        .lookup(&name)
        .ok_or_else(|| FlagbindError::FlagNotRegistered { name: name.clone() })?;

    let shape = slot.slot_shape();
    let value = match flag.as_list() {
        Some(list) => {
            // `Option<Vec<T>>` registers as a list too, so strip the same layers here.
            let Shape::Sequence(element) = shape.base() else {
                return Err(FlagbindError::TypeMismatch {
                    expected: shape.to_string(),
                    found: list.get().shape().to_string(),
                });
            };
            let items = list
                .values()
                .iter()
                .map(|item| convert_value_to(item.clone(), element))
                .collect::<Result<Vec<_>, _>>()?;
            convert_value_to(Dynamic::Sequence((**element).clone(), items), &shape)?
        }
        None => convert_value_to(flag.get(), &shape)?,
    };
    debug!("loading {owner}.{field_name} from -{name} = {flag}");
    slot.assign(value)
}

//! Registration: walk a template struct and register one flag per tagged
//! field.
//!
//! Routing per exported field:
//!
//! - **Tagged**: the tag (under [`Options::key`]) plus the prefix is the
//!   flag name. The adapter comes from the registry when the field's base
//!   type has one, otherwise from a [`ListValue`] when the field is a
//!   sequence of adaptable elements.
//! - **Untagged struct** (behind any number of `Option` layers): descend.
//!   Nested flag names are not qualified by the enclosing field.
//! - **Untagged anything else**: skipped.
//!
//! The field's current value seeds the flag, so it becomes the flag's
//! default. A failure stops the walk; flags registered before it stay
//! registered.

use log::{debug, trace};

use crate::error::FlagbindError;
use crate::flagset::FlagRegistry;
use crate::list::ListValue;
use crate::options::Options;
use crate::resolve::deref_fully;
use crate::slot::{Field, Flags, Slot};
use crate::types::{Dynamic, Shape};
use crate::value::FlagValue;

/// Register a flag for every tagged field of `root` (recursively).
pub fn register_flags<R>(flags: &mut R, root: &dyn Slot, options: &Options) -> Result<(), FlagbindError>
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
        .nested()
        .ok_or_else(|| FlagbindError::UninitializedOptional {
            shape: shape.to_string(),
        })?;
    register_struct(flags, &*record, options)
}

fn register_struct<R>(flags: &mut R, record: &dyn Flags, options: &Options) -> Result<(), FlagbindError>
where
    R: FlagRegistry + ?Sized,
{
    let owner = record.type_name();
    let fields = record.fields();
    if fields.is_empty() {
        return Err(FlagbindError::NoExportedFields { type_name: owner });
    }
    for field in &fields {
        register_field(flags, owner, field, options).map_err(|e| FlagbindError::Register {
            owner,
            field: field.name(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

fn register_field<R>(
    flags: &mut R,
    owner: &str,
    field: &Field<'_>,
    options: &Options,
) -> Result<(), FlagbindError>
where
    R: FlagRegistry + ?Sized,
{
    let slot = field.slot();
    let Some(tag) = field.tag(options.key()) else {
        return match slot.nested() {
            Some(nested) => register_struct(flags, &*nested, options),
            None if slot.slot_shape().base().is_record() => {
                Err(FlagbindError::UninitializedOptional {
                    shape: slot.slot_shape().to_string(),
                })
            }
            None => {
                trace!("skipping untagged field {owner}.{}", field.name());
                Ok(())
            }
        };
    };

    let name = options.flag_name(tag);
    let adapter = adapter_for_slot(slot, options)?;
    debug!("registering flag -{name} = {adapter} for {owner}.{}", field.name());
    flags.register(&name, adapter, format!("Set {owner}.{}", field.name()))
}

/// The adapter for a tagged field: a registered base type first, then a
/// list of registered elements.
fn adapter_for_slot(slot: &dyn Slot, options: &Options) -> Result<Box<dyn FlagValue>, FlagbindError> {
    let value = slot.to_dynamic();
    if let Some(adapter) = options.registry().adapter_for(value.clone())? {
        return Ok(adapter);
    }

    let Dynamic::Sequence(element, items) = deref_fully(value)? else {
        return Err(FlagbindError::NoAdapter {
            shape: slot.slot_shape().to_string(),
        });
    };
    let seeds = items
        .into_iter()
        .map(|item| element_adapter(item, &element, options))
        .collect::<Result<Vec<_>, _>>()?;
    let list = match ListValue::seeded(seeds) {
        Some(list) => list,
        None => ListValue::new(element_adapter(Dynamic::zero(&element)?, &element, options)?),
    };
    Ok(Box::new(list))
}

fn element_adapter(
    item: Dynamic,
    element: &Shape,
    options: &Options,
) -> Result<Box<dyn FlagValue>, FlagbindError> {
    options
        .registry()
        .adapter_for(item)?
        .ok_or_else(|| FlagbindError::NoAdapter {
            shape: element.to_string(),
        })
}

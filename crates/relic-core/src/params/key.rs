use crate::{
    model::EntityMapping,
    params::{ParamBag, ParamError, ParamInput, Slots},
};
use std::collections::BTreeMap;

/// Resolve an identifying value into a named bag of primary-key
/// parameters.
///
/// Shapes are tried in a fixed precedence: positional array (arity must
/// equal the key arity), named map (used as-is), a record of the
/// entity's own type (key fields extracted by name, checked before any
/// generic record handling), then a single scalar for single-key
/// entities. Anything else is unsupported.
pub fn resolve_key_params(
    mapping: &EntityMapping,
    input: ParamInput<'_>,
) -> Result<ParamBag, ParamError> {
    match input {
        ParamInput::Positional(values) => from_positional(mapping, values),
        ParamInput::Named(values) => Ok(ParamBag::named(values)),
        ParamInput::Bag(bag) => match bag.slots {
            Slots::Named(values) => Ok(ParamBag::named(values)),
            Slots::Positional(values) => from_positional(mapping, values),
        },
        ParamInput::Record(record) => {
            if record.entity_name() != mapping.name() {
                return Err(ParamError::Unsupported(format!(
                    "record of entity '{}' cannot identify entity '{}'",
                    record.entity_name(),
                    mapping.name()
                )));
            }

            let mut values = BTreeMap::new();
            for field in mapping.key_fields() {
                let Some(value) = record.get(&field.name) else {
                    return Err(ParamError::Invalid(format!(
                        "record is missing key field '{}'",
                        field.name
                    )));
                };
                values.insert(field.name.clone(), value);
            }

            Ok(ParamBag::named(values))
        }
        ParamInput::Scalar(value) => match mapping.key_fields().next() {
            Some(field) if mapping.key_len() == 1 => Ok(ParamBag::named(BTreeMap::from([(
                field.name.clone(),
                value,
            )]))),
            _ => Err(ParamError::Unsupported(format!(
                "single scalar cannot identify entity '{}' with {} key fields",
                mapping.name(),
                mapping.key_len()
            ))),
        },
    }
}

// Positional id binding follows declared key order.
fn from_positional(
    mapping: &EntityMapping,
    values: Vec<crate::value::Value>,
) -> Result<ParamBag, ParamError> {
    if values.len() != mapping.key_len() {
        return Err(ParamError::Invalid(format!(
            "entity '{}' has {} key fields but {} values were supplied",
            mapping.name(),
            mapping.key_len(),
            values.len()
        )));
    }

    let named = mapping
        .key_fields()
        .map(|f| f.name.clone())
        .zip(values)
        .collect();

    Ok(ParamBag::named(named))
}

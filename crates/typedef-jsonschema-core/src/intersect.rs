//! Intersection flattening.
//!
//! Intersections model "all of these object shapes simultaneously", so
//! the operands merge into one flat object schema — the union of all
//! properties and the concatenation of all required lists — rather than
//! an `allOf`/`oneOf` wrapper.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::classify::{classify, Variant};
use crate::config::ConvertOptions;
use crate::convert::{convert_object, Modifiers};
use crate::descriptor::Descriptor;
use crate::error::ConvertError;
use crate::schema::ObjectSchema;

/// Merge the operands of an intersection into a single object schema.
///
/// Operands are extracted left-to-right, so a bad member fails in declared
/// order even when an earlier member alone would have been valid. Later
/// operands override earlier ones property-wise; `required` lists
/// concatenate in encounter order (duplicates preserved unless
/// `dedup_required` is set); `additionalProperties: false` is sticky once
/// any operand is exact.
pub(crate) fn merge_intersection(
    members: &[Descriptor],
    modifiers: Modifiers,
    options: &ConvertOptions,
) -> Result<ObjectSchema, ConvertError> {
    debug!(members = members.len(), "merging intersection");

    let mut acc = ObjectSchema {
        properties: IndexMap::new(),
        required: Some(Vec::new()),
        additional_properties: None,
    };
    for member in members {
        fold(&mut acc, extract_object(member, modifiers, options)?);
    }

    if options.dedup_required {
        if let Some(required) = acc.required.as_mut() {
            let mut seen = HashSet::new();
            required.retain(|key| seen.insert(key.clone()));
        }
    }

    Ok(acc)
}

/// Obtain one operand's contribution as an object schema. Nested
/// intersections merge recursively and count as a single contribution;
/// `Exact` unwraps with the exactness marker set; anything that is not a
/// struct or partial is rejected.
fn extract_object(
    member: &Descriptor,
    modifiers: Modifiers,
    options: &ConvertOptions,
) -> Result<ObjectSchema, ConvertError> {
    match classify(member) {
        Variant::Struct(fields) => convert_object(fields, true, modifiers, options),
        Variant::Partial(fields) => convert_object(fields, false, modifiers, options),
        Variant::Exact(inner) => extract_object(inner, modifiers.with_exact(), options),
        Variant::Intersection(members) => merge_intersection(members, modifiers, options),
        _ => Err(ConvertError::IntersectionMember {
            tag: member.tag().to_owned(),
            name: member.display_name().to_owned(),
        }),
    }
}

fn fold(acc: &mut ObjectSchema, contribution: ObjectSchema) {
    if let Some(required) = contribution.required {
        acc.required.get_or_insert_with(Vec::new).extend(required);
    }
    for (key, schema) in contribution.properties {
        // A key present in a later operand overrides the earlier schema;
        // its position stays where the key first appeared.
        acc.properties.insert(key, schema);
    }
    if contribution.additional_properties == Some(false) {
        acc.additional_properties = Some(false);
    }
}

//! Required-field resolution for struct descriptors.

use crate::descriptor::{Descriptor, Fields};

/// Collect the required field names of a struct descriptor, in declaration
/// order. Never fails; a struct with no optional fields yields every field
/// name.
///
/// A field is optional iff its descriptor is `Undefined`, or a union with
/// `Undefined` among its direct members. The check is exactly one level
/// deep: `Undefined` buried inside a refinement or a nested union does not
/// make a field optional. Generalizing the depth would change observable
/// output for existing descriptor trees.
pub fn required_fields(fields: &Fields) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, descriptor)| !is_optional(descriptor))
        .map(|(name, _)| name.clone())
        .collect()
}

fn is_optional(descriptor: &Descriptor) -> bool {
    match descriptor {
        Descriptor::Undefined => true,
        Descriptor::Union(members) => members
            .iter()
            .any(|member| matches!(member, Descriptor::Undefined)),
        _ => false,
    }
}

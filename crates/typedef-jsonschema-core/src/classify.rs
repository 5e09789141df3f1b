//! Variant classification for descriptor nodes.
//!
//! Classification goes by the node's declared tag, never by structural
//! shape, so a partial can never be mistaken for a struct that happens to
//! have the same fields.

use crate::descriptor::{
    ArrayConstraints, Descriptor, Fields, NumberConstraints, StringConstraints,
};

/// The classified shape of a descriptor node, borrowing its payload.
///
/// `Unknown` is a value, not an error: [`classify`] is total, and the
/// caller decides whether an unknown tag is fatal.
#[derive(Debug)]
pub enum Variant<'a> {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Function,
    Void,
    Array(&'a Descriptor),
    ReadonlyArray(&'a Descriptor),
    Tuple(&'a [Descriptor]),
    KeyOf(&'a [String]),
    Struct(&'a Fields),
    Partial(&'a Fields),
    Exact(&'a Descriptor),
    Readonly(&'a Descriptor),
    Refinement {
        name: &'a str,
        inner: &'a Descriptor,
    },
    Union(&'a [Descriptor]),
    Intersection(&'a [Descriptor]),
    ConstrainedString(&'a StringConstraints),
    ConstrainedNumber(&'a NumberConstraints),
    ConstrainedArray {
        element: &'a Descriptor,
        constraints: &'a ArrayConstraints,
    },
    Unknown,
}

/// Classify a descriptor node. Pure and total; never fails.
pub fn classify(node: &Descriptor) -> Variant<'_> {
    match node {
        Descriptor::String => Variant::String,
        Descriptor::Number => Variant::Number,
        Descriptor::Boolean => Variant::Boolean,
        Descriptor::Null => Variant::Null,
        Descriptor::Undefined => Variant::Undefined,
        Descriptor::Function => Variant::Function,
        Descriptor::Void => Variant::Void,
        Descriptor::Array(element) => Variant::Array(element),
        Descriptor::ReadonlyArray(element) => Variant::ReadonlyArray(element),
        Descriptor::Tuple(members) => Variant::Tuple(members),
        Descriptor::KeyOf(keys) => Variant::KeyOf(keys),
        Descriptor::Struct(fields) => Variant::Struct(fields),
        Descriptor::Partial(fields) => Variant::Partial(fields),
        Descriptor::Exact(inner) => Variant::Exact(inner),
        Descriptor::Readonly(inner) => Variant::Readonly(inner),
        Descriptor::Refinement { name, inner } => Variant::Refinement { name, inner },
        Descriptor::Union(members) => Variant::Union(members),
        Descriptor::Intersection(members) => Variant::Intersection(members),
        Descriptor::ConstrainedString(constraints) => Variant::ConstrainedString(constraints),
        Descriptor::ConstrainedNumber(constraints) => Variant::ConstrainedNumber(constraints),
        Descriptor::ConstrainedArray {
            element,
            constraints,
        } => Variant::ConstrainedArray {
            element,
            constraints,
        },
        Descriptor::Foreign { .. } => Variant::Unknown,
    }
}

/// Whether a descriptor participates in schema output at all.
///
/// Undefined, Function and Void are filtered out of object properties and
/// union members before conversion. Everything else — including unknown
/// tags, which must surface as conversion errors rather than vanish — is
/// convertible. Applied identically by the converter and the
/// required-field resolver.
pub fn is_convertible(node: &Descriptor) -> bool {
    !matches!(
        node,
        Descriptor::Undefined | Descriptor::Function | Descriptor::Void
    )
}

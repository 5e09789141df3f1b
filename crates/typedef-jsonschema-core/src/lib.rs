//! Convert runtime type descriptors into JSON Schema.
//!
//! A [`Descriptor`] is a validated data shape built from a closed set of
//! composable variants (primitives, arrays, tuples, enumerations, objects
//! with required/optional fields, refinements, unions, intersections).
//! [`convert`] walks the tree and produces the equivalent structural
//! schema: `type`/`properties`/`required`/`items`/`enum`/`oneOf`/
//! `additionalProperties`. Intersections of object descriptors flatten
//! into a single object schema.
//!
//! The conversion is synchronous, purely functional over immutable input,
//! and reentrant: no global state is read or written, so independent call
//! sites may convert concurrently.
//!
//! ```
//! use typedef_jsonschema_core::{convert, Descriptor};
//!
//! let descriptor = Descriptor::struct_of([
//!     ("name", Descriptor::String),
//!     (
//!         "age",
//!         Descriptor::Union(vec![Descriptor::Number, Descriptor::Undefined]),
//!     ),
//! ]);
//!
//! let schema = convert(&descriptor)?;
//! let json = serde_json::to_value(&schema)?;
//! assert_eq!(json["required"], serde_json::json!(["name"]));
//! assert_eq!(json["properties"]["age"]["type"], "number");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod error;
mod intersect;
pub mod required;
pub mod schema;

pub use config::ConvertOptions;
pub use descriptor::Descriptor;
pub use error::ConvertError;
pub use schema::SchemaNode;

use convert::{convert_internal, Modifiers};

/// Convert a descriptor tree into a JSON Schema with default options.
pub fn convert(descriptor: &Descriptor) -> Result<SchemaNode, ConvertError> {
    convert_with(descriptor, &ConvertOptions::default())
}

/// Convert a descriptor tree into a JSON Schema.
///
/// Fails with [`ConvertError::UnsupportedType`] for tags outside the
/// supported grammar and [`ConvertError::IntersectionMember`] for
/// intersections of non-object operands; no partial schema is returned.
pub fn convert_with(
    descriptor: &Descriptor,
    options: &ConvertOptions,
) -> Result<SchemaNode, ConvertError> {
    tracing::debug!(tag = descriptor.tag(), "converting descriptor");
    convert_internal(descriptor, Modifiers::default(), options)
}

//! Error types for descriptor conversion.

use thiserror::Error;

/// Errors produced while turning a descriptor tree into a JSON Schema.
///
/// `UnsupportedType` and `IntersectionMember` are distinct variants so
/// callers can tell "genuinely unknown type" from "bad intersection shape"
/// by pattern match, without parsing messages.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A descriptor with an unrecognized tag was reached anywhere in the
    /// recursion. No partial schema is returned.
    #[error("unsupported descriptor type `{tag}` ({name})")]
    UnsupportedType { tag: String, name: String },

    /// An intersection operand was not (possibly through `exact`
    /// unwrapping) a struct or partial descriptor.
    #[error("only object descriptors (struct, partial or exact) are allowed in intersections, got `{tag}` ({name})")]
    IntersectionMember { tag: String, name: String },

    /// A descriptor document was structurally malformed.
    #[error("invalid descriptor at {path}: {message}")]
    Descriptor { path: String, message: String },

    /// Descriptor document text was not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

//! The descriptor input grammar and its JSON document form.
//!
//! A [`Descriptor`] is a finite, acyclic tree describing a data shape,
//! built from a closed set of composable variants. The converter only ever
//! reads it; descriptors are normally constructed in-process, but
//! [`Descriptor::from_value`] accepts the JSON document form used by the
//! CLI and by embedders that receive descriptors over a wire.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ConvertError;

/// Ordered field map of a struct/partial descriptor. Declaration order is
/// significant: it drives property order and the `required` list.
pub type Fields = IndexMap<String, Descriptor>;

/// Constraint facets carried by a string descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringConstraints {
    pub description: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

/// Constraint facets carried by a number descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberConstraints {
    pub description: Option<String>,
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
}

/// Constraint facets carried by an array descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayConstraints {
    pub description: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// A node in the descriptor tree.
///
/// The grammar is closed: adding a variant is a compile-time-visible
/// decision that every `match` in the crate must acknowledge. Tags outside
/// the grammar survive parsing as [`Descriptor::Foreign`] and fail later,
/// at conversion time, with the offending tag in the error.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    String,
    Number,
    Boolean,
    Null,
    /// Unconvertible; filtered out of object properties and union members.
    Undefined,
    /// Unconvertible; filtered like `Undefined`.
    Function,
    /// Unconvertible; filtered like `Undefined`.
    Void,
    /// Ordered, homogeneous collection.
    Array(Box<Descriptor>),
    /// Identical to `Array` for output purposes.
    ReadonlyArray(Box<Descriptor>),
    /// Fixed arity, heterogeneous.
    Tuple(Vec<Descriptor>),
    /// Ordered set of string literal keys; converts to an enumeration.
    KeyOf(Vec<String>),
    /// Object with every field a candidate for `required`.
    Struct(Fields),
    /// Object with no field ever required.
    Partial(Fields),
    /// Marks "no additional properties allowed" on the wrapped object.
    Exact(Box<Descriptor>),
    /// Marks immutability; carries no schema effect.
    Readonly(Box<Descriptor>),
    /// A predicate-narrowed type. The name `"Int"` is a sentinel the
    /// converter turns into an integer schema; any other refinement
    /// converts as its inner descriptor.
    Refinement {
        name: String,
        inner: Box<Descriptor>,
    },
    Union(Vec<Descriptor>),
    Intersection(Vec<Descriptor>),
    /// String with validation facets surfacing as schema keywords.
    ConstrainedString(StringConstraints),
    /// Number with validation facets surfacing as schema keywords.
    ConstrainedNumber(NumberConstraints),
    /// Array with validation facets surfacing as schema keywords.
    ConstrainedArray {
        element: Box<Descriptor>,
        constraints: ArrayConstraints,
    },
    /// A descriptor whose tag is outside the supported grammar. Exists so
    /// an unknown tag can travel to the conversion error that names it.
    Foreign {
        tag: String,
        name: Option<String>,
    },
}

impl Descriptor {
    pub fn array(element: Descriptor) -> Self {
        Descriptor::Array(Box::new(element))
    }

    pub fn readonly_array(element: Descriptor) -> Self {
        Descriptor::ReadonlyArray(Box::new(element))
    }

    pub fn exact(inner: Descriptor) -> Self {
        Descriptor::Exact(Box::new(inner))
    }

    pub fn readonly(inner: Descriptor) -> Self {
        Descriptor::Readonly(Box::new(inner))
    }

    pub fn refinement(name: impl Into<String>, inner: Descriptor) -> Self {
        Descriptor::Refinement {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    /// The integer refinement of `Number`.
    pub fn int() -> Self {
        Descriptor::refinement("Int", Descriptor::Number)
    }

    pub fn key_of<K, I>(keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        Descriptor::KeyOf(keys.into_iter().map(Into::into).collect())
    }

    pub fn struct_of<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Descriptor)>,
    {
        Descriptor::Struct(fields.into_iter().map(|(k, d)| (k.into(), d)).collect())
    }

    pub fn partial_of<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Descriptor)>,
    {
        Descriptor::Partial(fields.into_iter().map(|(k, d)| (k.into(), d)).collect())
    }

    /// The node's discriminant tag, matching the document `kind` strings.
    pub fn tag(&self) -> &str {
        match self {
            Descriptor::String | Descriptor::ConstrainedString(_) => "string",
            Descriptor::Number | Descriptor::ConstrainedNumber(_) => "number",
            Descriptor::Boolean => "boolean",
            Descriptor::Null => "null",
            Descriptor::Undefined => "undefined",
            Descriptor::Function => "function",
            Descriptor::Void => "void",
            Descriptor::Array(_) | Descriptor::ConstrainedArray { .. } => "array",
            Descriptor::ReadonlyArray(_) => "readonly-array",
            Descriptor::Tuple(_) => "tuple",
            Descriptor::KeyOf(_) => "keyof",
            Descriptor::Struct(_) => "struct",
            Descriptor::Partial(_) => "partial",
            Descriptor::Exact(_) => "exact",
            Descriptor::Readonly(_) => "readonly",
            Descriptor::Refinement { .. } => "refinement",
            Descriptor::Union(_) => "union",
            Descriptor::Intersection(_) => "intersection",
            Descriptor::Foreign { tag, .. } => tag,
        }
    }

    /// The declared display name used in error messages: a refinement's
    /// declared name, a foreign node's name when it carries one, otherwise
    /// the tag.
    pub fn display_name(&self) -> &str {
        match self {
            Descriptor::Refinement { name, .. } => name,
            Descriptor::Foreign {
                name: Some(name), ..
            } => name,
            other => other.tag(),
        }
    }

    /// Parse a descriptor document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConvertError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parse a descriptor document from an already-parsed JSON value.
    ///
    /// Unknown `kind` tags parse successfully into [`Descriptor::Foreign`]
    /// so that the failure surfaces at conversion time as
    /// [`ConvertError::UnsupportedType`]; only structural problems (missing
    /// payload keys, wrong JSON types) fail here.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        parse(value, "#")
    }
}

// ---------------------------------------------------------------------------
// Document parser
// ---------------------------------------------------------------------------

fn parse(value: &Value, path: &str) -> Result<Descriptor, ConvertError> {
    let Value::Object(obj) = value else {
        return Err(malformed(path, "expected a descriptor object"));
    };
    let kind = obj
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing string field `kind`"))?;

    match kind {
        "string" => {
            let constraints = StringConstraints {
                description: opt_string(obj, "description", path)?,
                min_length: opt_u64(obj, "minLength", path)?,
                max_length: opt_u64(obj, "maxLength", path)?,
                pattern: opt_string(obj, "pattern", path)?,
            };
            if constraints == StringConstraints::default() {
                Ok(Descriptor::String)
            } else {
                Ok(Descriptor::ConstrainedString(constraints))
            }
        }
        "number" => {
            let constraints = NumberConstraints {
                description: opt_string(obj, "description", path)?,
                minimum: opt_f64(obj, "minimum", path)?,
                exclusive_minimum: opt_f64(obj, "exclusiveMinimum", path)?,
                maximum: opt_f64(obj, "maximum", path)?,
                exclusive_maximum: opt_f64(obj, "exclusiveMaximum", path)?,
            };
            if constraints == NumberConstraints::default() {
                Ok(Descriptor::Number)
            } else {
                Ok(Descriptor::ConstrainedNumber(constraints))
            }
        }
        "boolean" => Ok(Descriptor::Boolean),
        "null" => Ok(Descriptor::Null),
        "undefined" => Ok(Descriptor::Undefined),
        "function" => Ok(Descriptor::Function),
        "void" => Ok(Descriptor::Void),
        "array" => {
            let element = parse_element(obj, path)?;
            let constraints = ArrayConstraints {
                description: opt_string(obj, "description", path)?,
                min_items: opt_u64(obj, "minItems", path)?,
                max_items: opt_u64(obj, "maxItems", path)?,
            };
            if constraints == ArrayConstraints::default() {
                Ok(Descriptor::Array(Box::new(element)))
            } else {
                Ok(Descriptor::ConstrainedArray {
                    element: Box::new(element),
                    constraints,
                })
            }
        }
        "readonly-array" => {
            let element = parse_element(obj, path)?;
            Ok(Descriptor::ReadonlyArray(Box::new(element)))
        }
        "tuple" => Ok(Descriptor::Tuple(parse_members(obj, path, 0)?)),
        "keyof" => {
            let Some(Value::Array(keys)) = obj.get("keys") else {
                return Err(malformed(path, "`keyof` requires a `keys` array"));
            };
            let keys = keys
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    key.as_str().map(str::to_owned).ok_or_else(|| {
                        let key_path = join_path(&join_path(path, "keys"), &i.to_string());
                        malformed(&key_path, "expected a string key")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Descriptor::KeyOf(keys))
        }
        "struct" => Ok(Descriptor::Struct(parse_fields(obj, path)?)),
        "partial" => Ok(Descriptor::Partial(parse_fields(obj, path)?)),
        "exact" => Ok(Descriptor::Exact(Box::new(parse_inner(obj, path)?))),
        "readonly" => Ok(Descriptor::Readonly(Box::new(parse_inner(obj, path)?))),
        "refinement" => {
            let name = obj
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(path, "`refinement` requires a string `name`"))?;
            Ok(Descriptor::Refinement {
                name: name.to_owned(),
                inner: Box::new(parse_inner(obj, path)?),
            })
        }
        "union" => Ok(Descriptor::Union(parse_members(obj, path, 1)?)),
        "intersection" => Ok(Descriptor::Intersection(parse_members(obj, path, 1)?)),
        other => Ok(Descriptor::Foreign {
            tag: other.to_owned(),
            name: obj.get("name").and_then(Value::as_str).map(str::to_owned),
        }),
    }
}

fn parse_element(obj: &Map<String, Value>, path: &str) -> Result<Descriptor, ConvertError> {
    let element = obj
        .get("element")
        .ok_or_else(|| malformed(path, "array kinds require an `element` descriptor"))?;
    parse(element, &join_path(path, "element"))
}

fn parse_inner(obj: &Map<String, Value>, path: &str) -> Result<Descriptor, ConvertError> {
    let inner = obj
        .get("inner")
        .ok_or_else(|| malformed(path, "wrapper kinds require an `inner` descriptor"))?;
    parse(inner, &join_path(path, "inner"))
}

fn parse_members(
    obj: &Map<String, Value>,
    path: &str,
    min: usize,
) -> Result<Vec<Descriptor>, ConvertError> {
    let Some(Value::Array(members)) = obj.get("members") else {
        return Err(malformed(path, "expected a `members` array"));
    };
    if members.len() < min {
        return Err(malformed(path, "requires at least one member"));
    }
    let base = join_path(path, "members");
    members
        .iter()
        .enumerate()
        .map(|(i, member)| parse(member, &join_path(&base, &i.to_string())))
        .collect()
}

fn parse_fields(obj: &Map<String, Value>, path: &str) -> Result<Fields, ConvertError> {
    let Some(Value::Object(fields)) = obj.get("fields") else {
        return Err(malformed(path, "expected a `fields` object"));
    };
    let mut parsed = Fields::with_capacity(fields.len());
    for (name, field) in fields {
        let field_path = join_path(&join_path(path, "fields"), name);
        parsed.insert(name.clone(), parse(field, &field_path)?);
    }
    Ok(parsed)
}

fn opt_string(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, ConvertError> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(
            &join_path(path, key),
            "expected a string value",
        )),
    }
}

fn opt_u64(obj: &Map<String, Value>, key: &str, path: &str) -> Result<Option<u64>, ConvertError> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| malformed(&join_path(path, key), "expected a non-negative integer")),
    }
}

fn opt_f64(obj: &Map<String, Value>, key: &str, path: &str) -> Result<Option<f64>, ConvertError> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| malformed(&join_path(path, key), "expected a number")),
    }
}

fn malformed(path: &str, message: &str) -> ConvertError {
    ConvertError::Descriptor {
        path: path.to_owned(),
        message: message.to_owned(),
    }
}

/// Append a segment to a JSON-Pointer style path, escaping per RFC 6901.
fn join_path(parent: &str, segment: &str) -> String {
    let mut path = String::with_capacity(parent.len() + segment.len() + 1);
    path.push_str(parent);
    path.push('/');
    if segment.contains(['~', '/']) {
        path.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    } else {
        path.push_str(segment);
    }
    path
}

// ===========================================================================
// Tests
// ===========================================================================

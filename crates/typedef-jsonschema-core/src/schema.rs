//! The JSON Schema output model.
//!
//! Freshly constructed per conversion, with no ownership relation to the
//! input tree; two conversions of structurally identical input yield
//! deep-equal output (`PartialEq`). Serialization produces the standard
//! wire shape directly: a `type` tag on typed nodes, `oneOf` with no
//! `type` key on unions, optional keywords omitted when absent, and
//! `properties` in insertion order.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A node in the produced schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Null,
    Boolean,
    Integer,
    Number(NumberSchema),
    String(StringSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Union(UnionSchema),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberSchema {
    pub description: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringSchema {
    /// Present for `keyof` enumerations, in declared key order.
    pub enum_values: Option<Vec<String>>,
    pub description: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Items,
    pub description: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl ArraySchema {
    pub fn new(items: Items) -> Self {
        Self {
            items,
            description: None,
            min_items: None,
            max_items: None,
        }
    }
}

/// `items` is a single schema for homogeneous arrays and an ordered list
/// for tuples.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    Single(Box<SchemaNode>),
    Tuple(Vec<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Ordered property map; follows field declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Present (possibly empty) for struct-derived objects and merged
    /// intersections; absent for partial-derived objects.
    pub required: Option<Vec<String>>,
    /// `Some(false)` when the object forbids undeclared properties.
    pub additional_properties: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionSchema {
    pub one_of: Vec<SchemaNode>,
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            SchemaNode::Null => map.serialize_entry("type", "null")?,
            SchemaNode::Boolean => map.serialize_entry("type", "boolean")?,
            SchemaNode::Integer => map.serialize_entry("type", "integer")?,
            SchemaNode::Number(number) => {
                map.serialize_entry("type", "number")?;
                if let Some(description) = &number.description {
                    map.serialize_entry("description", description)?;
                }
                if let Some(minimum) = number.minimum {
                    map.serialize_entry("minimum", &minimum)?;
                }
                if let Some(maximum) = number.maximum {
                    map.serialize_entry("maximum", &maximum)?;
                }
                if let Some(bound) = number.exclusive_minimum {
                    map.serialize_entry("exclusiveMinimum", &bound)?;
                }
                if let Some(bound) = number.exclusive_maximum {
                    map.serialize_entry("exclusiveMaximum", &bound)?;
                }
            }
            SchemaNode::String(string) => {
                map.serialize_entry("type", "string")?;
                if let Some(values) = &string.enum_values {
                    map.serialize_entry("enum", values)?;
                }
                if let Some(description) = &string.description {
                    map.serialize_entry("description", description)?;
                }
                if let Some(len) = string.min_length {
                    map.serialize_entry("minLength", &len)?;
                }
                if let Some(len) = string.max_length {
                    map.serialize_entry("maxLength", &len)?;
                }
                if let Some(pattern) = &string.pattern {
                    map.serialize_entry("pattern", pattern)?;
                }
            }
            SchemaNode::Array(array) => {
                map.serialize_entry("type", "array")?;
                match &array.items {
                    Items::Single(item) => map.serialize_entry("items", item.as_ref())?,
                    Items::Tuple(items) => map.serialize_entry("items", items)?,
                }
                if let Some(description) = &array.description {
                    map.serialize_entry("description", description)?;
                }
                if let Some(count) = array.min_items {
                    map.serialize_entry("minItems", &count)?;
                }
                if let Some(count) = array.max_items {
                    map.serialize_entry("maxItems", &count)?;
                }
            }
            SchemaNode::Object(object) => {
                map.serialize_entry("type", "object")?;
                map.serialize_entry("properties", &object.properties)?;
                if let Some(required) = &object.required {
                    map.serialize_entry("required", required)?;
                }
                if let Some(additional) = object.additional_properties {
                    map.serialize_entry("additionalProperties", &additional)?;
                }
            }
            SchemaNode::Union(union) => map.serialize_entry("oneOf", &union.one_of)?,
        }
        map.end()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

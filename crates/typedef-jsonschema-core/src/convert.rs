//! The recursive descriptor → schema converter.

use indexmap::IndexMap;

use crate::classify::{classify, is_convertible, Variant};
use crate::config::ConvertOptions;
use crate::descriptor::{Descriptor, Fields};
use crate::error::ConvertError;
use crate::intersect::merge_intersection;
use crate::required::required_fields;
use crate::schema::{
    ArraySchema, Items, NumberSchema, ObjectSchema, SchemaNode, StringSchema, UnionSchema,
};

/// Refinement name the converter maps to an integer schema.
const INT_SENTINEL: &str = "Int";

/// Inherited per-recursion flags. A fresh value is created per top-level
/// conversion and threaded by value, so sibling branches never observe
/// each other's changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Set by the nearest enclosing `Exact` wrapper: emitted objects
    /// forbid additional properties.
    pub exact: bool,
    /// Set by the nearest enclosing `Readonly` wrapper. Tracked for
    /// fidelity with the descriptor grammar; no schema-emitting branch
    /// consults it.
    pub readonly: bool,
}

impl Modifiers {
    pub fn with_exact(self) -> Self {
        Self {
            exact: true,
            ..self
        }
    }

    pub fn with_readonly(self) -> Self {
        Self {
            readonly: true,
            ..self
        }
    }
}

pub(crate) fn convert_internal(
    node: &Descriptor,
    modifiers: Modifiers,
    options: &ConvertOptions,
) -> Result<SchemaNode, ConvertError> {
    match classify(node) {
        Variant::String => Ok(SchemaNode::String(StringSchema::default())),
        Variant::Number => Ok(SchemaNode::Number(NumberSchema::default())),
        Variant::Boolean => Ok(SchemaNode::Boolean),
        Variant::Null => Ok(SchemaNode::Null),

        // The refinement predicate itself is not encoded; schemas are
        // structural beyond the Int sentinel.
        Variant::Refinement { name, inner } => {
            if name == INT_SENTINEL {
                Ok(SchemaNode::Integer)
            } else {
                convert_internal(inner, modifiers, options)
            }
        }

        Variant::KeyOf(keys) => Ok(SchemaNode::String(StringSchema {
            enum_values: Some(keys.to_vec()),
            ..Default::default()
        })),

        // Tuples do not reset modifiers; only array element descent does.
        Variant::Tuple(members) => {
            let items = members
                .iter()
                .map(|member| convert_internal(member, modifiers, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SchemaNode::Array(ArraySchema::new(Items::Tuple(items))))
        }

        // Array element schemas never inherit the container's exactness or
        // readonly markers.
        Variant::Array(element) | Variant::ReadonlyArray(element) => {
            let item = convert_internal(element, Modifiers::default(), options)?;
            Ok(SchemaNode::Array(ArraySchema::new(Items::Single(
                Box::new(item),
            ))))
        }

        Variant::ConstrainedArray {
            element,
            constraints,
        } => {
            let item = convert_internal(element, Modifiers::default(), options)?;
            let mut schema = ArraySchema::new(Items::Single(Box::new(item)));
            schema.description = constraints.description.clone();
            schema.min_items = constraints.min_items;
            schema.max_items = constraints.max_items;
            Ok(SchemaNode::Array(schema))
        }

        Variant::ConstrainedString(constraints) => Ok(SchemaNode::String(StringSchema {
            enum_values: None,
            description: constraints.description.clone(),
            min_length: constraints.min_length,
            max_length: constraints.max_length,
            pattern: constraints.pattern.clone(),
        })),

        Variant::ConstrainedNumber(constraints) => Ok(SchemaNode::Number(NumberSchema {
            description: constraints.description.clone(),
            minimum: constraints.minimum,
            maximum: constraints.maximum,
            exclusive_minimum: constraints.exclusive_minimum,
            exclusive_maximum: constraints.exclusive_maximum,
        })),

        Variant::Readonly(inner) => convert_internal(inner, modifiers.with_readonly(), options),
        Variant::Exact(inner) => convert_internal(inner, modifiers.with_exact(), options),

        Variant::Struct(fields) => Ok(SchemaNode::Object(convert_object(
            fields, true, modifiers, options,
        )?)),
        Variant::Partial(fields) => Ok(SchemaNode::Object(convert_object(
            fields, false, modifiers, options,
        )?)),

        Variant::Union(members) => {
            let convertibles: Vec<&Descriptor> =
                members.iter().filter(|member| is_convertible(member)).collect();
            // A union reduced to one convertible member collapses: this is
            // how `T | undefined` fields become plain `T`.
            if let [sole] = convertibles.as_slice() {
                return convert_internal(sole, modifiers, options);
            }
            let one_of = convertibles
                .into_iter()
                .map(|member| convert_internal(member, modifiers, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SchemaNode::Union(UnionSchema { one_of }))
        }

        Variant::Intersection(members) => {
            merge_intersection(members, modifiers, options).map(SchemaNode::Object)
        }

        // Undefined/Function/Void reaching convert directly means the
        // caller skipped the convertibility filter; treated like an
        // unknown tag.
        Variant::Undefined | Variant::Function | Variant::Void | Variant::Unknown => {
            Err(ConvertError::UnsupportedType {
                tag: node.tag().to_owned(),
                name: node.display_name().to_owned(),
            })
        }
    }
}

/// Build an object schema for a struct (`all_required`) or partial field
/// map. Shared by the converter and the intersection merger so both apply
/// the same modifier snapshot and convertibility filter.
pub(crate) fn convert_object(
    fields: &Fields,
    all_required: bool,
    modifiers: Modifiers,
    options: &ConvertOptions,
) -> Result<ObjectSchema, ConvertError> {
    let mut properties = IndexMap::with_capacity(fields.len());
    for (name, descriptor) in fields {
        if !is_convertible(descriptor) {
            continue;
        }
        properties.insert(name.clone(), convert_internal(descriptor, modifiers, options)?);
    }
    Ok(ObjectSchema {
        properties,
        required: all_required.then(|| required_fields(fields)),
        additional_properties: modifiers.exact.then_some(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn convert(node: &Descriptor) -> SchemaNode {
        convert_internal(node, Modifiers::default(), &ConvertOptions::default()).unwrap()
    }

    fn as_json(node: &Descriptor) -> serde_json::Value {
        serde_json::to_value(convert(node)).unwrap()
    }

    #[test]
    fn test_modifiers_are_value_types() {
        let base = Modifiers::default();
        let exact = base.with_exact();
        // The original binding is unchanged; siblings never share state.
        assert!(!base.exact);
        assert!(exact.exact);
        assert!(!exact.readonly);
        assert_eq!(exact.with_readonly(), Modifiers {
            exact: true,
            readonly: true,
        });
    }

    #[test]
    fn test_non_int_refinement_converts_inner() {
        let node = Descriptor::refinement("Positive", Descriptor::Number);
        assert_eq!(as_json(&node), json!({"type": "number"}));
    }

    #[test]
    fn test_int_sentinel_is_case_sensitive() {
        let node = Descriptor::refinement("int", Descriptor::Number);
        assert_eq!(as_json(&node), json!({"type": "number"}));
        assert_eq!(as_json(&Descriptor::int()), json!({"type": "integer"}));
    }

    #[test]
    fn test_refinement_preserves_modifiers() {
        // Exact threads through a refinement wrapper down to the object.
        let node = Descriptor::exact(Descriptor::refinement(
            "Named",
            Descriptor::struct_of([("name", Descriptor::String)]),
        ));
        assert_eq!(
            as_json(&node),
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_tuple_inherits_modifiers() {
        let node = Descriptor::exact(Descriptor::struct_of([(
            "pair",
            Descriptor::Tuple(vec![
                Descriptor::struct_of([("a", Descriptor::Null)]),
                Descriptor::Number,
            ]),
        )]));
        let json = as_json(&node);
        // The struct inside the tuple still sees the exactness marker.
        assert_eq!(
            json["properties"]["pair"]["items"][0]["additionalProperties"],
            json!(false)
        );
    }

    #[test]
    fn test_array_resets_modifiers() {
        let node = Descriptor::exact(Descriptor::struct_of([(
            "rows",
            Descriptor::array(Descriptor::struct_of([("cell", Descriptor::String)])),
        )]));
        let json = as_json(&node);
        assert_eq!(json["additionalProperties"], json!(false));
        // The element object must not carry the container's exactness.
        assert_eq!(
            json["properties"]["rows"]["items"],
            json!({
                "type": "object",
                "properties": {"cell": {"type": "string"}},
                "required": ["cell"]
            })
        );
    }

    #[test]
    fn test_readonly_is_inert() {
        let plain = Descriptor::struct_of([("name", Descriptor::String)]);
        let wrapped = Descriptor::readonly(plain.clone());
        assert_eq!(convert(&plain), convert(&wrapped));
    }

    #[test]
    fn test_unconvertible_field_not_emitted_but_still_required() {
        // The convertibility filter drops the property; the one-level
        // optionality rule knows nothing about functions, so the name
        // still appears in `required`.
        let node = Descriptor::struct_of([
            ("callback", Descriptor::Function),
            ("id", Descriptor::String),
        ]);
        assert_eq!(
            as_json(&node),
            json!({
                "type": "object",
                "properties": {"id": {"type": "string"}},
                "required": ["callback", "id"]
            })
        );
    }

    #[test]
    fn test_union_of_zero_convertibles_yields_empty_one_of() {
        let node = Descriptor::Union(vec![Descriptor::Undefined, Descriptor::Void]);
        assert_eq!(as_json(&node), json!({"oneOf": []}));
    }

    #[test]
    fn test_union_members_share_modifier_snapshot() {
        let node = Descriptor::exact(Descriptor::Union(vec![
            Descriptor::struct_of([("a", Descriptor::String)]),
            Descriptor::partial_of([("b", Descriptor::Number)]),
        ]));
        let json = as_json(&node);
        assert_eq!(json["oneOf"][0]["additionalProperties"], json!(false));
        assert_eq!(json["oneOf"][1]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_direct_undefined_is_unsupported() {
        let err = convert_internal(
            &Descriptor::Undefined,
            Modifiers::default(),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        let ConvertError::UnsupportedType { tag, .. } = err else {
            panic!("expected UnsupportedType, got {err:?}");
        };
        assert_eq!(tag, "undefined");
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let node = Descriptor::Foreign {
            tag: "bigint".to_owned(),
            name: Some("BigInt".to_owned()),
        };
        let err =
            convert_internal(&node, Modifiers::default(), &ConvertOptions::default()).unwrap_err();
        let ConvertError::UnsupportedType { tag, name } = err else {
            panic!("expected UnsupportedType, got {err:?}");
        };
        assert_eq!((tag.as_str(), name.as_str()), ("bigint", "BigInt"));
    }
}

//! The Schema Classifier (spec.md §4.1).
//!
//! `classify` is a pure function of a node's own attributes — it does not
//! walk to the parent, consult the Definitions Index, or look at the
//! used-names set. That's spec.md §8 property 5, and it's what lets the
//! priority-ordered rule list below be tested directly against hand-built
//! nodes with no [`crate::translator::Translator`] in the loop.

use crate::schema::SchemaNode;

/// One of the 18 closed-set tags a schema node can classify as (spec.md
/// §4.1). `REFERENCE` exists in the tag set even though the only thing the
/// translator ever does with it is raise `UnresolvedReference` — it has to
/// be representable as a tag so rule 2 fits the "each rule yields zero or
/// one tag" shape of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    AllOf,
    Any,
    AnyOf,
    Boolean,
    CustomType,
    NamedEnum,
    NamedSchema,
    Never,
    Null,
    Number,
    Object,
    OneOf,
    Reference,
    String,
    TypedArray,
    Union,
    UnnamedEnum,
    UnnamedSchema,
    UntypedArray,
}

/// Classify a schema node into its ordered, duplicate-free tag list.
///
/// Rule 10 (the `type` dispatch to STRING/NUMBER/BOOLEAN/NULL/NEVER/OBJECT)
/// is the one place this implementation narrows spec.md's literal "always
/// yields exactly one tag": it is skipped whenever rule 6 (enum), rule 7
/// (multi-type union), rule 8 (array) or rule 9 (object-shaped) already
/// fired, since dispatching it unconditionally would tag an ordinary named
/// object schema, a `type: ["string","number"]` union, or an enum-with-type
/// schema with a redundant second tag the worked examples don't expect
/// (see DESIGN.md).
pub fn classify(schema: &SchemaNode) -> Vec<Tag> {
    let mut tags = Vec::with_capacity(2);

    // 1. tsType
    if schema.ts_type.is_some() {
        tags.push(Tag::CustomType);
    }

    // 2. $ref — fatal, but still representable as a tag.
    if schema.dollar_ref.is_some() {
        tags.push(Tag::Reference);
    }

    // 3-5. allOf / anyOf / oneOf
    if schema.all_of().is_some() {
        tags.push(Tag::AllOf);
    }
    if schema.any_of().is_some() {
        tags.push(Tag::AnyOf);
    }
    if schema.one_of().is_some() {
        tags.push(Tag::OneOf);
    }

    // 6. enum
    if schema.enum_values.is_some() {
        if schema.ts_enum_names.is_some() {
            tags.push(Tag::NamedEnum);
        } else {
            tags.push(Tag::UnnamedEnum);
        }
    }

    // 7. type is an array of type names -> UNION
    let is_multi_type = schema.schema_type.many().is_some();
    if is_multi_type {
        tags.push(Tag::Union);
    }

    // 8. type === 'array' or items present
    let is_array_like = schema.schema_type.single() == Some("array") || schema.items().is_some();
    if is_array_like {
        if schema.items().is_none() {
            tags.push(Tag::UntypedArray);
        } else {
            tags.push(Tag::TypedArray);
        }
    }

    // 9. type === 'object' or any object-shaped keyword present
    let is_object_like = schema.schema_type.single() == Some("object")
        || schema.properties().is_some()
        || schema.pattern_properties().is_some()
        || schema.additional_properties().is_some()
        || schema.property_names().is_some()
        || schema.extends().is_some()
        || schema.required.is_some();
    if is_object_like {
        let has_seed = schema.title.is_some() || schema.id.is_some();
        let has_props = schema.properties().map(|p| !p.is_empty()).unwrap_or(false);
        if has_seed && has_props {
            tags.push(Tag::NamedSchema);
        } else {
            tags.push(Tag::UnnamedSchema);
        }
    }

    // 10. scalar `type` dispatch. Two narrowings of spec.md's literal text,
    // both forced by its own worked examples (see DESIGN.md):
    // - it only fires when `type` is explicitly present as a single scalar
    //   string; an absent `type` never synthesizes an OBJECT tag out of
    //   nothing, it just leaves the node to the {ANY} default below (so a
    //   bare `allOf` or `{}` schema doesn't pick up a spurious OBJECT tag).
    // - it's skipped when rule 6 (enum), 7, 8, or 9 already claimed the
    //   node's shape: the worked enum example (spec.md §8 S2) classifies an
    //   enum with a declared `type` to ENUM alone, treating the `type` as
    //   the enum members' own value type rather than an independent tag.
    let has_enum_tag = schema.enum_values.is_some();
    let is_scalar_type = schema.schema_type.single().is_some();
    if is_scalar_type && !is_multi_type && !is_array_like && !is_object_like && !has_enum_tag {
        match schema.schema_type.single() {
            Some("string") => tags.push(Tag::String),
            Some("number") | Some("integer") => tags.push(Tag::Number),
            Some("boolean") => tags.push(Tag::Boolean),
            Some("null") => tags.push(Tag::Null),
            Some("never") => tags.push(Tag::Never),
            _ => tags.push(Tag::Object),
        }
    }

    if tags.is_empty() {
        tags.push(Tag::Any);
    }

    dedup_preserve_order(tags)
}

fn dedup_preserve_order(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = Vec::with_capacity(tags.len());
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{link, SchemaType};
    use serde_json::json;

    #[test]
    fn empty_schema_defaults_to_any() {
        let schema = link(&json!({}));
        assert_eq!(classify(&schema), vec![Tag::Any]);
    }

    #[test]
    fn plain_string() {
        let schema = link(&json!({ "type": "string" }));
        assert_eq!(classify(&schema), vec![Tag::String]);
    }

    #[test]
    fn all_of_without_a_type_keyword_has_no_spurious_object_tag() {
        // spec.md §8 S5's `allOf` root carries no `type` of its own; rule
        // 10 must not manufacture an OBJECT tag for it.
        let child = link(&json!({ "type": "string" }));
        let schema = crate::schema::SchemaNode::builder()
            .all_of(vec![child])
            .build();
        assert_eq!(classify(&schema), vec![Tag::AllOf]);
    }

    #[test]
    fn ts_type_wins_priority_but_other_rules_still_apply() {
        let schema = link(&json!({ "tsType": "Foo", "type": "string" }));
        assert_eq!(classify(&schema), vec![Tag::CustomType, Tag::String]);
    }

    #[test]
    fn enum_with_declared_type_classifies_as_enum_alone() {
        // spec.md §8 S2's worked example pairs `enum`+`tsEnumNames` with a
        // `type`, and expects a single ENUM node, not an intersection.
        let schema = link(&json!({ "enum": ["a"], "type": "string" }));
        assert_eq!(classify(&schema), vec![Tag::UnnamedEnum]);
    }

    #[test]
    fn named_enum_requires_ts_enum_names() {
        let schema = link(&json!({ "enum": ["a", "b"], "tsEnumNames": ["A", "B"] }));
        assert_eq!(classify(&schema), vec![Tag::NamedEnum]);
    }

    #[test]
    fn multi_type_union_has_no_redundant_object_tag() {
        let schema = link(&json!({ "type": ["string", "number"] }));
        assert_eq!(classify(&schema), vec![Tag::Union]);
    }

    #[test]
    fn array_with_items_is_typed_array_only() {
        let schema = link(&json!({ "items": { "type": "string" } }));
        assert_eq!(classify(&schema), vec![Tag::TypedArray]);
    }

    #[test]
    fn array_without_items_is_untyped() {
        let schema = link(&json!({ "type": "array" }));
        assert_eq!(classify(&schema), vec![Tag::UntypedArray]);
    }

    #[test]
    fn named_object_with_properties_has_no_redundant_object_tag() {
        let schema = link(&json!({
            "title": "Foo",
            "properties": { "a": { "type": "string" } }
        }));
        assert_eq!(classify(&schema), vec![Tag::NamedSchema]);
    }

    #[test]
    fn unnamed_object_without_title() {
        let schema = link(&json!({ "properties": { "a": { "type": "string" } } }));
        assert_eq!(classify(&schema), vec![Tag::UnnamedSchema]);
    }

    #[test]
    fn classification_ignores_parent_context() {
        // Same attributes, different graph position: identical classification.
        let parent = link(&json!({
            "properties": { "child": { "type": "string" } }
        }));
        let child = parent.properties().unwrap()["child"].clone();
        let standalone = link(&json!({ "type": "string" }));
        assert_eq!(classify(&child), classify(&standalone));
        assert_eq!(child.schema_type, SchemaType::Single("string".to_string()));
    }
}

//! End-to-end translations exercising the scenarios not already covered as
//! unit tests alongside `src/translator.rs` (S1, S2, S4, S6), plus the
//! fatal error taxonomy.

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::json;

use jsonschema_ast::ast::AstKind;
use jsonschema_ast::error::TranslateError;
use jsonschema_ast::options::Options;
use jsonschema_ast::schema::{link, SchemaNode, SchemaType};
use jsonschema_ast::translator::Translator;

fn run(root: &Rc<SchemaNode>) -> jsonschema_ast::ast::AstNode {
    let mut translator = Translator::new(root, Options::builder().build());
    translator.translate_root(root).unwrap()
}

#[test]
fn s3_enum_ref_resolves_to_a_type_reference_union() {
    let p1 = SchemaNode::builder()
        .title("Color".to_string())
        .schema_type(SchemaType::Single("string".to_string()))
        .enum_values(vec![json!("a"), json!("b"), json!("c")])
        .ts_enum_names(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        .build();

    let p2 = SchemaNode::builder()
        .schema_type(SchemaType::Single("string".to_string()))
        .enum_values(vec![json!("a")])
        .ts_enum_ref(Rc::clone(&p1))
        .build();

    let mut props = IndexMap::new();
    props.insert("P1".to_string(), Rc::clone(&p1));
    props.insert("P2".to_string(), Rc::clone(&p2));
    let root = SchemaNode::builder().properties(props).build();

    let ast = run(&root);
    let data = ast.borrow();
    let params = match &data.kind {
        AstKind::Interface(payload) => &payload.params,
        other => panic!("expected Interface, got {other:?}"),
    };
    let p2_ast = &params.iter().find(|p| p.key_name == "P2").unwrap().ast;
    match &p2_ast.borrow().kind {
        AstKind::Union(members) => {
            assert_eq!(members.len(), 1);
            assert!(matches!(
                members[0].borrow().kind,
                AstKind::TypeReference { .. }
            ));
        }
        other => panic!("expected Union, got {other:?}"),
    }
}

#[test]
fn s5_all_of_with_ts_extend_all_of_becomes_an_interface_with_a_super_type() {
    let mut base_props = IndexMap::new();
    base_props.insert(
        "id".to_string(),
        SchemaNode::builder()
            .schema_type(SchemaType::Single("string".to_string()))
            .build(),
    );
    let base = SchemaNode::builder()
        .title("B".to_string())
        .properties(base_props)
        .build();

    let mut target_props = IndexMap::new();
    target_props.insert(
        "x".to_string(),
        SchemaNode::builder()
            .schema_type(SchemaType::Single("string".to_string()))
            .build(),
    );
    let target = SchemaNode::builder()
        .ts_extend_all_of(true)
        .properties(target_props)
        .build();

    let root = SchemaNode::builder()
        .all_of(vec![Rc::clone(&base), Rc::clone(&target)])
        .build();

    let ast = run(&root);
    let data = ast.borrow();
    match &data.kind {
        AstKind::Interface(payload) => {
            assert_eq!(payload.params.len(), 1);
            assert_eq!(payload.params[0].key_name, "x");
            assert_eq!(payload.super_types.len(), 1);
            assert_eq!(
                payload.super_types[0].borrow().standalone_name.as_deref(),
                Some("B")
            );
        }
        other => panic!("expected Interface, got {other:?}"),
    }
}

#[test]
fn named_object_combined_with_all_of_does_not_spuriously_fail_to_name() {
    // A schema with both `allOf` and a named object shape classifies to
    // two tags (ALL_OF, NAMED_SCHEMA); the NAMED_SCHEMA child is built from
    // a naming-stripped clone that carries no title/id of its own. Its name
    // requirement must be satisfied by the name already resolved for the
    // enclosing INTERSECTION, not re-derived from the stripped clone.
    let root = link(&json!({
        "title": "Combined",
        "allOf": [{ "type": "object" }],
        "properties": { "x": { "type": "string" } }
    }));
    let ast = run(&root);
    let data = ast.borrow();
    assert_eq!(data.standalone_name.as_deref(), Some("Combined"));
    match &data.kind {
        AstKind::Intersection(members) => {
            let interface = members
                .iter()
                .find(|m| matches!(m.borrow().kind, AstKind::Interface(_)))
                .expect("expected an Interface member");
            match &interface.borrow().kind {
                AstKind::Interface(payload) => assert_eq!(payload.params.len(), 1),
                other => panic!("expected Interface, got {other:?}"),
            }
        }
        other => panic!("expected Intersection, got {other:?}"),
    }
}

#[test]
fn unresolved_reference_is_fatal() {
    let root = link(&json!({ "$ref": "#/definitions/Foo" }));
    let mut translator = Translator::new(&root, Options::builder().build());
    let err = translator.translate_root(&root).unwrap_err();
    assert!(matches!(err, TranslateError::UnresolvedReference { .. }));
}

#[test]
fn extends_with_property_names_is_fatal() {
    let root = link(&json!({
        "extends": [{ "title": "Base", "properties": { "a": { "type": "string" } } }],
        "propertyNames": { "enum": ["a", "b"], "tsEnumNames": ["A", "B"], "title": "Keys" }
    }));
    let mut translator = Translator::new(&root, Options::builder().build());
    let err = translator.translate_root(&root).unwrap_err();
    assert!(matches!(err, TranslateError::InvalidPropertyNames { .. }));
}

#[test]
fn pattern_property_names_is_not_treated_as_enum_like() {
    // A `pattern`-constrained `propertyNames` has no named type to hoist
    // into `paramsKeyType` (spec.md §4.5 step 6's "non-pattern, non-format"
    // gate); it must not trip the `propertyNames` target's MissingName
    // check, and `extends` may coexist with it since step 6 never engages.
    let root = link(&json!({
        "extends": [{ "title": "Base", "properties": { "a": { "type": "string" } } }],
        "propertyNames": { "type": "string", "pattern": "^[a-z]+$" },
        "properties": { "b": { "type": "number" } }
    }));
    let ast = run(&root);
    let data = ast.borrow();
    match &data.kind {
        AstKind::Interface(payload) => {
            assert!(payload.params_key_type.is_none());
            assert_eq!(payload.super_types.len(), 1);
        }
        other => panic!("expected Interface, got {other:?}"),
    }
}

#[test]
fn plain_string_property_names_is_not_treated_as_enum_like() {
    // `{"type": "string"}` with no `enum` at all is a ubiquitous,
    // perfectly ordinary `propertyNames` shape meaning "keys are strings";
    // it is not enum-like (spec.md §4.5 step 6's "must be enum-like,
    // producing a named type") and must fall through to the plain
    // interface path rather than raising MissingName for a nameless
    // STRING translation.
    let root = link(&json!({
        "extends": [{ "title": "Base", "properties": { "a": { "type": "string" } } }],
        "propertyNames": { "type": "string" },
        "properties": { "b": { "type": "number" } }
    }));
    let ast = run(&root);
    let data = ast.borrow();
    match &data.kind {
        AstKind::Interface(payload) => {
            assert!(payload.params_key_type.is_none());
            assert_eq!(payload.super_types.len(), 1);
        }
        other => panic!("expected Interface, got {other:?}"),
    }
}

#[test]
fn non_nameable_super_type_is_fatal() {
    let root = link(&json!({
        "extends": [{ "type": "string" }]
    }));
    let mut translator = Translator::new(&root, Options::builder().build());
    let err = translator.translate_root(&root).unwrap_err();
    assert!(matches!(err, TranslateError::InvalidSuperType { .. }));
}

#[test]
fn enum_ref_target_that_is_not_an_enum_is_fatal() {
    let ref_target = SchemaNode::builder()
        .schema_type(SchemaType::Single("string".to_string()))
        .build();
    let schema = SchemaNode::builder()
        .schema_type(SchemaType::Single("string".to_string()))
        .enum_values(vec![json!("a")])
        .ts_enum_ref(ref_target)
        .build();
    let mut translator = Translator::new(&schema, Options::builder().build());
    let err = translator.translate_root(&schema).unwrap_err();
    assert!(matches!(err, TranslateError::InvalidEnumRef { .. }));
}

#[test]
fn named_enum_without_a_derivable_name_is_fatal() {
    let schema = link(&json!({ "enum": ["a", "b"], "tsEnumNames": ["A", "B"] }));
    let mut translator = Translator::new(&schema, Options::builder().build());
    let err = translator.translate_root(&schema).unwrap_err();
    assert!(matches!(err, TranslateError::MissingName { .. }));
}

#[test]
fn unknown_any_option_replaces_any_with_unknown() {
    let schema = link(&json!({}));
    let mut translator = Translator::new(&schema, Options::builder().unknown_any(true).build());
    let ast = translator.translate_root(&schema).unwrap();
    assert!(matches!(ast.borrow().kind, AstKind::Unknown));
}

#[test]
fn naming_sanitizer_option_overrides_the_default_alphabet() {
    fn shout(seed: &str) -> String {
        seed.to_ascii_uppercase()
    }
    let root = link(&json!({ "title": "point", "properties": { "x": { "type": "number" } } }));
    let mut translator =
        Translator::new(&root, Options::builder().naming_sanitizer(shout).build());
    let ast = translator.translate_root(&root).unwrap();
    assert_eq!(ast.borrow().standalone_name.as_deref(), Some("POINT"));
}

#[test]
fn same_schema_reached_twice_yields_the_same_ast_by_identity() {
    let shared = SchemaNode::builder()
        .schema_type(SchemaType::Single("string".to_string()))
        .build();
    let mut props = IndexMap::new();
    props.insert("a".to_string(), Rc::clone(&shared));
    props.insert("b".to_string(), Rc::clone(&shared));
    let root = SchemaNode::builder().properties(props).build();

    let ast = run(&root);
    let data = ast.borrow();
    match &data.kind {
        AstKind::Interface(payload) => {
            let a = &payload.params[0].ast;
            let b = &payload.params[1].ast;
            assert!(Rc::ptr_eq(a, b));
        }
        other => panic!("expected Interface, got {other:?}"),
    }
}

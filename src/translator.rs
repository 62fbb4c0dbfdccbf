//! The Translator (spec.md §4.6): the recursive dispatcher that drives
//! every other component. One `Translator` owns the whole run's `Cache`,
//! `NameGenerator` and `DefinitionsIndex` — mirroring how one
//! `jtd-derive::gen::Generator` owns one run's definition cache and is
//! consumed once (spec.md §5: translations don't share state across runs).

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{instrument, warn};

use crate::array;
use crate::ast::{self, AstKind, AstNode, InterfacePayload, TuplePayload};
use crate::cache::Cache;
use crate::classifier::{self, Tag};
use crate::definitions::DefinitionsIndex;
use crate::error::{Result, TranslateError};
use crate::interface;
use crate::names::NameGenerator;
use crate::options::Options;
use crate::schema::{SchemaNode, SchemaType};

pub struct Translator {
    cache: Cache,
    names: NameGenerator,
    definitions: DefinitionsIndex,
    options: Options,
    /// Memoizes `name_for` by schema identity. Without this, calling
    /// `name_for` twice for the same schema (the Interface Builder's own
    /// step 1, then the general post-build hoisting in `translate`) would
    /// ask the name generator twice for the same seed and get back two
    /// different, both-legitimately-unique names.
    name_cache: HashMap<usize, Option<String>>,
}

impl Translator {
    pub fn new(root: &Rc<SchemaNode>, options: Options) -> Self {
        let names = match options.naming_sanitizer {
            Some(sanitizer) => NameGenerator::with_sanitizer(sanitizer),
            None => NameGenerator::new(),
        };
        Self {
            cache: Cache::new(),
            names,
            definitions: DefinitionsIndex::build(root),
            options,
            name_cache: HashMap::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// An ANY sentinel, or UNKNOWN in its place when `unknownAny` is set
    /// (spec.md §6).
    pub fn any(&self) -> AstNode {
        if self.options.unknown_any {
            ast::node(AstKind::Unknown)
        } else {
            ast::node(AstKind::Any)
        }
    }

    /// Resolve (and memoize) a standalone name for `schema`, trying its
    /// `title`, then `id`, then the Definitions Index, in that order
    /// (spec.md §4.2). Returns the same name on every later call for the
    /// same schema identity.
    pub fn name_for(&mut self, schema: &Rc<SchemaNode>) -> Option<String> {
        let id = schema.id_ptr();
        if let Some(cached) = self.name_cache.get(&id) {
            return cached.clone();
        }
        let seed = schema
            .title
            .clone()
            .or_else(|| schema.id.clone())
            .or_else(|| self.definitions.lookup(schema).map(str::to_string));
        let name = self.names.generate(seed.as_deref());
        self.name_cache.insert(id, name.clone());
        name
    }

    /// Entry point: translate the root schema with a fresh cache.
    #[instrument(skip_all, fields(schema = %root.describe()))]
    pub fn translate_root(&mut self, root: &Rc<SchemaNode>) -> Result<AstNode> {
        self.translate(root, None)
    }

    #[instrument(skip(self, schema), fields(schema = %schema.describe()))]
    pub fn translate(&mut self, schema: &Rc<SchemaNode>, key_name: Option<&str>) -> Result<AstNode> {
        let tags = classifier::classify(schema);
        let schema_id = schema.id_ptr();
        let primary_tag = tags[0];

        let (slot, owns) = self.cache.get_or_insert_placeholder(schema_id, primary_tag);
        ast::lift_key_name(&slot, key_name);
        if !owns {
            return Ok(slot);
        }

        if tags.len() == 1 {
            let tag = tags[0];
            let kind = self.build_for_tag(schema, tag, None)?;
            ast::fill(&slot, kind);
            if let Some(desc) = &schema.description {
                ast::set_comment(&slot, desc.clone());
            }
            if let Some(name) = self.name_for(schema) {
                ast::set_standalone_name(&slot, name);
            } else if tag == Tag::NamedEnum {
                return Err(TranslateError::MissingName {
                    schema: schema.describe(),
                    what: "named enum",
                });
            }
            Ok(slot)
        } else {
            // Multi-tag: the slot we just installed IS the intersection
            // (spec.md §4.6 "first install and return an INTERSECTION
            // placeholder"). It claims the hoisted description/id/title;
            // per-tag children translate from a stripped clone so they
            // never independently pick those up (spec.md §3 invariant 6).
            if let Some(desc) = &schema.description {
                ast::set_comment(&slot, desc.clone());
            }
            let resolved_name = self.name_for(schema);
            if let Some(name) = &resolved_name {
                ast::set_standalone_name(&slot, name.clone());
            }
            let stripped = strip_naming_attrs(schema);
            let mut params = Vec::with_capacity(tags.len());
            for tag in &tags {
                // The intersection above already owns the resolved name
                // (or has established there is none to have); a per-tag
                // NamedSchema child must not re-derive one from `stripped`,
                // which has no title/id of its own and was never indexed by
                // the Definitions Index, so `name_for(stripped)` would
                // always return `None` and spuriously fail the NamedSchema
                // name requirement even though the schema is, in fact,
                // already named.
                let kind = self.build_for_tag(&stripped, *tag, resolved_name.as_deref())?;
                params.push(ast::node(kind));
            }
            ast::fill(&slot, AstKind::Intersection(params));
            Ok(slot)
        }
    }

    fn build_for_tag(
        &mut self,
        schema: &Rc<SchemaNode>,
        tag: Tag,
        resolved_name: Option<&str>,
    ) -> Result<AstKind> {
        match tag {
            Tag::CustomType => Ok(AstKind::CustomType(
                schema.ts_type.clone().expect("classifier guarantees tsType"),
            )),
            Tag::Reference => Err(TranslateError::UnresolvedReference {
                schema: schema.describe(),
            }),
            Tag::AllOf => self.build_all_of(schema),
            Tag::AnyOf => {
                let children = schema.any_of().expect("classifier guarantees anyOf");
                self.build_union(&children)
            }
            Tag::OneOf => {
                let children = schema.one_of().expect("classifier guarantees oneOf");
                self.build_union(&children)
            }
            Tag::Union => self.build_type_array_union(schema),
            Tag::NamedEnum => self.build_named_enum(schema),
            Tag::UnnamedEnum => self.build_unnamed_enum(schema),
            Tag::NamedSchema => {
                interface::build(self, schema, true, resolved_name.map(str::to_string))
            }
            Tag::UnnamedSchema => {
                interface::build(self, schema, false, resolved_name.map(str::to_string))
            }
            Tag::TypedArray | Tag::UntypedArray => self.build_array(schema),
            Tag::String => Ok(AstKind::String),
            Tag::Number => Ok(AstKind::Number),
            Tag::Boolean => Ok(AstKind::Boolean),
            Tag::Null => Ok(AstKind::Null),
            Tag::Never => Ok(AstKind::Never),
            Tag::Object => Ok(AstKind::Object),
            Tag::Any => {
                warn!(schema = %schema.describe(), "classification fell back to ANY");
                Ok(if self.options.unknown_any {
                    AstKind::Unknown
                } else {
                    AstKind::Any
                })
            }
        }
    }

    fn build_union(&mut self, children: &[Rc<SchemaNode>]) -> Result<AstKind> {
        let members = children
            .iter()
            .map(|c| self.translate(c, None))
            .collect::<Result<Vec<_>>>()?;
        Ok(AstKind::Union(members))
    }

    fn build_all_of(&mut self, schema: &Rc<SchemaNode>) -> Result<AstKind> {
        let children = schema.all_of().expect("classifier guarantees allOf");
        let flagged_index = children.iter().position(|c| c.ts_extend_all_of);

        match flagged_index {
            None => {
                let members = children
                    .iter()
                    .map(|c| self.translate(c, None))
                    .collect::<Result<Vec<_>>>()?;
                Ok(AstKind::Intersection(members))
            }
            Some(idx) => {
                let flagged_ast = self.translate(&children[idx], None)?;
                let flagged_payload = {
                    let data = flagged_ast.borrow();
                    match &data.kind {
                        AstKind::Interface(payload) => payload.clone(),
                        _ => {
                            return Err(TranslateError::InvalidSuperType {
                                schema: children[idx].describe(),
                            })
                        }
                    }
                };

                let mut super_types = Vec::with_capacity(children.len() - 1);
                for (i, child) in children.iter().enumerate() {
                    if i == idx {
                        continue;
                    }
                    let ast = self.translate(child, None)?;
                    if ast::standalone_name(&ast).is_none() {
                        return Err(TranslateError::InvalidSuperType {
                            schema: child.describe(),
                        });
                    }
                    super_types.push(ast);
                }

                Ok(AstKind::Interface(InterfacePayload {
                    params: flagged_payload.params,
                    params_key_type: flagged_payload.params_key_type,
                    super_types,
                    generic_params: flagged_payload.generic_params,
                    generic_values: flagged_payload.generic_values,
                }))
            }
        }
    }

    fn build_type_array_union(&mut self, schema: &Rc<SchemaNode>) -> Result<AstKind> {
        let type_names = schema
            .schema_type
            .many()
            .expect("classifier guarantees a multi-type array")
            .to_vec();
        let mut members = Vec::with_capacity(type_names.len());
        for type_name in type_names {
            let variant = single_type_variant(schema, &type_name);
            members.push(self.translate(&variant, None)?);
        }
        Ok(AstKind::Union(members))
    }

    fn build_named_enum(&mut self, schema: &Rc<SchemaNode>) -> Result<AstKind> {
        let values = schema
            .enum_values
            .as_deref()
            .expect("classifier guarantees enum");
        let names = schema
            .ts_enum_names
            .as_deref()
            .expect("classifier guarantees tsEnumNames for NAMED_ENUM");
        let members = values
            .iter()
            .zip(names.iter())
            .map(|(value, name)| (name.clone(), ast::node(AstKind::Literal(value.clone()))))
            .collect();
        Ok(AstKind::Enum(members))
    }

    fn build_unnamed_enum(&mut self, schema: &Rc<SchemaNode>) -> Result<AstKind> {
        let values = schema
            .enum_values
            .as_deref()
            .expect("classifier guarantees enum");

        match schema.ts_enum_ref() {
            None => {
                let members = values
                    .iter()
                    .map(|v| ast::node(AstKind::Literal(v.clone())))
                    .collect();
                Ok(AstKind::Union(members))
            }
            Some(reference) => {
                let ref_ast = self.translate(&reference, None)?;
                let ref_members = match &ref_ast.borrow().kind {
                    AstKind::Enum(members) => members.clone(),
                    _ => {
                        return Err(TranslateError::InvalidEnumRef {
                            schema: schema.describe(),
                            reason: "tsEnumRef target did not translate to ENUM".to_string(),
                        })
                    }
                };
                let mut refs = Vec::with_capacity(values.len());
                for value in values {
                    let matched = ref_members.iter().find(|(_, member_ast)| {
                        matches!(&member_ast.borrow().kind, AstKind::Literal(v) if v == value)
                    });
                    match matched {
                        Some((_, member_ast)) => refs.push(ast::node(AstKind::TypeReference {
                            base: ref_ast.clone(),
                            picked: member_ast.clone(),
                        })),
                        None => {
                            return Err(TranslateError::InvalidEnumRef {
                                schema: schema.describe(),
                                reason: format!("value {value} is not a member of the referenced enum"),
                            })
                        }
                    }
                }
                Ok(AstKind::Union(refs))
            }
        }
    }

    fn build_array(&mut self, schema: &Rc<SchemaNode>) -> Result<AstKind> {
        let unknown_any = self.options.unknown_any;
        array::normalize(
            schema,
            |item| self.translate(item, None),
            move || {
                if unknown_any {
                    ast::node(AstKind::Unknown)
                } else {
                    ast::node(AstKind::Any)
                }
            },
        )
    }
}

/// Build a clone of `schema` with `description`/`id`/`title` removed, used
/// for the per-tag children of a multi-tag (intersection) translation
/// (spec.md §4.6) so they don't independently re-hoist those attributes.
fn strip_naming_attrs(schema: &Rc<SchemaNode>) -> Rc<SchemaNode> {
    build_stripped(schema, schema.schema_type.clone())
}

fn build_stripped(schema: &Rc<SchemaNode>, schema_type: SchemaType) -> Rc<SchemaNode> {
    let mut builder = SchemaNode::builder().schema_type(schema_type);
    builder = builder.ts_extend_all_of(schema.ts_extend_all_of);
    if let Some(p) = schema.parent() {
        builder = builder.parent(&p);
    }
    if let Some(v) = &schema.ts_type {
        builder = builder.ts_type(v.clone());
    }
    if let Some(v) = &schema.dollar_ref {
        builder = builder.dollar_ref(v.clone());
    }
    if let Some(v) = &schema.pattern {
        builder = builder.pattern(v.clone());
    }
    if let Some(v) = &schema.format {
        builder = builder.format(v.clone());
    }
    if let Some(v) = &schema.enum_values {
        builder = builder.enum_values(v.clone());
    }
    if let Some(v) = &schema.ts_enum_names {
        builder = builder.ts_enum_names(v.clone());
    }
    if let Some(v) = schema.min_items {
        builder = builder.min_items(v);
    }
    if let Some(v) = schema.max_items {
        builder = builder.max_items(v);
    }
    if let Some(v) = &schema.required {
        builder = builder.required(v.clone());
    }
    if let Some(v) = &schema.ts_generic_params {
        builder = builder.ts_generic_params(v.clone());
    }
    if let Some(v) = schema.all_of() {
        builder = builder.all_of(v);
    }
    if let Some(v) = schema.any_of() {
        builder = builder.any_of(v);
    }
    if let Some(v) = schema.one_of() {
        builder = builder.one_of(v);
    }
    if let Some(v) = schema.items() {
        builder = builder.items(v);
    }
    if let Some(v) = schema.additional_items() {
        builder = builder.additional_items(v);
    }
    if let Some(v) = schema.properties() {
        builder = builder.properties(v);
    }
    if let Some(v) = schema.pattern_properties() {
        builder = builder.pattern_properties(v);
    }
    if let Some(v) = schema.additional_properties() {
        builder = builder.additional_properties(v);
    }
    if let Some(v) = schema.property_names() {
        builder = builder.property_names(v);
    }
    if let Some(v) = schema.extends() {
        builder = builder.extends(v);
    }
    if let Some(v) = schema.definitions() {
        builder = builder.definitions(v);
    }
    if let Some(v) = schema.ts_enum_ref() {
        builder = builder.ts_enum_ref(v);
    }
    if let Some(v) = schema.ts_generic_values() {
        builder = builder.ts_generic_values(v);
    }
    builder.build()
}

/// A single-type variant of a multi-type (`type: [...]`) schema, used by
/// the array-typed UNION build rule (spec.md §4.6): same shape, `type`
/// narrowed to one name, naming attributes stripped.
fn single_type_variant(schema: &Rc<SchemaNode>, type_name: &str) -> Rc<SchemaNode> {
    build_stripped(schema, SchemaType::Single(type_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::link;
    use serde_json::json;

    fn translate(value: serde_json::Value) -> AstNode {
        let schema = link(&value);
        let mut t = Translator::new(&schema, Options::builder().build());
        t.translate_root(&schema).unwrap()
    }

    #[test]
    fn plain_string_translates_directly() {
        let ast = translate(json!({ "type": "string" }));
        assert!(matches!(ast.borrow().kind, AstKind::String));
    }

    #[test]
    fn s2_named_enum_with_index_names() {
        let ast = translate(json!({
            "type": "string",
            "enum": ["a", "b", "c"],
            "tsEnumNames": ["A", "B", "C"],
            "title": "Color"
        }));
        let data = ast.borrow();
        assert_eq!(data.standalone_name.as_deref(), Some("Color"));
        match &data.kind {
            AstKind::Enum(members) => {
                assert_eq!(members.len(), 3);
                assert_eq!(members[0].0, "A");
            }
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn s6_multi_type_union_hoists_naming_onto_the_union_itself() {
        let ast = translate(json!({
            "type": ["string", "number"],
            "title": "StrOrNum",
            "description": "doc"
        }));
        let data = ast.borrow();
        assert_eq!(data.standalone_name.as_deref(), Some("StrOrNum"));
        assert_eq!(data.comment.as_deref(), Some("doc"));
        match &data.kind {
            AstKind::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected Union, got {other:?}"),
        }
    }

    #[test]
    fn s4_self_referential_cycle_closes_on_the_same_ast_node() {
        let node = SchemaNode::builder()
            .title("Node".to_string())
            .properties(Default::default())
            .build();
        node.set_property("child", Rc::clone(&node));
        let mut t = Translator::new(&node, Options::builder().build());
        let ast = t.translate_root(&node).unwrap();
        let data = ast.borrow();
        match &data.kind {
            AstKind::Interface(payload) => {
                let child = &payload.params[0].ast;
                assert!(Rc::ptr_eq(child, &ast));
            }
            other => panic!("expected Interface, got {other:?}"),
        }
    }

    #[test]
    fn array_normalization_matches_s1() {
        let root = translate(json!({
            "properties": {
                "u": { "type": "array" },
                "tU": { "items": { "type": "string" } },
                "tMin": { "items": { "type": "string" }, "minItems": 2 },
                "tMax": { "items": { "type": "string" }, "maxItems": 2 },
                "tMM": { "items": { "type": "string" }, "minItems": 2, "maxItems": 5 },
                "more": {
                    "items": [{ "type": "string" }, { "type": "number" }],
                    "maxItems": 1
                }
            }
        }));
        let data = root.borrow();
        let params = match &data.kind {
            AstKind::Interface(payload) => &payload.params,
            other => panic!("expected Interface, got {other:?}"),
        };
        let find = |name: &str| {
            params
                .iter()
                .find(|p| p.key_name == name)
                .unwrap_or_else(|| panic!("missing param {name}"))
        };

        assert!(matches!(find("u").ast.borrow().kind, AstKind::Array(_)));
        assert!(matches!(find("tU").ast.borrow().kind, AstKind::Array(_)));

        match &find("tMin").ast.borrow().kind {
            AstKind::Tuple(TuplePayload { params, spread, .. }) => {
                assert_eq!(params.len(), 2);
                assert!(spread.is_some());
            }
            other => panic!("expected Tuple, got {other:?}"),
        }
        match &find("tMax").ast.borrow().kind {
            AstKind::Tuple(TuplePayload { params, spread, .. }) => {
                assert_eq!(params.len(), 2);
                assert!(spread.is_none());
            }
            other => panic!("expected Tuple, got {other:?}"),
        }
        match &find("tMM").ast.borrow().kind {
            AstKind::Tuple(TuplePayload { params, spread, .. }) => {
                assert_eq!(params.len(), 5);
                assert!(spread.is_none());
            }
            other => panic!("expected Tuple, got {other:?}"),
        }
        match &find("more").ast.borrow().kind {
            AstKind::Tuple(TuplePayload { params, spread, .. }) => {
                assert_eq!(params.len(), 1);
                assert!(spread.is_none());
            }
            other => panic!("expected Tuple, got {other:?}"),
        }
    }
}

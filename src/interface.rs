//! The Interface Builder (spec.md §4.5): turns a schema classified as
//! `(UN)NAMED_SCHEMA` into an `INTERFACE` AST node, or — when `propertyNames`
//! constrains the key type — an `INTERSECTION` of a mapped-key interface and
//! a concrete-keys interface.

use std::rc::Rc;

use tracing::debug;

use crate::ast::{self, AstKind, InterfaceParam, InterfacePayload};
use crate::error::{Result, TranslateError};
use crate::schema::{SchemaNode, SchemaOrBool};
use crate::translator::Translator;

/// The placeholder key used for catch-all params (`additionalProperties`,
/// `propertyNames`) — see the GLOSSARY's "Catch-all param / index key".
pub const CATCH_ALL_KEY: &str = "[key: string]";

/// Build the `INTERFACE` (or propertyNames-driven `INTERSECTION`) payload
/// for `schema`. `is_named` mirrors the classifier's NAMED_SCHEMA/
/// UNNAMED_SCHEMA distinction: only NAMED_SCHEMA requires the name step to
/// succeed. `resolved_name` lets a caller that has already resolved (and
/// hoisted) this schema's name elsewhere — the multi-tag/intersection path
/// in `Translator::translate`, where the name lives on the enclosing
/// `INTERSECTION` rather than on this per-tag child's naming-stripped
/// clone — supply it directly instead of this function re-deriving (and
/// likely failing to derive) one from `schema` itself.
pub fn build(
    t: &mut Translator,
    schema: &Rc<SchemaNode>,
    is_named: bool,
    resolved_name: Option<String>,
) -> Result<AstKind> {
    // Step 1: name.
    let name = match resolved_name {
        Some(name) => Some(name),
        None => t.name_for(schema),
    };
    if is_named && name.is_none() {
        return Err(TranslateError::MissingName {
            schema: schema.describe(),
            what: "named schema",
        });
    }

    let required: Vec<&str> = schema
        .required
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(String::as_str)
        .collect();

    // Step 2: properties.
    let mut params = Vec::new();
    if let Some(props) = schema.properties() {
        for (key, sub) in props.iter() {
            let ast = t.translate(sub, Some(key))?;
            params.push(InterfaceParam {
                ast,
                key_name: key.clone(),
                is_required: required.contains(&key.as_str()),
                is_pattern_property: false,
                is_unreachable_definition: false,
            });
        }
    }

    // Step 3: patternProperties, with the single-catch-all exception.
    let mut has_catch_all = false;
    if let Some(pattern_props) = schema.pattern_properties() {
        let no_additional = matches!(
            schema.additional_properties(),
            None | Some(SchemaOrBool::False)
        );
        if no_additional && pattern_props.len() == 1 {
            let (pattern, sub) = pattern_props.iter().next().unwrap();
            let ast = t.translate(sub, Some(pattern))?;
            ast::set_comment(&ast, format!("pattern: {pattern}"));
            params.push(InterfaceParam {
                ast,
                key_name: CATCH_ALL_KEY.to_string(),
                is_required: false,
                is_pattern_property: false,
                is_unreachable_definition: false,
            });
            has_catch_all = true;
        } else {
            for (pattern, sub) in pattern_props.iter() {
                let ast = t.translate(sub, Some(pattern))?;
                params.push(InterfaceParam {
                    ast,
                    key_name: pattern.clone(),
                    is_required: false,
                    is_pattern_property: true,
                    is_unreachable_definition: false,
                });
            }
        }
    }

    // Step 4: unreachableDefinitions.
    if t.options().unreachable_definitions {
        if let Some(defs) = schema.definitions() {
            for (key, sub) in defs.iter() {
                let ast = t.translate(sub, Some(key))?;
                ast::set_comment(&ast, format!("definitions: {key}"));
                params.push(InterfaceParam {
                    ast,
                    key_name: key.clone(),
                    is_required: false,
                    is_pattern_property: false,
                    is_unreachable_definition: true,
                });
            }
        }
    }

    // Step 5: additionalProperties.
    match schema.additional_properties() {
        Some(SchemaOrBool::True) => {
            if !has_catch_all {
                params.push(InterfaceParam {
                    ast: t.any(),
                    key_name: CATCH_ALL_KEY.to_string(),
                    is_required: false,
                    is_pattern_property: false,
                    is_unreachable_definition: false,
                });
            }
        }
        Some(SchemaOrBool::Schema(sub)) => {
            let ast = t.translate(&sub, Some(CATCH_ALL_KEY))?;
            params.push(InterfaceParam {
                ast,
                key_name: CATCH_ALL_KEY.to_string(),
                is_required: false,
                is_pattern_property: false,
                is_unreachable_definition: false,
            });
        }
        None | Some(SchemaOrBool::False) => {}
    }

    // Step 6: propertyNames. Only a non-pattern, non-format, enum-like
    // propertyNames schema is eligible for the mapped-key treatment
    // (spec.md §4.5 step 6: "must be enum-like, producing a named type").
    // A schema that merely constrains key strings via `pattern`/`format`,
    // or an ordinary `{"type": "string"}` with no `enum` at all, has no
    // named type to hoist into `paramsKeyType` — both fall through to the
    // plain interface path (step 7) as if `propertyNames` were absent,
    // rather than hitting the MissingName check below meant for an
    // enum-shaped target that simply lacks a derivable name.
    let eligible_property_names = schema
        .property_names()
        .filter(|pn| pn.pattern.is_none() && pn.format.is_none() && pn.enum_values.is_some());
    if let Some(property_names) = eligible_property_names {
        if schema.extends().is_some() {
            return Err(TranslateError::InvalidPropertyNames {
                schema: schema.describe(),
            });
        }
        let pn_ast = t.translate(&property_names, None)?;
        if ast::standalone_name(&pn_ast).is_none() {
            return Err(TranslateError::MissingName {
                schema: property_names.describe(),
                what: "propertyNames target",
            });
        }

        // The mapped-key catch-all's value type is ANY: `propertyNames`
        // constrains the key, not the value, and any concrete property
        // value types are already covered by `plain` below.
        let mapped = InterfacePayload {
            params: vec![InterfaceParam {
                ast: t.any(),
                key_name: CATCH_ALL_KEY.to_string(),
                is_required: false,
                is_pattern_property: false,
                is_unreachable_definition: false,
            }],
            params_key_type: Some(pn_ast),
            super_types: Vec::new(),
            generic_params: Vec::new(),
            generic_values: Vec::new(),
        };

        if params.is_empty() {
            debug!(schema = %schema.describe(), "propertyNames produced a plain mapped-key interface");
            return Ok(AstKind::Interface(mapped));
        }

        let plain = InterfacePayload {
            params,
            params_key_type: None,
            super_types: Vec::new(),
            generic_params: Vec::new(),
            generic_values: Vec::new(),
        };
        debug!(schema = %schema.describe(), "propertyNames produced mapped+concrete intersection");
        return Ok(AstKind::Intersection(vec![
            ast::node(AstKind::Interface(mapped)),
            ast::node(AstKind::Interface(plain)),
        ]));
    }

    // Step 7: plain interface, with super-types from `extends`.
    let mut super_types = Vec::new();
    if let Some(extends) = schema.extends() {
        for base in extends.iter() {
            let ast = t.translate(base, None)?;
            if ast::standalone_name(&ast).is_none() {
                return Err(TranslateError::InvalidSuperType {
                    schema: base.describe(),
                });
            }
            super_types.push(ast);
        }
    }

    let generic_params = schema.ts_generic_params.clone().unwrap_or_default();
    let mut generic_values = Vec::new();
    if let Some(values) = schema.ts_generic_values() {
        for v in values.iter() {
            generic_values.push(t.translate(v, None)?);
        }
    }

    Ok(AstKind::Interface(InterfacePayload {
        params,
        params_key_type: None,
        super_types,
        generic_params,
        generic_values,
    }))
}

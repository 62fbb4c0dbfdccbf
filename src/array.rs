//! The Array Normalizer (spec.md §4.4): consolidates the four overlapping
//! JSON-Schema array forms (`items` object, `items` tuple, `minItems`,
//! `maxItems`) into a single TUPLE-or-ARRAY shape, so that downstream
//! codegen never has to understand JSON Schema's array-keyword overlap.

use crate::ast::{AstKind, AstNode, TuplePayload};
use crate::error::Result;
use crate::schema::{Items, SchemaNode, SchemaOrBool};

/// Build the AST payload for a schema already classified as `TYPED_ARRAY` or
/// `UNTYPED_ARRAY`. `translate_item` resolves a single element sub-schema to
/// its AST (going back through the translator so caching/identity still
/// apply); `any` produces a fresh ANY-or-UNKNOWN sentinel node per the
/// `unknownAny` option.
pub fn normalize(
    schema: &SchemaNode,
    mut translate_item: impl FnMut(&std::rc::Rc<SchemaNode>) -> Result<AstNode>,
    any: impl Fn() -> AstNode,
) -> Result<AstKind> {
    match schema.items() {
        Some(Items::Tuple(list)) => {
            let mut params = list
                .iter()
                .map(&mut translate_item)
                .collect::<Result<Vec<_>>>()?;
            let min_items = schema.min_items.unwrap_or(0);
            let max_items = schema.max_items;
            // Invariant (spec.md §3 invariant 3 / §8 property 4): when
            // `maxItems` is finite, the element count is `max(minItems,
            // maxItems)` regardless of how many schemas were actually
            // listed — short lists pad with ANY, long lists truncate.
            if let Some(max) = max_items {
                let count = std::cmp::max(min_items, max) as usize;
                if params.len() > count {
                    params.truncate(count);
                } else {
                    params.resize_with(count, &any);
                }
            }
            // `spreadParam` is present iff `maxItems` is absent/infinite
            // (spec.md §3 invariant 3), independent of `additionalItems`:
            // a finite `maxItems` rules out a spread element even when
            // `additionalItems` is itself a schema or `true`.
            let spread = if max_items.is_none() {
                match schema.additional_items() {
                    None | Some(SchemaOrBool::False) => None,
                    Some(SchemaOrBool::True) => Some(any()),
                    Some(SchemaOrBool::Schema(s)) => Some(translate_item(&s)?),
                }
            } else {
                None
            };
            Ok(AstKind::Tuple(TuplePayload {
                params,
                spread,
                min_items,
                max_items,
            }))
        }
        Some(Items::Single(item)) => {
            let min_items = schema.min_items.unwrap_or(0);
            let max_items = schema.max_items;
            if min_items > 0 || max_items.is_some() {
                let element = translate_item(&item)?;
                let count = std::cmp::max(min_items, max_items.unwrap_or(0));
                let params = vec![element.clone(); count as usize];
                let spread = if max_items.is_none() {
                    Some(element)
                } else {
                    None
                };
                Ok(AstKind::Tuple(TuplePayload {
                    params,
                    spread,
                    min_items,
                    max_items,
                }))
            } else {
                Ok(AstKind::Array(translate_item(&item)?))
            }
        }
        None => {
            let min_items = schema.min_items.unwrap_or(0);
            let max_items = schema.max_items;
            if min_items > 0 || max_items.is_some() {
                let count = std::cmp::max(min_items, max_items.unwrap_or(0));
                let params = (0..count).map(|_| any()).collect();
                let spread = if max_items.is_none() { Some(any()) } else { None };
                Ok(AstKind::Tuple(TuplePayload {
                    params,
                    spread,
                    min_items,
                    max_items,
                }))
            } else {
                Ok(AstKind::Array(any()))
            }
        }
    }
}

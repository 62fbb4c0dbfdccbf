//! The Cache (spec.md §4.7): keyed by `(schema identity, Tag)`, not by
//! schema identity alone, since a multi-tag node is translated as an
//! `INTERSECTION` over distinct per-tag children that each need their own
//! cache slot (§4.6).
//!
//! This generalizes `jtd-derive::gen::Generator`'s `DefinitionState`
//! placeholder bookkeeping (`Processing` installed before a definition's
//! body is generated, then replaced once it's done) from "one slot per
//! Rust type" to "one slot per `(schema, tag)` pair", which is what lets a
//! self-referential schema (§8 S4) terminate: the second visit to the same
//! pair finds the placeholder already installed and returns it instead of
//! recursing again.

use std::collections::HashMap;

use tracing::trace;

use crate::ast::{placeholder, AstNode};
use crate::classifier::Tag;

#[derive(Default)]
pub struct Cache {
    slots: HashMap<(usize, Tag), AstNode>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, schema_id: usize, tag: Tag) -> Option<AstNode> {
        self.slots.get(&(schema_id, tag)).cloned()
    }

    /// Return the existing slot for `(schema_id, tag)` if present, else
    /// install a fresh placeholder and return that. The caller is
    /// responsible for telling the two cases apart (via the returned bool)
    /// so it knows whether it still owns filling the placeholder in, or
    /// whether some enclosing call already claimed that job.
    pub fn get_or_insert_placeholder(&mut self, schema_id: usize, tag: Tag) -> (AstNode, bool) {
        if let Some(existing) = self.slots.get(&(schema_id, tag)) {
            trace!(schema_id, ?tag, "cache hit");
            return (existing.clone(), false);
        }
        let slot = placeholder();
        self.slots.insert((schema_id, tag), slot.clone());
        trace!(schema_id, ?tag, "placeholder installed");
        (slot, true)
    }
}

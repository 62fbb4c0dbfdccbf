//! The Definitions Index (spec.md §4.3): a reverse lookup from schema-node
//! identity back to the key it's filed under in some `definitions` table,
//! used as a naming fallback when a schema has no `title`/`id` of its own.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::schema::SchemaNode;

pub struct DefinitionsIndex {
    by_id: HashMap<usize, String>,
}

impl DefinitionsIndex {
    /// Walk the whole tree reachable from `root`, recording every
    /// `definitions` entry by the schema node's identity. Re-entered nodes
    /// (shared by identity, or reachable via more than one path) are
    /// visited once.
    pub fn build(root: &Rc<SchemaNode>) -> Self {
        let mut by_id = HashMap::new();
        let mut visited = HashSet::new();
        walk(root, &mut by_id, &mut visited);
        Self { by_id }
    }

    pub fn lookup(&self, schema: &Rc<SchemaNode>) -> Option<&str> {
        self.by_id.get(&schema.id_ptr()).map(String::as_str)
    }
}

fn walk(
    node: &Rc<SchemaNode>,
    by_id: &mut HashMap<usize, String>,
    visited: &mut HashSet<usize>,
) {
    let id = node.id_ptr();
    if !visited.insert(id) {
        return;
    }
    if let Some(defs) = node.definitions() {
        for (key, def) in defs.iter() {
            by_id.entry(def.id_ptr()).or_insert_with(|| key.clone());
            walk(def, by_id, visited);
        }
    }
    for child in node.children() {
        walk(&child, by_id, visited);
    }
}

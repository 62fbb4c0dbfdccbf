//! The linked schema node consumed by the translator.
//!
//! A [`SchemaNode`] corresponds to spec.md §3's "linked schema node": a JSON
//! Schema object with every `$ref` already resolved by an external
//! dereferencer (out of scope here, spec.md §6) and a back-reference to its
//! parent. Sub-schema-bearing attributes (`properties`, `items`, `allOf`,
//! ...) hold `Rc<SchemaNode>` directly rather than re-parsed JSON, so that
//! a dereferencer which aliases two attributes to the same node hands us
//! the same `Rc` — which is exactly the sharing the cache (§4.7) and the
//! cycle test (§8 S4) depend on.
//!
//! Link-bearing fields live behind a `RefCell` (Design Notes item 1,
//! strategy (b)): the normal construction path fills them once via
//! [`SchemaNodeBuilder`], but a self- or mutually-referential fixture (S4)
//! has to patch a field after the `Rc` already exists, which plain `pub`
//! fields could not support.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value;

/// The `type` keyword: absent, a single type name, or (for union schemas)
/// a list of type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaType {
    #[default]
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl SchemaType {
    pub fn single(&self) -> Option<&str> {
        match self {
            SchemaType::Single(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn many(&self) -> Option<&[String]> {
        match self {
            SchemaType::Many(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// The `items` keyword: a single homogeneous schema, or a tuple-form list.
#[derive(Debug, Clone)]
pub enum Items {
    Single(Rc<SchemaNode>),
    Tuple(Vec<Rc<SchemaNode>>),
}

/// A keyword whose value is either a boolean or a sub-schema
/// (`additionalProperties`, `additionalItems`).
#[derive(Debug, Clone)]
pub enum SchemaOrBool {
    False,
    True,
    Schema(Rc<SchemaNode>),
}

impl SchemaOrBool {
    pub fn schema(&self) -> Option<&Rc<SchemaNode>> {
        match self {
            SchemaOrBool::Schema(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Default)]
struct SchemaLinks {
    all_of: Option<Vec<Rc<SchemaNode>>>,
    any_of: Option<Vec<Rc<SchemaNode>>>,
    one_of: Option<Vec<Rc<SchemaNode>>>,
    items: Option<Items>,
    additional_items: Option<SchemaOrBool>,
    properties: Option<IndexMap<String, Rc<SchemaNode>>>,
    pattern_properties: Option<IndexMap<String, Rc<SchemaNode>>>,
    additional_properties: Option<SchemaOrBool>,
    property_names: Option<Rc<SchemaNode>>,
    extends: Option<Vec<Rc<SchemaNode>>>,
    definitions: Option<IndexMap<String, Rc<SchemaNode>>>,
    ts_enum_ref: Option<Rc<SchemaNode>>,
    ts_generic_values: Option<Vec<Rc<SchemaNode>>>,
}

/// A linked JSON Schema node.
pub struct SchemaNode {
    parent: RefCell<Weak<SchemaNode>>,
    links: RefCell<SchemaLinks>,

    pub title: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub ts_type: Option<String>,
    pub dollar_ref: Option<String>,
    /// `pattern` / `format`: tracked only so the Interface Builder can tell
    /// a `propertyNames` schema that merely constrains key *strings* apart
    /// from one that's enum-like (spec.md §4.5 step 6's "non-pattern,
    /// non-format" gate) — neither keyword otherwise affects classification
    /// or AST shape.
    pub pattern: Option<String>,
    pub format: Option<String>,
    pub schema_type: SchemaType,
    pub enum_values: Option<Vec<Value>>,
    pub ts_enum_names: Option<Vec<String>>,
    pub ts_extend_all_of: bool,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub required: Option<Vec<String>>,
    pub ts_generic_params: Option<Vec<String>>,
}

impl SchemaNode {
    pub fn builder() -> SchemaNodeBuilder {
        SchemaNodeBuilder::default()
    }

    /// An opaque identity for this node, stable for the node's lifetime and
    /// distinct across distinct `Rc` allocations (spec.md §4.7: "Identity is
    /// reference equality on the linked schema, not structural"). Mirrors
    /// the address-derived identity trick this crate's lineage uses for
    /// Rust-type identity, applied here to schema-node identity instead.
    pub fn id_ptr(self: &Rc<Self>) -> usize {
        Rc::as_ptr(self) as usize
    }

    pub fn parent(&self) -> Option<Rc<SchemaNode>> {
        self.parent.borrow().upgrade()
    }

    pub fn root(self: &Rc<Self>) -> Rc<SchemaNode> {
        let mut current = Rc::clone(self);
        while let Some(p) = current.parent() {
            current = p;
        }
        current
    }

    pub fn all_of(&self) -> Option<Vec<Rc<SchemaNode>>> {
        self.links.borrow().all_of.clone()
    }
    pub fn any_of(&self) -> Option<Vec<Rc<SchemaNode>>> {
        self.links.borrow().any_of.clone()
    }
    pub fn one_of(&self) -> Option<Vec<Rc<SchemaNode>>> {
        self.links.borrow().one_of.clone()
    }
    pub fn items(&self) -> Option<Items> {
        self.links.borrow().items.clone()
    }
    pub fn additional_items(&self) -> Option<SchemaOrBool> {
        self.links.borrow().additional_items.clone()
    }
    pub fn properties(&self) -> Option<IndexMap<String, Rc<SchemaNode>>> {
        self.links.borrow().properties.clone()
    }
    pub fn pattern_properties(&self) -> Option<IndexMap<String, Rc<SchemaNode>>> {
        self.links.borrow().pattern_properties.clone()
    }
    pub fn additional_properties(&self) -> Option<SchemaOrBool> {
        self.links.borrow().additional_properties.clone()
    }
    pub fn property_names(&self) -> Option<Rc<SchemaNode>> {
        self.links.borrow().property_names.clone()
    }
    pub fn extends(&self) -> Option<Vec<Rc<SchemaNode>>> {
        self.links.borrow().extends.clone()
    }
    pub fn definitions(&self) -> Option<IndexMap<String, Rc<SchemaNode>>> {
        self.links.borrow().definitions.clone()
    }
    pub fn ts_enum_ref(&self) -> Option<Rc<SchemaNode>> {
        self.links.borrow().ts_enum_ref.clone()
    }
    pub fn ts_generic_values(&self) -> Option<Vec<Rc<SchemaNode>>> {
        self.links.borrow().ts_generic_values.clone()
    }

    /// Patch in a property after construction. The only way to build a
    /// self-referential fixture (§8 S4): create the node, then alias one of
    /// its own properties back to the `Rc` that was just produced.
    pub fn set_property(&self, key: impl Into<String>, node: Rc<SchemaNode>) {
        self.links
            .borrow_mut()
            .properties
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), node);
    }

    /// Every sub-schema directly reachable from this node, in no particular
    /// order. Used by the Definitions Index walk (§4.3); re-entrancy is the
    /// caller's concern (it tracks `id_ptr` visitation itself).
    pub fn children(&self) -> Vec<Rc<SchemaNode>> {
        let links = self.links.borrow();
        let mut out = Vec::new();
        if let Some(v) = &links.all_of {
            out.extend(v.iter().cloned());
        }
        if let Some(v) = &links.any_of {
            out.extend(v.iter().cloned());
        }
        if let Some(v) = &links.one_of {
            out.extend(v.iter().cloned());
        }
        match &links.items {
            Some(Items::Single(s)) => out.push(s.clone()),
            Some(Items::Tuple(v)) => out.extend(v.iter().cloned()),
            None => {}
        }
        if let Some(SchemaOrBool::Schema(s)) = &links.additional_items {
            out.push(s.clone());
        }
        if let Some(m) = &links.properties {
            out.extend(m.values().cloned());
        }
        if let Some(m) = &links.pattern_properties {
            out.extend(m.values().cloned());
        }
        if let Some(SchemaOrBool::Schema(s)) = &links.additional_properties {
            out.push(s.clone());
        }
        if let Some(s) = &links.property_names {
            out.push(s.clone());
        }
        if let Some(v) = &links.extends {
            out.extend(v.iter().cloned());
        }
        if let Some(m) = &links.definitions {
            out.extend(m.values().cloned());
        }
        if let Some(s) = &links.ts_enum_ref {
            out.push(s.clone());
        }
        if let Some(v) = &links.ts_generic_values {
            out.extend(v.iter().cloned());
        }
        out
    }

    /// Best-effort human label for error messages and tracing spans.
    pub fn describe(&self) -> String {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| "<anonymous schema>".to_string())
    }
}

/// Builder for [`SchemaNode`]. Construction is top-down in the common case
/// (a parent node is built from already-built children), so most fields are
/// set once here; [`SchemaNode::set_property`] exists only for the cyclic
/// exception.
#[derive(Default)]
pub struct SchemaNodeBuilder {
    parent: Weak<SchemaNode>,
    title: Option<String>,
    id: Option<String>,
    description: Option<String>,
    ts_type: Option<String>,
    dollar_ref: Option<String>,
    pattern: Option<String>,
    format: Option<String>,
    schema_type: SchemaType,
    enum_values: Option<Vec<Value>>,
    ts_enum_names: Option<Vec<String>>,
    ts_extend_all_of: bool,
    min_items: Option<u64>,
    max_items: Option<u64>,
    required: Option<Vec<String>>,
    ts_generic_params: Option<Vec<String>>,
    links: SchemaLinks,
}

macro_rules! setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value);
            self
        }
    };
}

impl SchemaNodeBuilder {
    pub fn parent(mut self, parent: &Rc<SchemaNode>) -> Self {
        self.parent = Rc::downgrade(parent);
        self
    }

    setter!(title, String);
    setter!(id, String);
    setter!(description, String);
    setter!(ts_type, String);
    setter!(dollar_ref, String);
    setter!(pattern, String);
    setter!(format, String);
    setter!(enum_values, Vec<Value>);
    setter!(ts_enum_names, Vec<String>);
    setter!(min_items, u64);
    setter!(max_items, u64);
    setter!(required, Vec<String>);
    setter!(ts_generic_params, Vec<String>);

    pub fn schema_type(mut self, ty: SchemaType) -> Self {
        self.schema_type = ty;
        self
    }

    pub fn ts_extend_all_of(mut self, flag: bool) -> Self {
        self.ts_extend_all_of = flag;
        self
    }

    pub fn all_of(mut self, v: Vec<Rc<SchemaNode>>) -> Self {
        self.links.all_of = Some(v);
        self
    }
    pub fn any_of(mut self, v: Vec<Rc<SchemaNode>>) -> Self {
        self.links.any_of = Some(v);
        self
    }
    pub fn one_of(mut self, v: Vec<Rc<SchemaNode>>) -> Self {
        self.links.one_of = Some(v);
        self
    }
    pub fn items(mut self, items: Items) -> Self {
        self.links.items = Some(items);
        self
    }
    pub fn additional_items(mut self, v: SchemaOrBool) -> Self {
        self.links.additional_items = Some(v);
        self
    }
    pub fn properties(mut self, v: IndexMap<String, Rc<SchemaNode>>) -> Self {
        self.links.properties = Some(v);
        self
    }
    pub fn pattern_properties(mut self, v: IndexMap<String, Rc<SchemaNode>>) -> Self {
        self.links.pattern_properties = Some(v);
        self
    }
    pub fn additional_properties(mut self, v: SchemaOrBool) -> Self {
        self.links.additional_properties = Some(v);
        self
    }
    pub fn property_names(mut self, v: Rc<SchemaNode>) -> Self {
        self.links.property_names = Some(v);
        self
    }
    pub fn extends(mut self, v: Vec<Rc<SchemaNode>>) -> Self {
        self.links.extends = Some(v);
        self
    }
    pub fn definitions(mut self, v: IndexMap<String, Rc<SchemaNode>>) -> Self {
        self.links.definitions = Some(v);
        self
    }
    pub fn ts_enum_ref(mut self, v: Rc<SchemaNode>) -> Self {
        self.links.ts_enum_ref = Some(v);
        self
    }
    pub fn ts_generic_values(mut self, v: Vec<Rc<SchemaNode>>) -> Self {
        self.links.ts_generic_values = Some(v);
        self
    }

    pub fn build(self) -> Rc<SchemaNode> {
        Rc::new(SchemaNode {
            parent: RefCell::new(self.parent),
            links: RefCell::new(self.links),
            title: self.title,
            id: self.id,
            description: self.description,
            ts_type: self.ts_type,
            dollar_ref: self.dollar_ref,
            pattern: self.pattern,
            format: self.format,
            schema_type: self.schema_type,
            enum_values: self.enum_values,
            ts_enum_names: self.ts_enum_names,
            ts_extend_all_of: self.ts_extend_all_of,
            min_items: self.min_items,
            max_items: self.max_items,
            required: self.required,
            ts_generic_params: self.ts_generic_params,
        })
    }
}

/// Parse a plain (un-dereferenced) JSON document into a linked schema tree.
///
/// This is a convenience for tests and for embedders with no dereferencer
/// of their own — spec.md §6 treats `$ref` resolution as an external
/// collaborator, and this function does not perform it: a `$ref` left in
/// the input surfaces later as the fatal `REFERENCE` classification
/// (spec.md §4.1 rule 2), exactly as it would for a caller's own unresolved
/// input. It cannot produce the aliased-identity sharing a real
/// dereferencer gives you for free; build cyclic fixtures by hand with
/// [`SchemaNode::builder`] and [`SchemaNode::set_property`] instead.
pub fn link(value: &Value) -> Rc<SchemaNode> {
    link_with_parent(value, Weak::new())
}

fn link_with_parent(value: &Value, parent: Weak<SchemaNode>) -> Rc<SchemaNode> {
    let obj = value.as_object();
    let get = |key: &str| obj.and_then(|o| o.get(key));

    let title = get("title").and_then(Value::as_str).map(str::to_string);
    let id = get("id").and_then(Value::as_str).map(str::to_string);
    let description = get("description").and_then(Value::as_str).map(str::to_string);
    let ts_type = get("tsType").and_then(Value::as_str).map(str::to_string);
    let dollar_ref = get("$ref").and_then(Value::as_str).map(str::to_string);
    let pattern = get("pattern").and_then(Value::as_str).map(str::to_string);
    let format = get("format").and_then(Value::as_str).map(str::to_string);
    let schema_type = match get("type") {
        Some(Value::String(s)) => SchemaType::Single(s.clone()),
        Some(Value::Array(items)) => SchemaType::Many(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        _ => SchemaType::Absent,
    };
    let enum_values = get("enum").and_then(Value::as_array).cloned();
    let ts_enum_names = get("tsEnumNames").and_then(Value::as_array).map(|v| {
        v.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });
    let ts_extend_all_of = get("tsExtendAllOf")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let min_items = get("minItems").and_then(Value::as_u64);
    let max_items = get("maxItems").and_then(Value::as_u64);
    let required = get("required").and_then(Value::as_array).map(|v| {
        v.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });
    let ts_generic_params = get("tsGenericParams").and_then(Value::as_array).map(|v| {
        v.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    let node = Rc::new(SchemaNode {
        parent: RefCell::new(parent),
        links: RefCell::new(SchemaLinks::default()),
        title,
        id,
        description,
        ts_type,
        dollar_ref,
        pattern,
        format,
        schema_type,
        enum_values,
        ts_enum_names,
        ts_extend_all_of,
        min_items,
        max_items,
        required,
        ts_generic_params,
    });
    let weak = Rc::downgrade(&node);

    let link_list = |v: Option<&Value>, weak: &Weak<SchemaNode>| -> Option<Vec<Rc<SchemaNode>>> {
        v.and_then(Value::as_array).map(|arr| {
            arr.iter()
                .map(|item| link_with_parent(item, weak.clone()))
                .collect()
        })
    };
    let link_map =
        |v: Option<&Value>, weak: &Weak<SchemaNode>| -> Option<IndexMap<String, Rc<SchemaNode>>> {
            v.and_then(Value::as_object).map(|map| {
                map.iter()
                    .map(|(k, v)| (k.clone(), link_with_parent(v, weak.clone())))
                    .collect()
            })
        };
    let link_or_bool = |v: Option<&Value>, weak: &Weak<SchemaNode>| -> Option<SchemaOrBool> {
        match v {
            None => None,
            Some(Value::Bool(true)) => Some(SchemaOrBool::True),
            Some(Value::Bool(false)) => Some(SchemaOrBool::False),
            Some(other) => Some(SchemaOrBool::Schema(link_with_parent(other, weak.clone()))),
        }
    };

    let items = match get("items") {
        Some(Value::Array(_)) => Some(Items::Tuple(
            link_list(get("items"), &weak).unwrap_or_default(),
        )),
        Some(other) => Some(Items::Single(link_with_parent(other, weak.clone()))),
        None => None,
    };

    {
        let mut links = node.links.borrow_mut();
        links.all_of = link_list(get("allOf"), &weak);
        links.any_of = link_list(get("anyOf"), &weak);
        links.one_of = link_list(get("oneOf"), &weak);
        links.items = items;
        links.additional_items = link_or_bool(get("additionalItems"), &weak);
        links.properties = link_map(get("properties"), &weak);
        links.pattern_properties = link_map(get("patternProperties"), &weak);
        links.additional_properties = link_or_bool(get("additionalProperties"), &weak);
        links.property_names = get("propertyNames").map(|v| link_with_parent(v, weak.clone()));
        links.extends = link_list(get("extends"), &weak);
        links.definitions = link_map(get("definitions"), &weak);
        links.ts_enum_ref = None;
        links.ts_generic_values = link_list(get("tsGenericValues"), &weak);
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn links_properties_in_order_with_parent_back_refs() {
        let root = link(&json!({
            "title": "Root",
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "number" }
            }
        }));
        let props = root.properties().unwrap();
        let keys: Vec<_> = props.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        let a = &props["a"];
        assert!(Rc::ptr_eq(&a.parent().unwrap(), &root));
        assert!(Rc::ptr_eq(&a.root(), &root));
    }

    #[test]
    fn set_property_wires_a_cycle() {
        let node = SchemaNode::builder().title("Node".to_string()).build();
        node.set_property("child", Rc::clone(&node));
        let child = node.properties().unwrap()["child"].clone();
        assert!(Rc::ptr_eq(&child, &node));
    }
}

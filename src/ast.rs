//! The language-neutral AST (spec.md §3).
//!
//! `AstNode` is `Rc<RefCell<AstNodeData>>` rather than a plain owned tree:
//! the translator installs an empty placeholder into the cache *before*
//! recursing (§4.6), hands that same `Rc` out to every caller that hits the
//! same `(schema, tag)` pair while it is still under construction, and
//! fills it in place once the real payload is ready. This is Design Notes
//! item 1's strategy (b) — interior mutability for recursive links — and
//! it is what lets a cyclic schema (§8 S4) produce a cyclic AST: the
//! `child` param and the enclosing `INTERFACE` end up being the literal
//! same `Rc`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

pub type AstNode = Rc<RefCell<AstNodeData>>;

/// Every AST node, regardless of kind, carries these three optional
/// cross-cutting attributes (spec.md §3).
#[derive(Debug, Clone)]
pub struct AstNodeData {
    pub kind: AstKind,
    pub key_name: Option<String>,
    pub standalone_name: Option<String>,
    pub comment: Option<String>,
}

impl AstNodeData {
    pub fn placeholder() -> Self {
        Self::new(AstKind::Placeholder)
    }

    pub fn new(kind: AstKind) -> Self {
        Self {
            kind,
            key_name: None,
            standalone_name: None,
            comment: None,
        }
    }
}

/// The closed sum of spec.md §3's payload table, plus `Placeholder`: the
/// empty shape a node has between being installed in the cache and being
/// filled in place (never observed by a caller outside this crate once
/// translation has completed, but a recursive reference may see it mid-walk
/// and that is exactly how cycles close).
#[derive(Debug, Clone, Default)]
pub enum AstKind {
    #[default]
    Placeholder,
    Literal(Value),
    String,
    Number,
    Boolean,
    Null,
    Object,
    Never,
    Any,
    Unknown,
    CustomType(String),
    Array(AstNode),
    Tuple(TuplePayload),
    Union(Vec<AstNode>),
    Intersection(Vec<AstNode>),
    Enum(Vec<(String, AstNode)>),
    Interface(InterfacePayload),
    TypeReference { base: AstNode, picked: AstNode },
}

#[derive(Debug, Clone)]
pub struct TuplePayload {
    pub params: Vec<AstNode>,
    pub spread: Option<AstNode>,
    pub min_items: u64,
    pub max_items: Option<u64>,
}

/// One parameter of an [`AstKind::Interface`] (spec.md §3: "An INTERFACE
/// param is (ast, keyName, isRequired, isPatternProperty,
/// isUnreachableDefinition)").
#[derive(Debug, Clone)]
pub struct InterfaceParam {
    pub ast: AstNode,
    pub key_name: String,
    pub is_required: bool,
    pub is_pattern_property: bool,
    pub is_unreachable_definition: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InterfacePayload {
    pub params: Vec<InterfaceParam>,
    pub params_key_type: Option<AstNode>,
    pub super_types: Vec<AstNode>,
    pub generic_params: Vec<String>,
    pub generic_values: Vec<AstNode>,
}

pub fn node(kind: AstKind) -> AstNode {
    Rc::new(RefCell::new(AstNodeData::new(kind)))
}

pub fn placeholder() -> AstNode {
    Rc::new(RefCell::new(AstNodeData::placeholder()))
}

/// Fill a previously-installed placeholder in place, so that every
/// outstanding reference to it (in particular one captured mid-cycle)
/// observes the final payload.
pub fn fill(target: &AstNode, kind: AstKind) {
    target.borrow_mut().kind = kind;
}

/// Lift a `keyName` onto a cached node if it doesn't already carry one
/// (spec.md §4.6: "return it after lifting `keyName` onto it if previously
/// absent"). A node can be reached via more than one property, and the
/// first caller to name it wins.
pub fn lift_key_name(target: &AstNode, key_name: Option<&str>) {
    if let Some(k) = key_name {
        let mut data = target.borrow_mut();
        if data.key_name.is_none() {
            data.key_name = Some(k.to_string());
        }
    }
}

pub fn set_standalone_name(target: &AstNode, name: impl Into<String>) {
    target.borrow_mut().standalone_name = Some(name.into());
}

pub fn set_comment(target: &AstNode, comment: impl Into<String>) {
    target.borrow_mut().comment = Some(comment.into());
}

pub fn standalone_name(node: &AstNode) -> Option<String> {
    node.borrow().standalone_name.clone()
}

/// Debug-ish single-line rendering used by tests and tracing events; not
/// meant to be a serialization format.
pub fn describe(ast: &AstNode) -> String {
    let data = ast.borrow();
    match &data.kind {
        AstKind::Placeholder => "Placeholder".to_string(),
        AstKind::Literal(v) => format!("Literal({v})"),
        AstKind::String => "String".to_string(),
        AstKind::Number => "Number".to_string(),
        AstKind::Boolean => "Boolean".to_string(),
        AstKind::Null => "Null".to_string(),
        AstKind::Object => "Object".to_string(),
        AstKind::Never => "Never".to_string(),
        AstKind::Any => "Any".to_string(),
        AstKind::Unknown => "Unknown".to_string(),
        AstKind::CustomType(t) => format!("CustomType({t})"),
        AstKind::Array(_) => "Array".to_string(),
        AstKind::Tuple(t) => format!(
            "Tuple(params={}, spread={})",
            t.params.len(),
            t.spread.is_some()
        ),
        AstKind::Union(members) => format!("Union({})", members.len()),
        AstKind::Intersection(members) => format!("Intersection({})", members.len()),
        AstKind::Enum(members) => format!("Enum({})", members.len()),
        AstKind::Interface(i) => format!("Interface(params={})", i.params.len()),
        AstKind::TypeReference { .. } => "TypeReference".to_string(),
    }
}

impl fmt::Display for AstNodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

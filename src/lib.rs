//! Translates a linked JSON Schema document into a language-neutral
//! [`ast::AstNode`] tree suitable for driving downstream type-declaration
//! code generation.
//!
//! `$ref` resolution happens upstream — a caller with its own dereferencer
//! hands this crate an already-linked [`schema::SchemaNode`] tree (every
//! node carrying a parent back-reference, every `$ref` replaced by the
//! referenced node, shared by identity). Callers without one of their own
//! can use [`schema::link`] to build a linked tree from plain JSON for
//! tests and small embeddings, at the cost of `$ref` support.
//!
//! # Example
//!
//! ```
//! use jsonschema_ast::{schema, translator::Translator, options::Options};
//!
//! let root = schema::link(&serde_json::json!({
//!     "title": "Point",
//!     "properties": {
//!         "x": { "type": "number" },
//!         "y": { "type": "number" }
//!     },
//!     "required": ["x", "y"]
//! }));
//!
//! let mut translator = Translator::new(&root, Options::builder().build());
//! let ast = translator.translate_root(&root).unwrap();
//! assert_eq!(ast.borrow().standalone_name.as_deref(), Some("Point"));
//! ```

pub mod array;
pub mod ast;
pub mod cache;
pub mod classifier;
pub mod definitions;
pub mod error;
pub mod interface;
pub mod names;
pub mod options;
pub mod schema;
pub mod translator;

pub use error::{Result, TranslateError};
pub use options::Options;
pub use translator::Translator;

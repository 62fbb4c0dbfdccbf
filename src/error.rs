//! The error taxonomy of spec.md §7, `thiserror`-derived the way
//! `jtd-derive::gen::GenError` derives its own (smaller) error enum.
//!
//! Every variant is fatal: translation does not produce a partial AST on
//! error (§7 "no recovery path; the caller restarts with corrected input").

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranslateError>;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unresolved $ref on schema {schema}")]
    UnresolvedReference { schema: String },

    #[error("{what} on schema {schema} has no derivable standalone name")]
    MissingName { schema: String, what: &'static str },

    #[error("schema {schema} combines `extends` with `propertyNames`")]
    InvalidPropertyNames { schema: String },

    #[error("super-type schema {schema} does not translate to an interface")]
    InvalidSuperType { schema: String },

    #[error("tsEnumRef on schema {schema} is invalid: {reason}")]
    InvalidEnumRef { schema: String, reason: String },
}

//! The Name Generator (spec.md §4.2): turns a seed string (a title, an `id`,
//! a property key, a definitions key) into a standalone name that is both a
//! legal identifier-ish string and unique within this translation run.
//!
//! Sanitization follows the case-conversion style this corpus reaches for
//! elsewhere when deriving identifiers from schema-shaped input (see
//! `graph-classify.rs` in the retrieval pack): strip everything that isn't
//! ASCII alphanumeric or `_`, prefix a leading digit, and fall back to a
//! generic placeholder for an empty result. Disambiguation is a numeric
//! suffix loop, mirroring `jtd-derive`'s naming-strategy fallback for
//! colliding type names.

use std::collections::HashSet;

/// A seed-to-stem sanitizer, overridable per run (spec.md §4.2's "target
/// naming alphabet" hook, exposed via `Options::builder().naming_sanitizer`).
/// Plain `fn` rather than a boxed closure: every sanitizer this crate or its
/// callers need is a stateless, context-free string transform, so there's no
/// captured state to justify `Box<dyn Fn>`.
pub type Sanitizer = fn(&str) -> String;

/// Generates unique standalone names for one translation run. Not
/// thread-safe and not meant to be: one `Translator` owns exactly one of
/// these (spec.md §5).
pub struct NameGenerator {
    used: HashSet<String>,
    sanitizer: Sanitizer,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self {
            used: HashSet::new(),
            sanitizer: sanitize,
        }
    }
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`NameGenerator::new`], but with the seed-sanitization alphabet
    /// overridden (spec.md §4.2; e.g. a target language with a different
    /// identifier grammar than this crate's default Rust-identifier-safe
    /// one).
    pub fn with_sanitizer(sanitizer: Sanitizer) -> Self {
        Self {
            used: HashSet::new(),
            sanitizer,
        }
    }

    /// Reserve a name up front (used when a schema's own `title`/`id` must
    /// win ties over names synthesized later).
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Produce a fresh, unused name derived from `seed`. Per spec.md §4.2,
    /// "returns nothing when no seed is available" — a missing seed yields
    /// `None` rather than a synthesized placeholder name; a seed that
    /// *sanitizes* to empty still gets the generic `"GeneratedType"` stem,
    /// since a seed was present, just not identifier-shaped.
    pub fn generate(&mut self, seed: Option<&str>) -> Option<String> {
        let seed = seed?;
        let stem = (self.sanitizer)(seed);
        let mut candidate = stem.clone();
        let mut suffix = 1u32;
        while self.used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{stem}{suffix}");
        }
        self.used.insert(candidate.clone());
        Some(candidate)
    }
}

/// Sanitize a seed string into a legal standalone-name candidate: ASCII
/// alphanumerics and `_` only, a leading digit gets `_`-prefixed, and an
/// empty result maps to `"GeneratedType"`.
fn sanitize(seed: &str) -> String {
    let mut out: String = seed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    out = out.trim_matches('_').to_string();
    if out.is_empty() {
        return "GeneratedType".to_string();
    }
    if out.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_punctuation_and_spaces() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.generate(Some("Foo Bar!")).as_deref(), Some("Foo_Bar"));
    }

    #[test]
    fn prefixes_leading_digit() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.generate(Some("123abc")).as_deref(), Some("_123abc"));
    }

    #[test]
    fn missing_seed_returns_none() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.generate(None), None);
    }

    #[test]
    fn seed_with_only_punctuation_falls_back_to_generic_stem() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.generate(Some("???")).as_deref(), Some("GeneratedType"));
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let mut gen = NameGenerator::new();
        assert_eq!(gen.generate(Some("Foo")).as_deref(), Some("Foo"));
        assert_eq!(gen.generate(Some("Foo")).as_deref(), Some("Foo2"));
        assert_eq!(gen.generate(Some("Foo")).as_deref(), Some("Foo3"));
    }

    #[test]
    fn reserved_names_are_skipped_by_later_generation() {
        let mut gen = NameGenerator::new();
        gen.reserve("Foo");
        assert_eq!(gen.generate(Some("Foo")).as_deref(), Some("Foo2"));
    }

    #[test]
    fn custom_sanitizer_overrides_the_default_alphabet() {
        fn shout(seed: &str) -> String {
            seed.to_ascii_uppercase()
        }
        let mut gen = NameGenerator::with_sanitizer(shout);
        assert_eq!(gen.generate(Some("foo bar")).as_deref(), Some("FOO BAR"));
    }
}

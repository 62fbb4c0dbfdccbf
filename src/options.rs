//! Translation configuration (spec.md §6 "Configuration options consumed"),
//! built the same way as `jtd-derive::gen::GeneratorBuilder`: a small
//! `#[derive(Default)]`-friendly struct assembled through a builder rather
//! than a constructor with positional bools.

use crate::names::Sanitizer;

#[derive(Debug, Clone)]
pub struct Options {
    /// When true, the ANY sentinel is replaced by UNKNOWN throughout.
    pub unknown_any: bool,
    /// When true, `definitions` children become params of their parent
    /// interface (§4.5 step 4).
    pub unreachable_definitions: bool,
    /// Overrides the Name Generator's seed-to-stem alphabet (spec.md §4.2).
    /// `None` keeps the default Rust-identifier-safe alphabet.
    pub naming_sanitizer: Option<Sanitizer>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unknown_any: false,
            unreachable_definitions: false,
            naming_sanitizer: None,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    unknown_any: Option<bool>,
    unreachable_definitions: Option<bool>,
    naming_sanitizer: Option<Sanitizer>,
}

impl OptionsBuilder {
    pub fn unknown_any(mut self, value: bool) -> Self {
        self.unknown_any = Some(value);
        self
    }

    pub fn unreachable_definitions(mut self, value: bool) -> Self {
        self.unreachable_definitions = Some(value);
        self
    }

    /// Override the Name Generator's seed-to-stem alphabet (spec.md §4.2).
    pub fn naming_sanitizer(mut self, value: Sanitizer) -> Self {
        self.naming_sanitizer = Some(value);
        self
    }

    pub fn build(self) -> Options {
        let defaults = Options::default();
        Options {
            unknown_any: self.unknown_any.unwrap_or(defaults.unknown_any),
            unreachable_definitions: self
                .unreachable_definitions
                .unwrap_or(defaults.unreachable_definitions),
            naming_sanitizer: self.naming_sanitizer.or(defaults.naming_sanitizer),
        }
    }
}

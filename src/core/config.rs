//! Translator configuration.
//!
//! [`TranslatorConfig`] replaces the compile-time print/emit toggles of older
//! SIL front ends with plain values handed to the driver.

use hashbrown::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Source symbol of the designated entry/script function by default.
pub const DEFAULT_ENTRY_SYMBOL: &str = "main";

/// Display name given to the script entity.
pub const SCRIPT_ENTITY_NAME: &str = "main";

/// Demangled names of functions that are never translated.
#[derive(Debug, Clone, Default)]
pub struct BuiltinFilter {
    names: HashSet<String>,
}

impl BuiltinFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a newline separated name list. Blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Whether the demangled name is filtered.
    pub fn contains(&self, demangled: &str) -> bool {
        self.names.contains(demangled)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Options controlling a translation run.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Append empty placeholder nodes to block statements.
    pub add_empty_nodes: bool,
    /// Source symbol of the script entry function.
    pub entry_symbol: String,
    /// Functions skipped by demangled name.
    pub builtins: BuiltinFilter,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            add_empty_nodes: true,
            entry_symbol: DEFAULT_ENTRY_SYMBOL.to_string(),
            builtins: BuiltinFilter::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_nodes(mut self, add_empty_nodes: bool) -> Self {
        self.add_empty_nodes = add_empty_nodes;
        self
    }

    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    pub fn with_builtins(mut self, builtins: BuiltinFilter) -> Self {
        self.builtins = builtins;
        self
    }
}

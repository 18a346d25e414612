// This module provides arena-based translation session management using the bumpalo crate
// to simplify lifetime management in silcast. TranslationSession owns a reference to the
// arena allocator and ties every string stored in the produced CAst (symbol names, type
// names, block labels, sentinel constants) to one unified lifetime, so node handles can be
// passed around freely without per-node ownership. Strings are interned: equal names share
// one arena allocation. The session also tracks translation statistics in SessionStats:
// functions translated or skipped (builtin filter, empty body), blocks, instructions with a
// per-opcode breakdown, empty placeholder nodes emitted and omitted, unimplemented-kind hits,
// and bindings created and removed. Statistics use interior mutability so the session can be
// shared immutably by the AST factory and the translator during a single pass.

//! Arena-based translation session management.
//!
//! All strings referenced from produced nodes live in the session arena and
//! share its lifetime.

use bumpalo::Bump;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::collections::HashMap as StdHashMap;
use std::fmt;

/// Arena-based translation session.
pub struct TranslationSession<'arena> {
    /// Arena allocator for interned strings.
    arena: &'arena Bump,

    /// Session statistics for debugging.
    stats: RefCell<SessionStats>,

    /// String interning for efficient storage. std's map is required here: the
    /// session is borrowed for `'arena` and its drop must not touch the entries.
    interned_strings: RefCell<StdHashMap<String, &'arena str>>,

    /// Display name of the function being translated.
    current_function: RefCell<Option<String>>,
}

impl<'arena> TranslationSession<'arena> {
    /// Create a new translation session with the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            interned_strings: RefCell::new(StdHashMap::new()),
            current_function: RefCell::new(None),
        }
    }

    /// Get access to the arena allocator.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned: &'arena str = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Set the function being translated.
    pub fn set_current_function(&self, name: &str) {
        *self.current_function.borrow_mut() = Some(name.to_string());
    }

    /// Display name of the function being translated, if any.
    pub fn current_function(&self) -> Option<String> {
        self.current_function.borrow().clone()
    }

    /// Clear per-function state once an entity is finalized.
    pub fn clear_function_state(&self) {
        *self.current_function.borrow_mut() = None;
    }

    /// Record that a function produced an entity.
    pub fn record_function_translated(&self, name: &str, block_count: usize) {
        let mut stats = self.stats.borrow_mut();
        stats.functions_translated += 1;
        stats.blocks_translated += block_count;

        if stats.largest_function_blocks < block_count {
            stats.largest_function_blocks = block_count;
            stats.largest_function_name = name.to_string();
        }
    }

    /// Record a function dropped by the builtin filter.
    pub fn record_builtin_skipped(&self) {
        self.stats.borrow_mut().builtins_skipped += 1;
    }

    /// Record a function dropped for having no instructions.
    pub fn record_empty_skipped(&self) {
        self.stats.borrow_mut().empty_functions_skipped += 1;
    }

    /// Record an instruction translation.
    pub fn record_instruction(&self, opcode: &str) {
        let mut stats = self.stats.borrow_mut();
        stats.instructions_translated += 1;
        *stats
            .instruction_counts
            .entry(opcode.to_string())
            .or_insert(0) += 1;
    }

    /// Record an instruction whose kind has no translation rule yet.
    pub fn record_unimplemented(&self) {
        self.stats.borrow_mut().unimplemented_hits += 1;
    }

    /// Record an empty placeholder node, appended or omitted.
    pub fn record_empty_node(&self, omitted: bool) {
        let mut stats = self.stats.borrow_mut();
        if omitted {
            stats.empty_nodes_omitted += 1;
        } else {
            stats.empty_nodes_emitted += 1;
        }
    }

    pub fn record_binding_created(&self) {
        self.stats.borrow_mut().bindings_created += 1;
    }

    pub fn record_binding_removed(&self) {
        self.stats.borrow_mut().bindings_removed += 1;
    }

    /// Get translation statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Translation session statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of functions that produced an entity.
    pub functions_translated: usize,

    /// Functions skipped by the builtin filter.
    pub builtins_skipped: usize,

    /// Functions skipped for having an empty body.
    pub empty_functions_skipped: usize,

    /// Number of basic blocks translated.
    pub blocks_translated: usize,

    /// Number of instructions translated.
    pub instructions_translated: usize,

    /// Count of each opcode translated.
    pub instruction_counts: HashMap<String, usize>,

    /// Function with the most basic blocks.
    pub largest_function_blocks: usize,

    /// Name of largest function.
    pub largest_function_name: String,

    /// Empty placeholder nodes appended to blocks.
    pub empty_nodes_emitted: usize,

    /// Empty placeholder nodes dropped by configuration.
    pub empty_nodes_omitted: usize,

    /// Instructions whose kind has no translation rule.
    pub unimplemented_hits: usize,

    /// Value bindings created.
    pub bindings_created: usize,

    /// Value bindings removed.
    pub bindings_removed: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Translation Session Statistics:")?;
        writeln!(f, "  Functions translated: {}", self.functions_translated)?;
        writeln!(f, "  Builtins skipped: {}", self.builtins_skipped)?;
        writeln!(f, "  Empty functions skipped: {}", self.empty_functions_skipped)?;
        writeln!(f, "  Blocks translated: {}", self.blocks_translated)?;
        writeln!(f, "  Instructions translated: {}", self.instructions_translated)?;
        writeln!(f, "  Unimplemented instructions: {}", self.unimplemented_hits)?;
        writeln!(
            f,
            "  Empty nodes: {} emitted, {} omitted",
            self.empty_nodes_emitted, self.empty_nodes_omitted
        )?;
        writeln!(
            f,
            "  Bindings: {} created, {} removed",
            self.bindings_created, self.bindings_removed
        )?;

        if !self.largest_function_name.is_empty() {
            writeln!(
                f,
                "  Largest function: {} ({} blocks)",
                self.largest_function_name, self.largest_function_blocks
            )?;
        }

        if !self.instruction_counts.is_empty() {
            writeln!(f, "  Instruction breakdown:")?;
            let mut sorted: Vec<_> = self.instruction_counts.iter().collect();
            sorted.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)));

            for (opcode, count) in sorted.into_iter().take(10) {
                writeln!(f, "    {}: {}", opcode, count)?;
            }
        }

        Ok(())
    }
}

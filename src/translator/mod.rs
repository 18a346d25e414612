// This module drives the translation of a SIL module into CAst entities. The Translator
// value carries everything that lives for the whole pass: the node factory, the session
// (string interning, statistics), the configuration, the diagnostic sink and the value
// binding table. The pass is split the same way the data is nested: `module` iterates
// functions and applies the builtin and empty-body filters, `function` establishes the
// entity metadata (name, span, parameters, return type), `block` runs the dispatcher over
// one block and assembles the labeled block statement, and `dispatcher` holds the
// per-instruction translation rules. `entity` defines the records handed to the consumer.
// The pass is single threaded and deterministic: everything observable is produced in
// input order.

//! SIL to CAst translation.
//!
//! ```text
//! SilModule ─▶ {SilFunction}* ─▶ {SilBlock}* ─▶ {Instruction}* ─▶ nodes
//!                    │                 │
//!                    ▼                 ▼
//!                 Entity  ◀───────  BlockStmt
//! ```

use crate::cast::AstFactory;
use crate::core::{DiagnosticSink, TranslateResult, TranslationSession, TranslatorConfig};
use crate::sil::SilModule;

pub mod block;
pub mod dispatcher;
pub mod entity;
pub mod function;
pub mod module;
pub mod value_table;

pub use dispatcher::{Lowered, Rule, SymbolShape};
pub use entity::{Entity, NodeInfo, NodeInfoMap, Parameter, ReturnType, TranslatedModule};
pub use value_table::{Binding, Declaration, ValueTable};

/// Type recorded for results whose instruction declares none.
pub const UNKNOWN_TYPE: &str = "<unknown>";

/// State of one translation pass.
pub struct Translator<'a, 'arena, F: AstFactory> {
    factory: &'a mut F,
    session: &'a TranslationSession<'arena>,
    config: &'a TranslatorConfig,
    sink: &'a mut dyn DiagnosticSink,
    table: ValueTable<F::Node>,
    /// File reported for nodes whose instruction names none.
    source_file: Option<String>,
}

impl<'a, 'arena, F: AstFactory> Translator<'a, 'arena, F> {
    pub fn new(
        factory: &'a mut F,
        session: &'a TranslationSession<'arena>,
        config: &'a TranslatorConfig,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            factory,
            session,
            config,
            sink,
            table: ValueTable::new(),
            source_file: None,
        }
    }

    pub fn factory(&self) -> &F {
        &*self.factory
    }

    pub fn table(&self) -> &ValueTable<F::Node> {
        &self.table
    }
}

/// Translate a whole module with a fresh binding table.
pub fn translate_module<F: AstFactory>(
    factory: &mut F,
    session: &TranslationSession<'_>,
    module: &SilModule,
    config: &TranslatorConfig,
    sink: &mut dyn DiagnosticSink,
) -> TranslateResult<TranslatedModule<F::Node>> {
    Translator::new(factory, session, config, sink).translate_module(module)
}

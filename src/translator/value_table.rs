// This module implements the value binding table that maps source value identities to the
// target symbols standing for them. A binding is created by allocation-like instructions,
// by rebind rules that define a fresh result, and by the function translator for named
// arguments; it is removed by scope-terminating instructions. Bindings persist across
// blocks and across functions of a module, since SIL scopes (access, borrow, stack
// allocation) are closed by explicit instructions rather than by block boundaries. Every
// created symbol also produces a declaration node that is queued for the block being
// translated; the queue is the only per-block state and is cleared at each block start.
// Symbol names are derived from the value identity, with a generation suffix when an
// identity is bound again, so no two declarations share a name.

//! Value binding table.

use crate::cast::{AstFactory, NodeKind};
use crate::core::{TranslateError, TranslateResult};
use crate::sil::ValueId;
use hashbrown::HashMap;
use std::hash::Hash;

/// A live binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<N> {
    /// `Var` or `ObjectLiteral` symbol node.
    pub symbol: N,
    /// Declaration emitted when the binding was created.
    pub decl: N,
    pub name: String,
    pub ty: String,
    pub kind: NodeKind,
}

/// Declaration queued for the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<N> {
    pub value: ValueId,
    pub symbol: N,
    pub decl: N,
}

/// Maps value identities to target symbols.
#[derive(Debug)]
pub struct ValueTable<N> {
    bindings: HashMap<ValueId, Binding<N>>,
    /// Times each identity has been bound, for unique symbol names.
    generations: HashMap<ValueId, u32>,
    pending: Vec<Declaration<N>>,
}

impl<N> Default for ValueTable<N> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            generations: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> ValueTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to a fresh variable symbol of type `ty`.
    ///
    /// Any previous binding of `value` is replaced.
    pub fn create<F>(&mut self, factory: &mut F, value: ValueId, ty: &str) -> N
    where
        F: AstFactory<Node = N>,
    {
        self.create_symbol(factory, value, ty, NodeKind::Var)
    }

    /// Bind `value` to a fresh object literal symbol of type `ty`.
    pub fn create_object<F>(&mut self, factory: &mut F, value: ValueId, ty: &str) -> N
    where
        F: AstFactory<Node = N>,
    {
        self.create_symbol(factory, value, ty, NodeKind::ObjectLiteral)
    }

    fn create_symbol<F>(&mut self, factory: &mut F, value: ValueId, ty: &str, kind: NodeKind) -> N
    where
        F: AstFactory<Node = N>,
    {
        let generation = self.generations.entry(value).or_insert(0);
        let name = match *generation {
            0 => value.to_string(),
            n => format!("{}.{}", value, n),
        };
        *generation += 1;

        let name_node = factory.make_constant(&name);
        let symbol = factory.make_node(kind, &[name_node]);

        let decl_name = factory.make_constant(&name);
        let decl_type = factory.make_constant(ty);
        let decl = factory.make_node(NodeKind::DeclStmt, &[decl_name, decl_type]);

        log::trace!("\t [CREATE] {} as {} : {}", value, name, ty);
        let binding = Binding {
            symbol,
            decl,
            name,
            ty: ty.to_string(),
            kind,
        };
        if let Some(old) = self.bindings.insert(value, binding) {
            log::trace!("\t [REBIND] {} replaces {}", value, old.name);
        }

        self.pending.push(Declaration { value, symbol, decl });
        symbol
    }

    /// Symbol bound to `value`.
    pub fn get(&self, value: ValueId) -> TranslateResult<N> {
        self.bindings
            .get(&value)
            .map(|b| b.symbol)
            .ok_or(TranslateError::UnboundValue { value })
    }

    /// Symbol bound to `value`, which must have the given shape.
    pub fn get_as(&self, value: ValueId, expected: NodeKind) -> TranslateResult<N> {
        let binding = self
            .bindings
            .get(&value)
            .ok_or(TranslateError::UnboundValue { value })?;
        if binding.kind != expected {
            return Err(TranslateError::UnexpectedSymbolKind {
                value,
                expected,
                found: binding.kind,
            });
        }
        Ok(binding.symbol)
    }

    pub fn binding(&self, value: ValueId) -> Option<&Binding<N>> {
        self.bindings.get(&value)
    }

    pub fn contains(&self, value: ValueId) -> bool {
        self.bindings.contains_key(&value)
    }

    /// Remove the binding for `value`. Returns false if there was none.
    pub fn try_remove(&mut self, value: ValueId) -> bool {
        match self.bindings.remove(&value) {
            Some(binding) => {
                log::trace!("\t [REMOVED] {} ({})", value, binding.name);
                true
            }
            None => {
                log::trace!("\t [NOP] {} is not bound", value);
                false
            }
        }
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop queued declarations. Bindings are kept.
    pub fn clear_block_state(&mut self) {
        self.pending.clear();
    }

    /// Declarations queued since the last [`clear_block_state`](Self::clear_block_state), in creation order.
    pub fn pending_declarations(&self) -> &[Declaration<N>] {
        &self.pending
    }

    pub fn take_declarations(&mut self) -> Vec<Declaration<N>> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::CAst;
    use crate::core::TranslationSession;
    use bumpalo::Bump;

    #[test]
    fn test_create_then_get() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        let sym = table.create(&mut ast, ValueId(3), "Int");
        assert_eq!(table.get(ValueId(3)), Ok(sym));
        assert_eq!(ast.kind(sym), NodeKind::Var);

        let binding = table.binding(ValueId(3)).unwrap();
        assert_eq!(binding.ty, "Int");
        assert_eq!(ast.dump(binding.decl), "(DeclStmt \"v3\" \"Int\")");
    }

    #[test]
    fn test_remove_then_get_is_fatal() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        table.create(&mut ast, ValueId(0), "Int");
        assert!(table.try_remove(ValueId(0)));
        assert_eq!(
            table.get(ValueId(0)),
            Err(TranslateError::UnboundValue { value: ValueId(0) })
        );
    }

    #[test]
    fn test_remove_unbound_is_noop() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        table.create(&mut ast, ValueId(1), "Int");
        assert!(!table.try_remove(ValueId(9)));
        assert_eq!(table.len(), 1);
        assert!(table.contains(ValueId(1)));
    }

    #[test]
    fn test_rebinding_replaces_and_renames() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        let first = table.create(&mut ast, ValueId(2), "Int");
        let second = table.create(&mut ast, ValueId(2), "Float");
        assert_ne!(first, second);
        assert_eq!(table.get(ValueId(2)), Ok(second));
        assert_eq!(table.len(), 1);

        let names: Vec<_> = table
            .pending_declarations()
            .iter()
            .map(|d| ast.dump(d.decl))
            .collect();
        assert_eq!(
            names,
            vec!["(DeclStmt \"v2\" \"Int\")", "(DeclStmt \"v2.1\" \"Float\")"]
        );
    }

    #[test]
    fn test_clear_block_state_keeps_bindings() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        table.create(&mut ast, ValueId(0), "Int");
        table.create_object(&mut ast, ValueId(1), "Array");
        assert_eq!(table.pending_declarations().len(), 2);

        table.clear_block_state();
        assert!(table.pending_declarations().is_empty());
        assert!(table.get(ValueId(0)).is_ok());
        assert!(table.get(ValueId(1)).is_ok());
    }

    #[test]
    fn test_get_as_checks_shape() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);
        let mut table = ValueTable::new();

        table.create(&mut ast, ValueId(0), "Int");
        let obj = table.create_object(&mut ast, ValueId(1), "Array");

        assert_eq!(table.get_as(ValueId(1), NodeKind::ObjectLiteral), Ok(obj));
        assert_eq!(
            table.get_as(ValueId(0), NodeKind::ObjectLiteral),
            Err(TranslateError::UnexpectedSymbolKind {
                value: ValueId(0),
                expected: NodeKind::ObjectLiteral,
                found: NodeKind::Var,
            })
        );
    }
}

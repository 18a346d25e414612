// This module holds the per-instruction translation rules. Every instruction kind is
// classified into exactly one Rule by an exhaustive match, so a kind added to InstKind is a
// compile error here until it is classified. Most kinds collapse into a handful of rule
// templates: allocations bind a fresh symbol, rebinds produce a two-child Assign(source,
// destination), scope terminators drop a binding, reference counting and debug bookkeeping
// are no-ops. Indexed addressing builds an ObjectRef over an object literal base and a
// variable index, assign_by_wrapper builds the initOrSet conditional over two synthesized
// calls, and mark_function_escape fans one assignment per operand into the enclosing block.
// Kinds without a rule yet produce the empty placeholder. A rule never yields an absent
// node; fatal lookups surface as TranslateError.

//! Instruction dispatcher.

use super::{Translator, UNKNOWN_TYPE};
use crate::cast::{AstFactory, NodeKind, DO_CALL, INIT_OR_SET};
use crate::core::{TranslateError, TranslateResult};
use crate::sil::{InstKind, Instruction, ValueId};

/// Shape of the symbol an allocation binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolShape {
    Var,
    Object,
}

/// Translation template of an instruction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Bind the result to a new symbol; yields the placeholder.
    Allocate(SymbolShape),
    /// Bind the result to a new symbol, then `Assign(op0, result)`.
    RebindResult,
    /// As [`Rule::RebindResult`], then drop the binding of operand 1.
    RebindResultReleasing,
    /// `Assign(op0, op1)` into an existing binding.
    RebindOperand,
    /// Drop the binding of operand 0.
    EndScope,
    NoOp,
    /// `Assign(result, ObjectRef(op0, op1))`.
    IndexAddr,
    AssignByWrapper,
    /// One `Assign(op, result)` per operand, appended to the block.
    FunctionEscape,
    Unimplemented,
}

impl Rule {
    pub const fn of(kind: InstKind) -> Rule {
        use InstKind::*;
        match kind {
            AllocStack | AllocBox => Rule::Allocate(SymbolShape::Var),
            AllocRef | AllocRefDynamic => Rule::Allocate(SymbolShape::Object),

            AllocValueBuffer | ProjectBox | ProjectValueBuffer | Load | LoadBorrow | LoadWeak
            | LoadUnowned | MarkUninitialized | IndexRawPointer | BeginAccess | MarkDependence
            | IsUnique | IsEscapingClosure | CopyBlock => Rule::RebindResult,
            CopyBlockWithoutEscaping => Rule::RebindResultReleasing,

            Store | Assign | CopyAddr | StoreWeak | StoreUnowned | BeginUnpairedAccess => {
                Rule::RebindOperand
            }

            DeallocStack | DeallocBox | DeallocRef | DeallocPartialRef | DeallocValueBuffer
            | EndBorrow | EndAccess | EndUnpairedAccess | EndLifetime | DestroyAddr => {
                Rule::EndScope
            }

            StrongRetain | StrongRelease | SetDeallocating | StrongRetainUnowned | UnownedRetain
            | UnownedRelease | FixLifetime | RetainValue | RetainValueAddr | ReleaseValue
            | ReleaseValueAddr | AutoreleaseValue | UnmanagedRetainValue
            | UnmanagedReleaseValue | UnmanagedAutoreleaseValue => Rule::NoOp,
            DebugValue | DebugValueAddr | BindMemory | AllocGlobal => Rule::NoOp,

            IndexAddr | TailAddr => Rule::IndexAddr,
            InstKind::AssignByWrapper => Rule::AssignByWrapper,
            MarkFunctionEscape => Rule::FunctionEscape,

            // Allocation and memory kinds without a rule
            AllocExistentialBox | DeallocExistentialBox | ProjectExistentialBox | BeginBorrow
            | StoreBorrow | CopyUnownedValue | StrongCopyUnownedValue => Rule::Unimplemented,

            // Literals
            FunctionRef | DynamicFunctionRef | PreviousDynamicFunctionRef | GlobalAddr
            | GlobalValue | IntegerLiteral | FloatLiteral | StringLiteral => Rule::Unimplemented,

            // Dynamic dispatch
            ClassMethod | ObjCMethod | SuperMethod | ObjCSuperMethod | WitnessMethod => {
                Rule::Unimplemented
            }

            // Function application
            Apply | BeginApply | EndApply | AbortApply | PartialApply | Builtin => {
                Rule::Unimplemented
            }

            // Metatypes
            Metatype | ValueMetatype | ExistentialMetatype | ObjCProtocol => Rule::Unimplemented,

            // Aggregates
            CopyValue | DestroyValue | Tuple | TupleExtract | TupleElementAddr
            | DestructureTuple | Struct | StructExtract | StructElementAddr
            | DestructureStruct | Object | RefElementAddr | RefTailAddr => Rule::Unimplemented,

            // Enums
            Enum | UncheckedEnumData | InitEnumDataAddr | InjectEnumAddr
            | UncheckedTakeEnumDataAddr | SelectEnum | SelectEnumAddr => Rule::Unimplemented,

            // Existentials
            InitExistentialAddr | DeinitExistentialAddr | InitExistentialValue
            | DeinitExistentialValue | OpenExistentialAddr | OpenExistentialValue
            | InitExistentialMetatype | OpenExistentialMetatype | InitExistentialRef
            | OpenExistentialRef | OpenExistentialBox | OpenExistentialBoxValue => {
                Rule::Unimplemented
            }

            // Block storage
            ProjectBlockStorage | InitBlockStorageHeader => Rule::Unimplemented,

            // Conversions
            Upcast | AddressToPointer | PointerToAddress | UncheckedRefCast
            | UncheckedRefCastAddr | UncheckedAddrCast | UncheckedTrivialBitCast
            | UncheckedBitwiseCast | UncheckedOwnershipConversion | RefToRawPointer
            | RawPointerToRef | RefToUnowned | UnownedToRef | RefToUnmanaged | UnmanagedToRef
            | ConvertFunction | ConvertEscapeToNoEscape | ThinFunctionToPointer
            | PointerToThinFunction | ThinToThickFunction | ThickToObjCMetatype
            | ObjCToThickMetatype | ObjCMetatypeToObject | ObjCExistentialMetatypeToObject
            | RefToBridgeObject | BridgeObjectToRef | BridgeObjectToWord
            | ClassifyBridgeObject | ValueToBridgeObject => Rule::Unimplemented,
            UnconditionalCheckedCast | UnconditionalCheckedCastAddr
            | UnconditionalCheckedCastValue => Rule::Unimplemented,

            // Runtime failures and miscellaneous
            CondFail | KeyPath | SelectValue => Rule::Unimplemented,

            // Terminators
            Unreachable | Return | Throw | Yield | Unwind | Br | CondBr | SwitchValue
            | SwitchEnum | SwitchEnumAddr | DynamicMethodBr | CheckedCastBr
            | CheckedCastValueBr | CheckedCastAddrBr | TryApply => Rule::Unimplemented,
        }
    }
}

/// Nodes produced for one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lowered<N> {
    /// Nodes appended to the block before `node`, regardless of the
    /// empty-node policy.
    pub fan_in: Vec<N>,
    pub node: N,
}

impl<N> Lowered<N> {
    pub fn single(node: N) -> Self {
        Self {
            fan_in: Vec::new(),
            node,
        }
    }
}

fn operand(inst: &Instruction, index: usize) -> TranslateResult<ValueId> {
    inst.operands
        .get(index)
        .copied()
        .ok_or(TranslateError::MissingOperand {
            inst: inst.kind,
            index,
        })
}

fn result(inst: &Instruction) -> TranslateResult<ValueId> {
    inst.results
        .first()
        .copied()
        .ok_or(TranslateError::MissingResult { inst: inst.kind })
}

fn result_type(inst: &Instruction) -> &str {
    inst.result_type.as_deref().unwrap_or(UNKNOWN_TYPE)
}

impl<'a, 'arena, F: AstFactory> Translator<'a, 'arena, F> {
    /// Translate one instruction.
    pub fn dispatch(&mut self, inst: &Instruction) -> TranslateResult<Lowered<F::Node>> {
        match Rule::of(inst.kind) {
            Rule::Allocate(shape) => {
                let ty = result_type(inst);
                log::trace!("\t [ALLOC TYPE]: {}", ty);
                self.bind(result(inst)?, ty, shape);
                Ok(Lowered::single(self.factory.make_empty()))
            }

            Rule::RebindResult => self.rebind_result(inst).map(Lowered::single),

            Rule::RebindResultReleasing => {
                let node = self.rebind_result(inst)?;
                self.release(operand(inst, 1)?);
                Ok(Lowered::single(node))
            }

            Rule::RebindOperand => {
                let src = self.table.get(operand(inst, 0)?)?;
                let dest = self.table.get(operand(inst, 1)?)?;
                Ok(Lowered::single(self.assign(src, dest)))
            }

            Rule::EndScope => {
                self.release(operand(inst, 0)?);
                Ok(Lowered::single(self.factory.make_empty()))
            }

            Rule::NoOp => Ok(Lowered::single(self.factory.make_empty())),

            Rule::IndexAddr => {
                let base = self.table.get_as(operand(inst, 0)?, NodeKind::ObjectLiteral)?;
                let index = self.table.get_as(operand(inst, 1)?, NodeKind::Var)?;
                let object_ref = self.factory.make_node(NodeKind::ObjectRef, &[base, index]);
                let dest = self.bind(result(inst)?, result_type(inst), SymbolShape::Var);
                Ok(Lowered::single(self.assign(dest, object_ref)))
            }

            Rule::AssignByWrapper => self.assign_by_wrapper(inst).map(Lowered::single),

            Rule::FunctionEscape => {
                let dest = self.bind(result(inst)?, result_type(inst), SymbolShape::Var);
                let mut fan_in = Vec::with_capacity(inst.operands.len());
                for &op in &inst.operands {
                    let src = self.table.get(op)?;
                    fan_in.push(self.assign(src, dest));
                }
                Ok(Lowered {
                    fan_in,
                    node: self.factory.make_empty(),
                })
            }

            Rule::Unimplemented => {
                log::debug!("no translation rule for {}", inst.kind);
                self.session.record_unimplemented();
                Ok(Lowered::single(self.factory.make_empty()))
            }
        }
    }

    fn bind(&mut self, value: ValueId, ty: &str, shape: SymbolShape) -> F::Node {
        self.session.record_binding_created();
        match shape {
            SymbolShape::Var => self.table.create(&mut *self.factory, value, ty),
            SymbolShape::Object => self.table.create_object(&mut *self.factory, value, ty),
        }
    }

    fn release(&mut self, value: ValueId) {
        if self.table.try_remove(value) {
            self.session.record_binding_removed();
        }
    }

    fn assign(&mut self, src: F::Node, dest: F::Node) -> F::Node {
        log::trace!("\t Assignment [SRC]: {:?} [DEST]: {:?}", src, dest);
        self.factory.make_node(NodeKind::Assign, &[src, dest])
    }

    fn rebind_result(&mut self, inst: &Instruction) -> TranslateResult<F::Node> {
        let src = self.table.get(operand(inst, 0)?)?;
        let dest = self.bind(result(inst)?, result_type(inst), SymbolShape::Var);
        Ok(self.assign(src, dest))
    }

    /// `IfStmt("initOrSet", dest = init(param), dest = setter(param))`; the
    /// real condition is not present in the source IR.
    ///
    /// Initializer and setter should name functions, but no rule binds
    /// function symbols until `function_ref` is translated, so their shape is
    /// not checked here.
    fn assign_by_wrapper(&mut self, inst: &Instruction) -> TranslateResult<F::Node> {
        let param = self.table.get(operand(inst, 0)?)?;
        let dest = self.table.get(operand(inst, 1)?)?;
        let init = self.table.get(operand(inst, 2)?)?;
        let setter = self.table.get(operand(inst, 3)?)?;

        let init_target = self.factory.make_constant(DO_CALL);
        let init_call = self
            .factory
            .make_node(NodeKind::Call, &[init, init_target, param]);
        let init_assign = self.assign(dest, init_call);

        let set_target = self.factory.make_constant(DO_CALL);
        let set_call = self
            .factory
            .make_node(NodeKind::Call, &[setter, set_target, param]);
        let set_assign = self.assign(dest, set_call);

        let condition = self.factory.make_constant(INIT_OR_SET);
        Ok(self
            .factory
            .make_node(NodeKind::IfStmt, &[condition, init_assign, set_assign]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_rule() {
        let mut implemented = 0;
        for &kind in InstKind::ALL {
            if Rule::of(kind) != Rule::Unimplemented {
                implemented += 1;
            }
        }
        assert!(implemented > 50);
    }

    #[test]
    fn rebind_kinds_share_a_template() {
        for kind in [
            InstKind::Load,
            InstKind::LoadBorrow,
            InstKind::BeginAccess,
            InstKind::MarkDependence,
        ] {
            assert_eq!(Rule::of(kind), Rule::RebindResult, "{kind}");
        }
        for kind in [InstKind::Store, InstKind::CopyAddr, InstKind::StoreWeak] {
            assert_eq!(Rule::of(kind), Rule::RebindOperand, "{kind}");
        }
        assert_eq!(Rule::of(InstKind::TailAddr), Rule::IndexAddr);
        assert_eq!(Rule::of(InstKind::CondBr), Rule::Unimplemented);
        assert_eq!(Rule::of(InstKind::StrongRelease), Rule::NoOp);
        assert_eq!(
            Rule::of(InstKind::AllocRef),
            Rule::Allocate(SymbolShape::Object)
        );
    }
}

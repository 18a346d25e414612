//! The closed set of SIL instruction kinds.
//!
//! Every kind carries its textual opcode. Translation rules are chosen by an
//! exhaustive `match` in the translator, so a kind added here does not compile
//! until it is classified there.

use std::fmt;

macro_rules! inst_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Kind tag of a SIL instruction.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum InstKind {
            $($variant,)*
        }

        impl InstKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [InstKind] = &[$(InstKind::$variant,)*];

            /// Textual opcode.
            pub const fn name(self) -> &'static str {
                match self {
                    $(InstKind::$variant => $name,)*
                }
            }

            /// Look up a kind by its textual opcode.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(InstKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

inst_kinds! {
    // Allocation and deallocation
    AllocStack => "alloc_stack",
    AllocRef => "alloc_ref",
    AllocRefDynamic => "alloc_ref_dynamic",
    AllocBox => "alloc_box",
    AllocValueBuffer => "alloc_value_buffer",
    AllocGlobal => "alloc_global",
    AllocExistentialBox => "alloc_existential_box",
    DeallocStack => "dealloc_stack",
    DeallocBox => "dealloc_box",
    DeallocRef => "dealloc_ref",
    DeallocPartialRef => "dealloc_partial_ref",
    DeallocValueBuffer => "dealloc_value_buffer",
    DeallocExistentialBox => "dealloc_existential_box",
    ProjectBox => "project_box",
    ProjectValueBuffer => "project_value_buffer",
    ProjectExistentialBox => "project_existential_box",

    // Debug information
    DebugValue => "debug_value",
    DebugValueAddr => "debug_value_addr",

    // Accessing memory
    Load => "load",
    Store => "store",
    LoadBorrow => "load_borrow",
    BeginBorrow => "begin_borrow",
    EndBorrow => "end_borrow",
    StoreBorrow => "store_borrow",
    Assign => "assign",
    AssignByWrapper => "assign_by_wrapper",
    MarkUninitialized => "mark_uninitialized",
    MarkFunctionEscape => "mark_function_escape",
    CopyAddr => "copy_addr",
    DestroyAddr => "destroy_addr",
    IndexAddr => "index_addr",
    TailAddr => "tail_addr",
    IndexRawPointer => "index_raw_pointer",
    BindMemory => "bind_memory",
    BeginAccess => "begin_access",
    EndAccess => "end_access",
    BeginUnpairedAccess => "begin_unpaired_access",
    EndUnpairedAccess => "end_unpaired_access",

    // Reference counting
    StrongRetain => "strong_retain",
    StrongRelease => "strong_release",
    SetDeallocating => "set_deallocating",
    StrongRetainUnowned => "strong_retain_unowned",
    UnownedRetain => "unowned_retain",
    UnownedRelease => "unowned_release",
    LoadWeak => "load_weak",
    StoreWeak => "store_weak",
    LoadUnowned => "load_unowned",
    StoreUnowned => "store_unowned",
    FixLifetime => "fix_lifetime",
    EndLifetime => "end_lifetime",
    MarkDependence => "mark_dependence",
    IsUnique => "is_unique",
    IsEscapingClosure => "is_escaping_closure",
    CopyBlock => "copy_block",
    CopyBlockWithoutEscaping => "copy_block_without_escaping",
    RetainValue => "retain_value",
    RetainValueAddr => "retain_value_addr",
    ReleaseValue => "release_value",
    ReleaseValueAddr => "release_value_addr",
    AutoreleaseValue => "autorelease_value",
    UnmanagedRetainValue => "unmanaged_retain_value",
    UnmanagedReleaseValue => "unmanaged_release_value",
    UnmanagedAutoreleaseValue => "unmanaged_autorelease_value",
    CopyUnownedValue => "copy_unowned_value",
    StrongCopyUnownedValue => "strong_copy_unowned_value",

    // Literals
    FunctionRef => "function_ref",
    DynamicFunctionRef => "dynamic_function_ref",
    PreviousDynamicFunctionRef => "prev_dynamic_function_ref",
    GlobalAddr => "global_addr",
    GlobalValue => "global_value",
    IntegerLiteral => "integer_literal",
    FloatLiteral => "float_literal",
    StringLiteral => "string_literal",

    // Dynamic dispatch
    ClassMethod => "class_method",
    ObjCMethod => "objc_method",
    SuperMethod => "super_method",
    ObjCSuperMethod => "objc_super_method",
    WitnessMethod => "witness_method",

    // Function application
    Apply => "apply",
    BeginApply => "begin_apply",
    EndApply => "end_apply",
    AbortApply => "abort_apply",
    PartialApply => "partial_apply",
    Builtin => "builtin",

    // Metatypes
    Metatype => "metatype",
    ValueMetatype => "value_metatype",
    ExistentialMetatype => "existential_metatype",
    ObjCProtocol => "objc_protocol",

    // Aggregate types
    CopyValue => "copy_value",
    DestroyValue => "destroy_value",
    Tuple => "tuple",
    TupleExtract => "tuple_extract",
    TupleElementAddr => "tuple_element_addr",
    DestructureTuple => "destructure_tuple",
    Struct => "struct",
    StructExtract => "struct_extract",
    StructElementAddr => "struct_element_addr",
    DestructureStruct => "destructure_struct",
    Object => "object",
    RefElementAddr => "ref_element_addr",
    RefTailAddr => "ref_tail_addr",

    // Enums
    Enum => "enum",
    UncheckedEnumData => "unchecked_enum_data",
    InitEnumDataAddr => "init_enum_data_addr",
    InjectEnumAddr => "inject_enum_addr",
    UncheckedTakeEnumDataAddr => "unchecked_take_enum_data_addr",
    SelectEnum => "select_enum",
    SelectEnumAddr => "select_enum_addr",

    // Protocol and protocol composition types
    InitExistentialAddr => "init_existential_addr",
    DeinitExistentialAddr => "deinit_existential_addr",
    InitExistentialValue => "init_existential_value",
    DeinitExistentialValue => "deinit_existential_value",
    OpenExistentialAddr => "open_existential_addr",
    OpenExistentialValue => "open_existential_value",
    InitExistentialMetatype => "init_existential_metatype",
    OpenExistentialMetatype => "open_existential_metatype",
    InitExistentialRef => "init_existential_ref",
    OpenExistentialRef => "open_existential_ref",
    OpenExistentialBox => "open_existential_box",
    OpenExistentialBoxValue => "open_existential_box_value",

    // Blocks
    ProjectBlockStorage => "project_block_storage",
    InitBlockStorageHeader => "init_block_storage_header",

    // Unchecked conversions
    Upcast => "upcast",
    AddressToPointer => "address_to_pointer",
    PointerToAddress => "pointer_to_address",
    UncheckedRefCast => "unchecked_ref_cast",
    UncheckedRefCastAddr => "unchecked_ref_cast_addr",
    UncheckedAddrCast => "unchecked_addr_cast",
    UncheckedTrivialBitCast => "unchecked_trivial_bit_cast",
    UncheckedBitwiseCast => "unchecked_bitwise_cast",
    UncheckedOwnershipConversion => "unchecked_ownership_conversion",
    RefToRawPointer => "ref_to_raw_pointer",
    RawPointerToRef => "raw_pointer_to_ref",
    RefToUnowned => "ref_to_unowned",
    UnownedToRef => "unowned_to_ref",
    RefToUnmanaged => "ref_to_unmanaged",
    UnmanagedToRef => "unmanaged_to_ref",
    ConvertFunction => "convert_function",
    ConvertEscapeToNoEscape => "convert_escape_to_noescape",
    ThinFunctionToPointer => "thin_function_to_pointer",
    PointerToThinFunction => "pointer_to_thin_function",
    ThinToThickFunction => "thin_to_thick_function",
    ThickToObjCMetatype => "thick_to_objc_metatype",
    ObjCToThickMetatype => "objc_to_thick_metatype",
    ObjCMetatypeToObject => "objc_metatype_to_object",
    ObjCExistentialMetatypeToObject => "objc_existential_metatype_to_object",
    RefToBridgeObject => "ref_to_bridge_object",
    BridgeObjectToRef => "bridge_object_to_ref",
    BridgeObjectToWord => "bridge_object_to_word",
    ClassifyBridgeObject => "classify_bridge_object",
    ValueToBridgeObject => "value_to_bridge_object",

    // Checked conversions
    UnconditionalCheckedCast => "unconditional_checked_cast",
    UnconditionalCheckedCastAddr => "unconditional_checked_cast_addr",
    UnconditionalCheckedCastValue => "unconditional_checked_cast_value",

    // Runtime failures
    CondFail => "cond_fail",

    // Miscellaneous
    KeyPath => "keypath",
    SelectValue => "select_value",

    // Terminators
    Unreachable => "unreachable",
    Return => "return",
    Throw => "throw",
    Yield => "yield",
    Unwind => "unwind",
    Br => "br",
    CondBr => "cond_br",
    SwitchValue => "switch_value",
    SwitchEnum => "switch_enum",
    SwitchEnumAddr => "switch_enum_addr",
    DynamicMethodBr => "dynamic_method_br",
    CheckedCastBr => "checked_cast_br",
    CheckedCastValueBr => "checked_cast_value_br",
    CheckedCastAddrBr => "checked_cast_addr_br",
    TryApply => "try_apply",
}

impl InstKind {
    /// Whether the instruction ends a basic block.
    pub const fn is_terminator(self) -> bool {
        use InstKind::*;
        matches!(
            self,
            Unreachable
                | Return
                | Throw
                | Yield
                | Unwind
                | Br
                | CondBr
                | SwitchValue
                | SwitchEnum
                | SwitchEnumAddr
                | DynamicMethodBr
                | CheckedCastBr
                | CheckedCastValueBr
                | CheckedCastAddrBr
                | TryApply
        )
    }

    /// Whether the translated node calls another function.
    pub const fn is_call_site(self) -> bool {
        use InstKind::*;
        matches!(
            self,
            Apply | BeginApply | TryApply | PartialApply | Builtin | AssignByWrapper
        )
    }

    /// Whether the translated node affects intra-function control flow.
    pub const fn is_control_flow(self) -> bool {
        self.is_terminator() || matches!(self, InstKind::AssignByWrapper)
    }
}

impl fmt::Display for InstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn opcode_names_round_trip_and_are_unique() {
        let mut seen = HashSet::new();
        for &kind in InstKind::ALL {
            assert!(seen.insert(kind.name()), "duplicate opcode {}", kind.name());
            assert_eq!(InstKind::from_name(kind.name()), Some(kind));
        }
        assert!(InstKind::ALL.len() >= 150);
        assert_eq!(InstKind::from_name("not_an_opcode"), None);
    }

    #[test]
    fn classification() {
        assert!(InstKind::CondBr.is_terminator());
        assert!(InstKind::CondBr.is_control_flow());
        assert!(!InstKind::CondBr.is_call_site());

        assert!(InstKind::TryApply.is_call_site());
        assert!(InstKind::TryApply.is_control_flow());

        assert!(InstKind::Apply.is_call_site());
        assert!(!InstKind::Apply.is_control_flow());

        assert!(InstKind::AssignByWrapper.is_call_site());
        assert!(InstKind::AssignByWrapper.is_control_flow());

        assert!(!InstKind::Store.is_terminator());
    }
}

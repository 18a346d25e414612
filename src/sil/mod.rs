//! Source IR consumed by the translator.
//!
//! A SIL module is an ordered list of functions, each an ordered list of
//! basic blocks holding an ordered list of instructions. Values are named by
//! [`ValueId`] handles issued once per distinct value by whoever builds the
//! module (normally [`parse_module`]), so nothing downstream depends on
//! memory addresses.
//!
//! # Text Format
//!
//! ```text
//! ; Comments start with semicolon
//! source "main.swift"
//! sil @main "main" (%argc : $Int32 "argc") -> $Int32 @ 1:1-9:1 {
//! bb0:
//!   %x = alloc_stack : $Int @ 2:3
//!   store %argc, %x [mem: may_write, rel: does_not_release]
//!   dealloc_stack %x
//!   return %argc
//! }
//! ```

use std::fmt;

pub mod kinds;
pub mod parser;

pub use kinds::InstKind;
pub use parser::{parse_module, ParseError};

/// Stable identity of one source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl ValueId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Source range attached to a function or instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceLoc {
    /// No location was recorded.
    #[default]
    Unknown,
    /// A location exists but does not describe a valid range.
    Invalid,
    Range {
        file: Option<String>,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    },
}

impl SourceLoc {
    pub fn is_valid(&self) -> bool {
        matches!(self, SourceLoc::Range { .. })
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            SourceLoc::Range { file, .. } => file.as_deref(),
            _ => None,
        }
    }

    /// `(start_line, start_col, end_line, end_col)` as signed coordinates.
    ///
    /// `None` unless the location is a range whose every coordinate fits in
    /// an `i32`.
    pub fn coords(&self) -> Option<(i32, i32, i32, i32)> {
        match *self {
            SourceLoc::Range {
                start_line,
                start_col,
                end_line,
                end_col,
                ..
            } => Some((
                i32::try_from(start_line).ok()?,
                i32::try_from(start_col).ok()?,
                i32::try_from(end_line).ok()?,
                i32::try_from(end_col).ok()?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLoc::Unknown => f.write_str("<unknown>"),
            SourceLoc::Invalid => f.write_str("invalid"),
            SourceLoc::Range {
                file,
                start_line,
                start_col,
                end_line,
                end_col,
            } => {
                if let Some(file) = file {
                    write!(f, "{file}:")?;
                }
                write!(f, "{start_line}:{start_col}-{end_line}:{end_col}")
            }
        }
    }
}

/// Memory effect of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryBehavior {
    #[default]
    None,
    MayRead,
    MayWrite,
    MayReadWrite,
    MayHaveSideEffects,
}

impl MemoryBehavior {
    pub const fn name(self) -> &'static str {
        match self {
            MemoryBehavior::None => "none",
            MemoryBehavior::MayRead => "may_read",
            MemoryBehavior::MayWrite => "may_write",
            MemoryBehavior::MayReadWrite => "may_read_write",
            MemoryBehavior::MayHaveSideEffects => "may_have_side_effects",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "none" => MemoryBehavior::None,
            "may_read" => MemoryBehavior::MayRead,
            "may_write" => MemoryBehavior::MayWrite,
            "may_read_write" => MemoryBehavior::MayReadWrite,
            "may_have_side_effects" => MemoryBehavior::MayHaveSideEffects,
            _ => return None,
        })
    }
}

/// Whether an instruction may release a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleasingBehavior {
    #[default]
    DoesNotRelease,
    MayRelease,
}

impl ReleasingBehavior {
    pub const fn name(self) -> &'static str {
        match self {
            ReleasingBehavior::DoesNotRelease => "does_not_release",
            ReleasingBehavior::MayRelease => "may_release",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "does_not_release" => Some(ReleasingBehavior::DoesNotRelease),
            "may_release" => Some(ReleasingBehavior::MayRelease),
            _ => None,
        }
    }
}

/// Function or block argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub value: ValueId,
    /// Declared source name; unnamed arguments are never bound.
    pub name: Option<String>,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstKind,
    pub operands: Vec<ValueId>,
    pub results: Vec<ValueId>,
    /// Declared type of the first result.
    pub result_type: Option<String>,
    /// Branch targets, by block label.
    pub successors: Vec<String>,
    /// Non-value operands (symbol references, literals) kept verbatim.
    pub attributes: Vec<String>,
    pub location: SourceLoc,
    pub memory: MemoryBehavior,
    pub releasing: ReleasingBehavior,
}

impl Instruction {
    /// Instruction with no operands, results or metadata.
    pub fn new(kind: InstKind) -> Self {
        Self {
            kind,
            operands: Vec::new(),
            results: Vec::new(),
            result_type: None,
            successors: Vec::new(),
            attributes: Vec::new(),
            location: SourceLoc::Unknown,
            memory: MemoryBehavior::None,
            releasing: ReleasingBehavior::DoesNotRelease,
        }
    }

    pub fn with_operands(mut self, operands: impl IntoIterator<Item = ValueId>) -> Self {
        self.operands = operands.into_iter().collect();
        self
    }

    pub fn with_result(mut self, result: ValueId, ty: impl Into<String>) -> Self {
        self.results = vec![result];
        self.result_type = Some(ty.into());
        self
    }

    pub fn with_location(mut self, location: SourceLoc) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.results.as_slice() {
            [] => {}
            [single] => write!(f, "%{} = ", single.0)?,
            many => {
                let names: Vec<_> = many.iter().map(|r| format!("%{}", r.0)).collect();
                write!(f, "({}) = ", names.join(", "))?;
            }
        }
        f.write_str(self.kind.name())?;

        let mut first = true;
        let operands = self
            .operands
            .iter()
            .map(|op| format!("%{}", op.0))
            .chain(self.attributes.iter().cloned())
            .chain(self.successors.iter().cloned());
        for operand in operands {
            f.write_str(if first { " " } else { ", " })?;
            f.write_str(&operand)?;
            first = false;
        }

        if let Some(ty) = &self.result_type {
            write!(f, " : ${ty}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilBlock {
    pub label: String,
    pub arguments: Vec<Argument>,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilFunction {
    /// Mangled source symbol.
    pub symbol: String,
    pub demangled: Option<String>,
    pub arguments: Vec<Argument>,
    /// Declared result types.
    pub results: Vec<String>,
    pub location: SourceLoc,
    pub blocks: Vec<SilBlock>,
}

impl SilFunction {
    /// Human readable name, falling back to the symbol.
    pub fn display_name(&self) -> &str {
        self.demangled.as_deref().unwrap_or(&self.symbol)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.instructions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instruction_count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SilModule {
    pub source_file: Option<String>,
    pub functions: Vec<SilFunction>,
    /// Number of value identities issued; every `ValueId` is below this.
    pub value_count: u32,
}

impl SilModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&self, symbol: &str) -> Option<&SilFunction> {
        self.functions.iter().find(|f| f.symbol == symbol)
    }

    /// Issue a fresh value identity.
    pub fn next_value(&mut self) -> ValueId {
        let id = ValueId(self.value_count);
        self.value_count += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_symbol() {
        let mut function = SilFunction {
            symbol: "$s4main3fooyyF".to_string(),
            demangled: None,
            arguments: Vec::new(),
            results: Vec::new(),
            location: SourceLoc::Unknown,
            blocks: Vec::new(),
        };
        assert_eq!(function.display_name(), "$s4main3fooyyF");
        assert!(function.is_empty());

        function.demangled = Some("main.foo() -> ()".to_string());
        assert_eq!(function.display_name(), "main.foo() -> ()");
    }

    #[test]
    fn instruction_display() {
        let inst = Instruction::new(InstKind::Load)
            .with_operands([ValueId(1)])
            .with_result(ValueId(2), "Int");
        assert_eq!(inst.to_string(), "%2 = load %1 : $Int");
    }

    #[test]
    fn coords_reject_out_of_range_lines() {
        let range = |start_line| SourceLoc::Range {
            file: None,
            start_line,
            start_col: 1,
            end_line: 2,
            end_col: 3,
        };
        assert_eq!(range(7).coords(), Some((7, 1, 2, 3)));
        assert_eq!(range(u32::MAX).coords(), None);
        assert_eq!(SourceLoc::Invalid.coords(), None);
    }

    #[test]
    fn behavior_names_round_trip() {
        for m in [
            MemoryBehavior::None,
            MemoryBehavior::MayRead,
            MemoryBehavior::MayWrite,
            MemoryBehavior::MayReadWrite,
            MemoryBehavior::MayHaveSideEffects,
        ] {
            assert_eq!(MemoryBehavior::from_name(m.name()), Some(m));
        }
        assert_eq!(
            ReleasingBehavior::from_name("may_release"),
            Some(ReleasingBehavior::MayRelease)
        );
    }
}

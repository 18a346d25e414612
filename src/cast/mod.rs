// This module defines the target side of the translation: a small common AST (CAst) made
// of kinded nodes with ordered children and string constants at the leaves. The translator
// only talks to the AST through the AstFactory trait, which plays the role the node factory
// of the downstream analysis framework plays for the reference front end: make a constant,
// make a node of a given kind over a child list, make a source position. The associated
// Node handle is a plain copyable identity, so side tables (source positions, instruction
// kinds) can be keyed by it without relying on pointer equality. The default arena-backed
// implementation lives in `arena`.

//! Target AST construction.

use std::fmt;
use std::fmt::Write as _;
use std::hash::Hash;

pub mod arena;

pub use arena::{CAst, NodeId};

/// Constant carried by the condition of wrapped-property assignments.
pub const INIT_OR_SET: &str = "initOrSet";

/// Constant passed as the target of synthesized calls.
pub const DO_CALL: &str = "do";

/// Kind tag of a target AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Placeholder without semantic content.
    Empty,
    /// Leaf carrying a string constant.
    Constant,
    /// Variable symbol: `Var(name)`.
    Var,
    /// Declaration: `DeclStmt(name, type)`.
    DeclStmt,
    /// Assignment: two children.
    Assign,
    /// Indexed access: `ObjectRef(base, index)`.
    ObjectRef,
    /// Object literal symbol: `ObjectLiteral(name)`.
    ObjectLiteral,
    /// Call: `Call(callee, target, args...)`.
    Call,
    /// Two-branch conditional: `IfStmt(cond, then, else)`.
    IfStmt,
    LabelStmt,
    /// Labeled compound statement for one basic block.
    BlockStmt,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Empty => "Empty",
            NodeKind::Constant => "Constant",
            NodeKind::Var => "Var",
            NodeKind::DeclStmt => "DeclStmt",
            NodeKind::Assign => "Assign",
            NodeKind::ObjectRef => "ObjectRef",
            NodeKind::ObjectLiteral => "ObjectLiteral",
            NodeKind::Call => "Call",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::LabelStmt => "LabelStmt",
            NodeKind::BlockStmt => "BlockStmt",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source range attached to produced nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub start_line: i32,
    pub start_col: i32,
    pub end_line: i32,
    pub end_col: i32,
}

impl Position {
    /// Sentinel for nodes without a known source range.
    pub const UNKNOWN: Position = Position {
        start_line: -1,
        start_col: -1,
        end_line: -1,
        end_col: -1,
    };

    pub const fn new(start_line: i32, start_col: i32, end_line: i32, end_col: i32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}]->[{}:{}]",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// Node construction interface used by the translator.
pub trait AstFactory {
    /// Node handle.
    type Node: Copy + Eq + Hash + fmt::Debug;

    fn make_constant(&mut self, value: &str) -> Self::Node;

    /// Make a node over an ordered child list.
    fn make_node(&mut self, kind: NodeKind, children: &[Self::Node]) -> Self::Node;

    fn make_location(&self, start_line: i32, start_col: i32, end_line: i32, end_col: i32) -> Position {
        Position::new(start_line, start_col, end_line, end_col)
    }

    fn kind(&self, node: Self::Node) -> NodeKind;

    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// String value of a constant node.
    fn constant(&self, node: Self::Node) -> Option<&str>;

    /// Shorthand for an empty placeholder.
    fn make_empty(&mut self) -> Self::Node {
        self.make_node(NodeKind::Empty, &[])
    }

    /// Render a subtree as an indented S-expression.
    fn dump(&self, node: Self::Node) -> String {
        let mut out = String::new();
        dump_into(self, node, 0, &mut out);
        out
    }
}

fn dump_into<F: AstFactory + ?Sized>(factory: &F, node: F::Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if let Some(value) = factory.constant(node) {
        let _ = write!(out, "{indent}{value:?}");
        return;
    }

    let kind = factory.kind(node);
    let children = factory.children(node);
    let flat = children
        .iter()
        .all(|&child| factory.kind(child) == NodeKind::Constant);

    if flat {
        let _ = write!(out, "{indent}({kind}");
        for &child in children {
            let _ = write!(out, " {:?}", factory.constant(child).unwrap_or_default());
        }
        out.push(')');
        return;
    }

    let _ = write!(out, "{indent}({kind}");
    for &child in children {
        out.push('\n');
        dump_into(factory, child, depth + 1, out);
    }
    out.push(')');
}

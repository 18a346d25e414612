//! Arena-backed CAst.
//!
//! Nodes are stored in a flat table indexed by [`NodeId`]; child lists and
//! constant strings are allocated in the session arena.

use super::{AstFactory, NodeKind};
use crate::core::TranslationSession;
use std::fmt;

/// Handle to a node of a [`CAst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeData<'arena> {
    kind: NodeKind,
    value: Option<&'arena str>,
    children: &'arena [NodeId],
}

/// Node table for one translation session.
pub struct CAst<'arena> {
    session: &'arena TranslationSession<'arena>,
    nodes: Vec<NodeData<'arena>>,
}

impl<'arena> CAst<'arena> {
    pub fn new(session: &'arena TranslationSession<'arena>) -> Self {
        Self {
            session,
            nodes: Vec::new(),
        }
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, data: NodeData<'arena>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn data(&self, node: NodeId) -> &NodeData<'arena> {
        // Handles are only issued by `push`, so the index is in range for
        // nodes of this table.
        &self.nodes[node.index()]
    }
}

impl<'arena> AstFactory for CAst<'arena> {
    type Node = NodeId;

    fn make_constant(&mut self, value: &str) -> NodeId {
        let value = self.session.intern_str(value);
        self.push(NodeData {
            kind: NodeKind::Constant,
            value: Some(value),
            children: &[],
        })
    }

    fn make_node(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let children = self.session.arena().alloc_slice_copy(children);
        self.push(NodeData {
            kind,
            value: None,
            children,
        })
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.data(node).kind
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).children
    }

    fn constant(&self, node: NodeId) -> Option<&str> {
        self.data(node).value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::Position;
    use bumpalo::Bump;

    #[test]
    fn test_node_construction() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);

        let name = ast.make_constant("v0");
        let var = ast.make_node(NodeKind::Var, &[name]);
        let other = ast.make_constant("v0");

        assert_ne!(name, other);
        assert_eq!(ast.constant(name), Some("v0"));
        assert_eq!(ast.kind(var), NodeKind::Var);
        assert_eq!(ast.children(var), &[name]);
        assert_eq!(ast.constant(var), None);
        assert_eq!(ast.len(), 3);
    }

    #[test]
    fn test_dump() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let mut ast = CAst::new(&session);

        let src = ast.make_constant("v0");
        let src = ast.make_node(NodeKind::Var, &[src]);
        let dst = ast.make_constant("v1");
        let dst = ast.make_node(NodeKind::Var, &[dst]);
        let assign = ast.make_node(NodeKind::Assign, &[src, dst]);
        let empty = ast.make_empty();

        assert_eq!(ast.dump(src), "(Var \"v0\")");
        assert_eq!(ast.dump(empty), "(Empty)");
        assert_eq!(ast.dump(assign), "(Assign\n  (Var \"v0\")\n  (Var \"v1\"))");
    }

    #[test]
    fn test_make_location() {
        let arena = Bump::new();
        let session = TranslationSession::new(&arena);
        let ast = CAst::new(&session);

        let pos = ast.make_location(1, 2, 3, 4);
        assert_eq!(pos, Position::new(1, 2, 3, 4));
        assert!(!pos.is_unknown());
        assert!(Position::default().is_unknown());
    }
}

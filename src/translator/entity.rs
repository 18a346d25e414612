//! Per-function translation results.
//!
//! An [`Entity`] is filled while its function is translated: blocks,
//! declarations, call sites and control-flow nodes are appended in the order
//! they are produced, so consumers can trust the lists without re-walking the
//! block trees.

use crate::cast::Position;
use crate::core::{SessionStats, SCRIPT_ENTITY_NAME};
use crate::sil::{InstKind, MemoryBehavior, ReleasingBehavior};
use hashbrown::HashMap;
use std::fmt;
use std::hash::Hash;

/// Out-of-band metadata for one produced node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub position: Position,
    pub file: Option<String>,
    /// Kind of the instruction that produced the node; `None` for labels,
    /// blocks and parameter declarations.
    pub instruction: Option<InstKind>,
    /// Index of the instruction within its block.
    pub sequence: usize,
    pub memory: MemoryBehavior,
    pub releasing: ReleasingBehavior,
}

impl NodeInfo {
    /// Metadata for nodes not derived from an instruction.
    pub fn structural(position: Position, file: Option<String>) -> Self {
        Self {
            position,
            file,
            instruction: None,
            sequence: 0,
            memory: MemoryBehavior::None,
            releasing: ReleasingBehavior::DoesNotRelease,
        }
    }
}

/// Node to metadata side table.
#[derive(Debug, Clone)]
pub struct NodeInfoMap<N> {
    entries: HashMap<N, NodeInfo>,
}

impl<N> Default for NodeInfoMap<N> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> NodeInfoMap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: N, info: NodeInfo) {
        self.entries.insert(node, info);
    }

    pub fn get(&self, node: N) -> Option<&NodeInfo> {
        self.entries.get(&node)
    }

    /// Source position of `node`, or the unknown sentinel.
    pub fn position_of(&self, node: N) -> Position {
        self.entries
            .get(&node)
            .map_or(Position::UNKNOWN, |info| info.position)
    }

    pub fn contains(&self, node: N) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named function argument bound at function entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter<N> {
    /// Declared source name.
    pub name: String,
    /// Name of the bound symbol.
    pub symbol: String,
    pub position: Position,
    pub ty: String,
    pub decl: N,
}

/// Return type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Single(String),
    /// Zero or several results; decomposition is left to the consumer.
    MultiResult,
}

impl ReturnType {
    pub fn from_results(results: &[String]) -> Self {
        match results {
            [single] => ReturnType::Single(single.clone()),
            _ => ReturnType::MultiResult,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Single(ty) => f.write_str(ty),
            ReturnType::MultiResult => f.write_str("MultiResultType"),
        }
    }
}

/// One translated function.
#[derive(Debug, Clone)]
pub struct Entity<N> {
    /// Display name; `"main"` for the script entity.
    pub name: String,
    /// Source symbol.
    pub symbol: String,
    pub position: Position,
    pub parameters: Vec<Parameter<N>>,
    pub return_type: ReturnType,
    /// `BlockStmt` nodes in block order.
    pub blocks: Vec<N>,
    /// Declarations of every block, in block then creation order.
    pub decl_nodes: Vec<N>,
    pub call_nodes: Vec<N>,
    pub cf_nodes: Vec<N>,
    pub node_info: NodeInfoMap<N>,
}

impl<N: Copy + Eq + Hash> Entity<N> {
    pub(crate) fn new(name: String, symbol: String) -> Self {
        Self {
            name,
            symbol,
            position: Position::UNKNOWN,
            parameters: Vec::new(),
            return_type: ReturnType::MultiResult,
            blocks: Vec::new(),
            decl_nodes: Vec::new(),
            call_nodes: Vec::new(),
            cf_nodes: Vec::new(),
            node_info: NodeInfoMap::new(),
        }
    }

    /// Whether this is the module's script entity.
    pub fn is_script(&self) -> bool {
        self.name == SCRIPT_ENTITY_NAME
    }

    pub fn position_of(&self, node: N) -> Position {
        self.node_info.position_of(node)
    }
}

impl<N> fmt::Display for Entity<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-*- CAST ENTITY INFO -*-")?;
        writeln!(f, "\tFUNCTION NAME: {}", self.name)?;
        writeln!(f, "\t# OF BASIC BLOCKS: {}", self.blocks.len())?;
        writeln!(f, "\t# OF CALL NODES: {}", self.call_nodes.len())?;
        writeln!(f, "\t# OF CONTROL FLOW NODES: {}", self.cf_nodes.len())
    }
}

/// Result of translating a module.
#[derive(Debug, Clone)]
pub struct TranslatedModule<N> {
    pub source_file: Option<String>,
    /// Entities in function declaration order.
    pub entities: Vec<Entity<N>>,
    pub stats: SessionStats,
}

impl<N> TranslatedModule<N> {
    pub fn entity(&self, name: &str) -> Option<&Entity<N>> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// The entity of the entry function, if it was translated.
    pub fn script(&self) -> Option<&Entity<N>> {
        self.entities.iter().find(|e| e.name == SCRIPT_ENTITY_NAME)
    }
}

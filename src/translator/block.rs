//! Basic block translation.

use super::{Entity, NodeInfo, Translator};
use crate::cast::{AstFactory, NodeKind, Position};
use crate::core::TranslateResult;
use crate::sil::{Instruction, SilBlock, SourceLoc};

impl<'a, 'arena, F: AstFactory> Translator<'a, 'arena, F> {
    /// Translate `block` into a `BlockStmt` and register it in `entity`.
    ///
    /// Children are the label, then declarations of symbols created in this
    /// block in creation order, then the instruction nodes in order.
    pub fn translate_block(
        &mut self,
        entity: &mut Entity<F::Node>,
        block: &SilBlock,
    ) -> TranslateResult<F::Node> {
        log::trace!("Basic Block: {} ({} instructions)", block.label, block.instructions.len());
        self.table.clear_block_state();

        let mut nodes = Vec::with_capacity(block.instructions.len());
        for (sequence, inst) in block.instructions.iter().enumerate() {
            let info = self.instruction_info(inst, sequence);
            self.session.record_instruction(inst.kind.name());

            let pending_before = self.table.pending_declarations().len();
            let lowered = self.dispatch(inst)?;

            for decl in &self.table.pending_declarations()[pending_before..] {
                entity.node_info.insert(decl.decl, info.clone());
            }

            for node in lowered.fan_in {
                entity.node_info.insert(node, info.clone());
                nodes.push(node);
            }

            let node = lowered.node;
            if self.factory.kind(node) == NodeKind::Empty {
                let omitted = !self.config.add_empty_nodes;
                self.session.record_empty_node(omitted);
                if omitted {
                    continue;
                }
            }

            if inst.kind.is_call_site() {
                entity.call_nodes.push(node);
            }
            if inst.kind.is_control_flow() {
                entity.cf_nodes.push(node);
            }
            entity.node_info.insert(node, info);
            nodes.push(node);
        }

        let decls = self.table.take_declarations();
        let label_name = self.factory.make_constant(&block.label);
        let label = self.factory.make_node(NodeKind::LabelStmt, &[label_name]);

        let mut children = Vec::with_capacity(1 + decls.len() + nodes.len());
        children.push(label);
        children.extend(decls.iter().map(|d| d.decl));
        children.extend(nodes);

        let block_stmt = self.factory.make_node(NodeKind::BlockStmt, &children);

        let structural = NodeInfo::structural(entity.position, self.source_file.clone());
        entity.node_info.insert(label, structural.clone());
        entity.node_info.insert(block_stmt, structural);
        entity.decl_nodes.extend(decls.iter().map(|d| d.decl));
        entity.blocks.push(block_stmt);

        Ok(block_stmt)
    }

    fn instruction_info(&self, inst: &Instruction, sequence: usize) -> NodeInfo {
        log::trace!("<< {} >>", inst.kind);
        log::trace!("\t [INSTR] #{}, {}", sequence, inst);
        log::trace!(
            "\t [MEM]: {}, [REL]: {}",
            inst.memory.name(),
            inst.releasing.name()
        );

        let position = match &inst.location {
            SourceLoc::Range { .. } => match inst.location.coords() {
                Some((sl, sc, el, ec)) => {
                    log::trace!("\t [LOC]: {}", inst.location);
                    self.factory.make_location(sl, sc, el, ec)
                }
                None => {
                    log::debug!("\t NOTE: Source range out of bounds: {}", inst.location);
                    Position::UNKNOWN
                }
            },
            SourceLoc::Invalid => {
                log::debug!("\t NOTE: Source information is invalid");
                Position::UNKNOWN
            }
            SourceLoc::Unknown => {
                log::trace!("\t **** No source information.");
                Position::UNKNOWN
            }
        };

        let file = inst
            .location
            .file()
            .map(str::to_string)
            .or_else(|| self.source_file.clone());

        NodeInfo {
            position,
            file,
            instruction: Some(inst.kind),
            sequence,
            memory: inst.memory,
            releasing: inst.releasing,
        }
    }
}

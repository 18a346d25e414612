//! Function translation.

use super::{Entity, NodeInfo, Parameter, ReturnType, Translator};
use crate::cast::{AstFactory, Position};
use crate::core::{Diagnostic, DiagnosticKind, TranslateResult, SCRIPT_ENTITY_NAME};
use crate::sil::{SilFunction, SourceLoc};

impl<'a, 'arena, F: AstFactory> Translator<'a, 'arena, F> {
    /// Translate one function into a finished entity.
    pub fn translate_function(&mut self, function: &SilFunction) -> TranslateResult<Entity<F::Node>> {
        let name = if function.symbol == self.config.entry_symbol {
            SCRIPT_ENTITY_NAME.to_string()
        } else {
            function.display_name().to_string()
        };
        log::debug!("SILFunction: {} ({})", name, function.symbol);
        self.session.set_current_function(&name);

        let mut entity = Entity::new(name, function.symbol.clone());
        let argument_position = self.function_position(function, &mut entity);

        let file = function
            .location
            .file()
            .map(str::to_string)
            .or_else(|| self.source_file.clone());

        for arg in &function.arguments {
            let Some(arg_name) = &arg.name else {
                continue;
            };
            self.session.record_binding_created();
            self.table.create(&mut *self.factory, arg.value, &arg.ty);

            if let Some(binding) = self.table.binding(arg.value) {
                entity.node_info.insert(
                    binding.decl,
                    NodeInfo::structural(argument_position, file.clone()),
                );
                entity.parameters.push(Parameter {
                    name: arg_name.clone(),
                    symbol: binding.name.clone(),
                    position: argument_position,
                    ty: arg.ty.clone(),
                    decl: binding.decl,
                });
            }
        }

        entity.return_type = ReturnType::from_results(&function.results);

        for block in &function.blocks {
            self.translate_block(&mut entity, block)?;
        }

        self.session
            .record_function_translated(&entity.name, entity.blocks.len());
        self.session.clear_function_state();
        Ok(entity)
    }

    /// Set the entity span and return the position used for arguments.
    fn function_position(&mut self, function: &SilFunction, entity: &mut Entity<F::Node>) -> Position {
        if let Some((sl, sc, el, ec)) = function.location.coords() {
            entity.position = self.factory.make_location(sl, sc, el, ec);
            return self.factory.make_location(sl, sc, sl, sc);
        }
        match &function.location {
            // A range that does not fit the signed coordinates is reported as invalid.
            SourceLoc::Range { .. } | SourceLoc::Invalid => {
                self.sink
                    .warn(Diagnostic::new(DiagnosticKind::InvalidSourceInfo, &entity.name));
                entity.position = Position::UNKNOWN;
                Position::UNKNOWN
            }
            SourceLoc::Unknown => {
                self.sink
                    .warn(Diagnostic::new(DiagnosticKind::MissingSourceInfo, &entity.name));
                entity.position = Position::UNKNOWN;
                Position::UNKNOWN
            }
        }
    }
}

//! Module translation driver.

use super::{TranslatedModule, Translator};
use crate::cast::AstFactory;
use crate::core::{Diagnostic, DiagnosticKind, TranslateResult};
use crate::sil::SilModule;

impl<'a, 'arena, F: AstFactory> Translator<'a, 'arena, F> {
    /// Translate every qualifying function of `module`, in declaration order.
    ///
    /// Builtins are skipped silently, empty bodies with a warning. The first
    /// fatal error aborts the pass.
    pub fn translate_module(&mut self, module: &SilModule) -> TranslateResult<TranslatedModule<F::Node>> {
        self.source_file = module.source_file.clone();
        let mut entities = Vec::new();

        for function in &module.functions {
            let demangled = function.display_name();

            if self.config.builtins.contains(demangled) {
                log::debug!("skipping builtin {}", demangled);
                self.session.record_builtin_skipped();
                continue;
            }

            if function.is_empty() {
                self.sink
                    .warn(Diagnostic::new(DiagnosticKind::EmptyFunction, demangled));
                self.session.record_empty_skipped();
                continue;
            }

            let entity = self.translate_function(function).map_err(|e| {
                log::debug!(
                    "translation aborted in {}: {}",
                    self.session.current_function().unwrap_or_default(),
                    e
                );
                e
            })?;
            entities.push(entity);
        }

        log::debug!(
            "translated {} of {} functions",
            entities.len(),
            module.functions.len()
        );
        Ok(TranslatedModule {
            source_file: module.source_file.clone(),
            entities,
            stats: self.session.stats(),
        })
    }
}

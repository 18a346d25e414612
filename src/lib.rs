//! silcast - SIL to CAst translation.
//!
//! silcast lowers Swift Intermediate Language functions into a small common
//! AST (CAst) consumed by program-analysis frameworks. Each function becomes
//! an [`Entity`] holding one labeled block statement per basic block, plus
//! precomputed call-site and control-flow node lists so the consumer does
//! not have to re-walk the trees.
//!
//! # Primary Usage
//!
//! ```
//! use bumpalo::Bump;
//! use silcast::cast::CAst;
//! use silcast::core::{CollectingSink, TranslationSession, TranslatorConfig};
//! use silcast::sil::parse_module;
//! use silcast::translate_module;
//!
//! let module = parse_module(
//!     "sil @main () -> () {\nbb0:\n  %0 = alloc_stack : $Int\n  dealloc_stack %0\n  unreachable\n}\n",
//! )
//! .unwrap();
//!
//! // Create a session with arena allocation
//! let arena = Bump::new();
//! let session = TranslationSession::new(&arena);
//! let mut ast = CAst::new(&session);
//! let mut sink = CollectingSink::new();
//!
//! let translated =
//!     translate_module(&mut ast, &session, &module, &TranslatorConfig::default(), &mut sink).unwrap();
//! assert_eq!(translated.entities.len(), 1);
//! assert!(translated.entities[0].is_script());
//! ```
//!
//! # Architecture
//!
//! - [`sil`] - Source IR model and text parser
//! - [`cast`] - Target AST factory and arena implementation
//! - [`translator`] - Binding table, instruction rules and drivers
//! - [`core`] - Shared infrastructure (session, errors, diagnostics, config)

pub mod cast;
pub mod core;
pub mod sil;
pub mod translator;

pub use cast::{AstFactory, CAst, NodeId, NodeKind, Position};
pub use core::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, SessionStats,
    TranslateError, TranslateResult, TranslationSession, TranslatorConfig,
};
pub use sil::{parse_module, InstKind, ParseError, SilModule, ValueId};
pub use translator::{translate_module, Entity, TranslatedModule, Translator};

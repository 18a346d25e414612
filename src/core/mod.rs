// This module collects the infrastructure shared by every stage of the silcast pass:
// arena-backed session management (string interning and translation statistics), the
// fatal error type returned when the input violates a structural precondition, the
// injected diagnostic sink used for degrade-and-continue warnings, and the translator
// configuration (empty-node policy, entry symbol, builtin filter). None of these depend
// on the shape of the source IR or of the target AST beyond the identity types carried
// in error values.

//! Core silcast infrastructure.
//!
//! # Key Components
//!
//! ## Session Management (`session`)
//! - Arena-based string interning using `bumpalo`
//! - Translation statistics
//!
//! ## Errors (`error`)
//! - Fatal invariant violations as [`TranslateError`]
//!
//! ## Diagnostics (`diagnostics`)
//! - Injected [`DiagnosticSink`] for recoverable warnings
//!
//! ## Configuration (`config`)
//! - [`TranslatorConfig`] and the [`BuiltinFilter`] name set

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod session;

pub use config::{BuiltinFilter, TranslatorConfig, DEFAULT_ENTRY_SYMBOL, SCRIPT_ENTITY_NAME};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink};
pub use error::{TranslateError, TranslateResult};
pub use session::{SessionStats, TranslationSession};

// This module defines error types for the silcast translator using the thiserror crate for
// idiomatic Rust error handling. TranslateError covers the fatal invariant violations of
// the translation pass: looking up a value identity that has no live binding, an operand
// that resolves to a symbol of the wrong shape (e.g. an index_addr base that is not an
// object literal), and instructions missing the operands or results their translation
// rule reads. Each variant carries the value identity or instruction kind involved for
// debugging. Degrade-and-continue conditions (missing source positions, empty bodies,
// unimplemented instruction kinds) are not errors and never reach this type. The module
// also provides TranslateResult<T> as a convenience alias for Result<T, TranslateError>.

//! Error types for the silcast translator.
//!
//! Only fatal invariant violations are represented here. Anything the pass
//! can recover from is reported through a [`DiagnosticSink`] instead.
//!
//! [`DiagnosticSink`]: crate::core::DiagnosticSink

use crate::cast::NodeKind;
use crate::sil::{InstKind, ValueId};
use thiserror::Error;

/// Main error type for the translation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Value {value} has no live binding")]
    UnboundValue {
        value: ValueId,
    },

    #[error("Value {value} resolves to a {found:?} symbol, expected {expected:?}")]
    UnexpectedSymbolKind {
        value: ValueId,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("{inst} is missing operand #{index}")]
    MissingOperand {
        inst: InstKind,
        index: usize,
    },

    #[error("{inst} has no result value")]
    MissingResult {
        inst: InstKind,
    },
}

/// Result type alias for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;

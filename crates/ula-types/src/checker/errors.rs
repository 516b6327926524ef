// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type checker error types.

use ula_ast::{Span, Type};

/// A type error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: Type,
        found: Type,
        span: Span,
    },
    #[error("undefined name '{name}'")]
    UndefinedSymbol {
        name: String,
        span: Span,
        /// Names that were in scope, for did-you-mean hints.
        candidates: Vec<String>,
    },
    #[error("duplicate definition of '{name}'")]
    DuplicateDefinition {
        name: String,
        span: Span,
        /// Where the name was first defined. `None` for builtins.
        first_span: Option<Span>,
    },
    #[error("arity mismatch: '{name}' expects {expected} arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("literal {value} is out of range for {ty}")]
    LiteralOutOfRange { value: i64, ty: Type, span: Span },
    #[error("missing return statement")]
    MissingReturn {
        function_name: String,
        expected: Type,
        span: Span,
    },
    #[error("'main' must take no parameters and return void")]
    InvalidMainSignature { span: Span },
}

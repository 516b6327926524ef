// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from stage error types to `Diagnostic`.
//!
//! The `ToDiagnostic` trait is implemented for every stage's error type,
//! keeping the stage crates free of presentation concerns.

use ula_ast::Type;

use crate::suggestions::did_you_mean;
use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for ula_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code("E0001")
            .with_primary(self.span, "here");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for ula_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code("E0100")
            .with_primary(self.span, "here");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

// ============================================================================
// Type Errors
// ============================================================================

impl ToDiagnostic for ula_types::TypeError {
    fn to_diagnostic(&self) -> Diagnostic {
        use ula_types::TypeError::*;

        match self {
            Mismatch {
                expected,
                found,
                span,
            } => Diagnostic::error("mismatched types")
                .with_code("E0308")
                .with_primary(
                    *span,
                    format!("expected `{}`, found `{}`", expected, found),
                ),

            UndefinedSymbol {
                name,
                span,
                candidates,
            } => {
                let mut diag = Diagnostic::error(format!("undefined name `{}`", name))
                    .with_code("E0200")
                    .with_primary(*span, "not found in this scope");

                if let Some(hint) = did_you_mean(name, candidates.iter().map(String::as_str)) {
                    diag = diag.with_help(hint);
                }

                diag
            }

            DuplicateDefinition {
                name,
                span,
                first_span,
            } => {
                let diag = Diagnostic::error(format!("duplicate definition of `{}`", name))
                    .with_code("E0201")
                    .with_primary(*span, "redefined here");

                match first_span {
                    Some(first) => diag.with_secondary(*first, "first defined here"),
                    // Only the builtin has no first definition site.
                    None => diag.with_help("`print` is built in and cannot be redefined"),
                }
            }

            ArityMismatch {
                name,
                expected,
                found,
                span,
            } => Diagnostic::error(format!(
                "`{}` expects {} argument{}, found {}",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                found
            ))
            .with_code("E0310")
            .with_primary(
                *span,
                format!(
                    "takes {} argument{}",
                    expected,
                    if *expected == 1 { "" } else { "s" }
                ),
            ),

            LiteralOutOfRange { value, ty, span } => {
                let diag = Diagnostic::error(format!(
                    "literal `{}` is out of range for `{}`",
                    value, ty
                ))
                .with_code("E0311")
                .with_primary(*span, format!("does not fit in `{}`", ty));

                match ty {
                    Type::U8 => diag.with_note("`u8` holds 0 to 255"),
                    Type::I8 => diag.with_note("`i8` holds -128 to 127"),
                    _ => diag,
                }
            }

            MissingReturn {
                function_name,
                expected,
                span,
            } => Diagnostic::error(format!(
                "missing return statement in `{}`",
                function_name
            ))
            .with_code("E0318")
            .with_primary(*span, "function ends without returning")
            .with_help(format!(
                "add a `return` with a value of type `{}`",
                expected
            )),

            InvalidMainSignature { span } => {
                Diagnostic::error("`main` must take no parameters and return `void`")
                    .with_code("E0580")
                    .with_primary(*span, "defined here")
                    .with_note("`main` is called by the startup code with an empty frame")
            }
        }
    }
}

// ============================================================================
// Codegen Errors
// ============================================================================

impl ToDiagnostic for ula_codegen::CodegenError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::internal(self.to_string())
            .with_code("E0900")
            .with_note("this is a compiler bug, not an error in your program; please report it")
    }
}

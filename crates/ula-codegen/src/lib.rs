// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Ula code generator: typed AST to Z80 assembly text for sjasmplus.

mod gen;
mod runtime;

pub use gen::CodeGenerator;

use ula_ast::decl::Program;
use ula_ast::NodeId;
use ula_types::TypedProgram;

/// An internal invariant violation. These are unreachable after a
/// successful typecheck; hitting one is a compiler bug, not a user error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodegenError {
    #[error("no symbol recorded for node {0:?}")]
    MissingSymbol(NodeId),
    #[error("no type recorded for node {0:?}")]
    MissingType(NodeId),
    #[error("no frame recorded for function '{0}'")]
    MissingFrame(String),
    #[error("print call reached codegen with {0} arguments")]
    MalformedPrint(usize),
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Generate the assembly listing for a checked program.
pub fn generate(program: &Program, typed: &TypedProgram) -> CodegenResult<String> {
    CodeGenerator::new(typed).generate(program)
}

/// Bracket a listing with sjasmplus snapshot directives so assembling it
/// produces a runnable `<name>.sna` image directly.
pub fn wrap_snapshot(listing: &str, name: &str) -> String {
    format!(
        "    DEVICE ZXSPECTRUM48\n\n{}\n\n    SAVESNA \"{}.sna\", start\n",
        listing.trim_end(),
        name
    )
}

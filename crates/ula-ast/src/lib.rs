// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the Ula language.
//!
//! This crate defines the tokens, spans, and AST nodes shared between the
//! lexer, parser, type checker, and code generator.

pub mod span;
pub mod token;
pub mod ty;
pub mod expr;
pub mod stmt;
pub mod decl;

pub use span::{LineMap, Span};
pub use ty::Type;

/// Unique identifier for AST nodes.
///
/// Assigned by the parser; semantic passes key their per-node results
/// (resolved types, symbol bindings) on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

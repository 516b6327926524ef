// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Top-level declaration AST nodes.

use crate::stmt::Block;
use crate::{NodeId, Span, Type};

/// A whole compilation unit: an ordered sequence of function definitions.
#[derive(Debug, Clone)]
pub struct Program {
    pub funcs: Vec<FunctionDef>,
}

/// A function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub id: NodeId,
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: Block,
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

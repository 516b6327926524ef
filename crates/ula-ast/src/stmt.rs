//! Statement AST nodes.

use crate::expr::Expr;
use crate::{NodeId, Span, Type};

/// A statement in the AST.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Typed declaration: `let name: ty = init`
    Let {
        name: String,
        ty: Type,
        init: Expr,
    },
    /// Mutation of an existing binding: `name = value`
    Assign {
        name: String,
        value: Expr,
    },
    /// Conditional with optional else branch
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// Expression statement (covers bare calls such as `print(x)`)
    Expr(Expr),
    /// Return with optional payload
    Return(Option<Expr>),
}

/// An indentation-delimited block. Each block introduces its own lexical
/// scope; blocks always contain at least one statement.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

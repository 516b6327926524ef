//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Bool(bool),

    // Identifier
    Ident(String),

    // Keywords
    Def,
    Let,
    If,
    Else,
    Return,

    // Type keywords
    U8,
    I8,
    BoolTy,
    Void,

    // Operators
    Plus,
    Minus,
    Eq,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Delimiters
    LParen,
    RParen,
    Colon,
    Arrow,
    Comma,

    // Layout (synthesized by the lexer)
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "a number",
            TokenKind::Bool(_) => "'true' or 'false'",

            TokenKind::Ident(_) => "a name",

            TokenKind::Def => "'def'",
            TokenKind::Let => "'let'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Return => "'return'",

            TokenKind::U8 => "'u8'",
            TokenKind::I8 => "'i8'",
            TokenKind::BoolTy => "'bool'",
            TokenKind::Void => "'void'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Colon => "':'",
            TokenKind::Arrow => "'->'",
            TokenKind::Comma => "','",

            TokenKind::Newline => "end of line",
            TokenKind::Indent => "an indented block",
            TokenKind::Dedent => "end of block",
            TokenKind::Eof => "end of file",
        }
    }

    /// True for the comparison operator tokens.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
        )
    }
}

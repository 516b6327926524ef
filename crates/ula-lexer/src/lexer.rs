//! The lexer implementation using logos, plus the indentation layer.

use logos::Logos;
use ula_ast::token::{Token, TokenKind};
use ula_ast::{LineMap, Span};

/// Raw token type for logos - intra-line tokens only. Indent/Dedent are
/// synthesized in a second pass from line widths.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t]+")] // Skip horizontal whitespace (not newlines)
enum RawToken {
    // === Keywords ===
    #[token("def")]
    Def,
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,
    #[token("u8")]
    U8,
    #[token("i8")]
    I8,
    #[token("bool")]
    Bool,
    #[token("void")]
    Void,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Operators (order matters - longer first) ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    // === Newline (significant) ===
    #[token("\n")]
    #[token("\r\n")]
    Newline,

    // === Comments (skip them) ===
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    // === Literals ===
    #[regex(r"[0-9]+")]
    Int,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// The lexer for Ula source code.
///
/// Tokenizing runs in two phases: logos produces the raw intra-line stream,
/// then the indentation layer collapses blank lines and synthesizes
/// Indent/Dedent tokens from a stack of line widths, Python-fashion.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source. Stops at the first error.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let raw = self.raw_tokens()?;
        self.layer_indentation(raw)
    }

    /// Run logos over the source, converting raw tokens as we go.
    fn raw_tokens(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => self.convert_token(raw, slice, span.start, span.end)?,
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    return Err(LexError::unexpected_char(ch, span.start));
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        Ok(tokens)
    }

    /// Convert a raw logos token to our TokenKind, parsing literals.
    fn convert_token(
        &self,
        raw: RawToken,
        slice: &str,
        start: usize,
        end: usize,
    ) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Def => TokenKind::Def,
            RawToken::Let => TokenKind::Let,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::Return => TokenKind::Return,
            RawToken::U8 => TokenKind::U8,
            RawToken::I8 => TokenKind::I8,
            RawToken::Bool => TokenKind::BoolTy,
            RawToken::Void => TokenKind::Void,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),

            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Newline => TokenKind::Newline,

            RawToken::Int => {
                let value = slice
                    .parse::<i64>()
                    .map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Int(value)
            }

            RawToken::Ident => TokenKind::Ident(slice.to_string()),

            // Skipped by logos, listed for completeness
            RawToken::Comment => unreachable!("comments are skipped"),
        })
    }

    /// Turn line widths into Indent/Dedent tokens.
    ///
    /// The width of a line is the byte length of the whitespace run before
    /// its first token. Blank and comment-only lines contribute nothing;
    /// consecutive newlines collapse into one.
    fn layer_indentation(&self, raw: Vec<Token>) -> Result<Vec<Token>, LexError> {
        let line_map = LineMap::new(self.source);
        let mut out: Vec<Token> = Vec::new();
        // Invariant: stack[0] == 0, strictly increasing.
        let mut stack: Vec<usize> = vec![0];
        let mut at_line_start = true;

        for tok in raw {
            if matches!(tok.kind, TokenKind::Newline) {
                // Collapse newline runs; drop leading blank lines entirely.
                if !at_line_start {
                    out.push(tok);
                }
                at_line_start = true;
                continue;
            }

            if at_line_start {
                let (line_start, width) = self.indent_width(&line_map, tok.span.start)?;
                let top = *stack.last().unwrap();
                if width > top {
                    stack.push(width);
                    out.push(Token {
                        kind: TokenKind::Indent,
                        span: Span::new(line_start, tok.span.start),
                    });
                } else if width < top {
                    while width < *stack.last().unwrap() {
                        stack.pop();
                        out.push(Token {
                            kind: TokenKind::Dedent,
                            span: Span::new(tok.span.start, tok.span.start),
                        });
                    }
                    if width != *stack.last().unwrap() {
                        return Err(LexError::inconsistent_dedent(tok.span.start));
                    }
                }
                at_line_start = false;
            }

            out.push(tok);
        }

        let end = self.source.len();
        if !at_line_start {
            // Source ended mid-line; close the line for the parser.
            out.push(Token {
                kind: TokenKind::Newline,
                span: Span::new(end, end),
            });
        }
        while stack.len() > 1 {
            stack.pop();
            out.push(Token {
                kind: TokenKind::Dedent,
                span: Span::new(end, end),
            });
        }
        out.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(end, end),
        });

        Ok(out)
    }

    /// Line start offset and indentation width for the line containing
    /// `offset` (the first token's start). Tabs in the leading run are
    /// rejected; after the first token they are ordinary whitespace.
    fn indent_width(&self, line_map: &LineMap, offset: usize) -> Result<(usize, usize), LexError> {
        let (line, _) = line_map.offset_to_line_col(offset);
        let line_start = line_map.line_start(line).unwrap_or(0);
        let leading = &self.source[line_start..offset];
        if let Some(i) = leading.bytes().position(|b| b == b'\t') {
            return Err(LexError::tab_indent(line_start + i));
        }
        Ok((line_start, leading.len()))
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "integer literal is too large".to_string(),
            hint: Some("the widest Ula type is 8 bits".to_string()),
        }
    }

    fn tab_indent(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "tab character in indentation".to_string(),
            hint: Some("indent with spaces only".to_string()),
        }
    }

    fn inconsistent_dedent(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos),
            message: "unindent does not match any outer indentation level".to_string(),
            hint: None,
        }
    }
}

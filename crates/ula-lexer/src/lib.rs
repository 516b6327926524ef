//! Lexer for the Ula compiler.
//!
//! Converts source text into a stream of [`Token`]s. Indentation is
//! significant: the lexer emits `Indent` and `Dedent` tokens so the parser
//! can treat block structure like ordinary delimiters.
//!
//! [`Token`]: ula_ast::token::Token

mod lexer;

pub use lexer::{LexError, Lexer};

#[cfg(test)]
mod tests {
    use super::*;
    use ula_ast::token::TokenKind;

    fn lex(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .expect("lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(source: &str) -> LexError {
        Lexer::new(source)
            .tokenize()
            .expect_err("lexing should fail")
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(lex("\n\n\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_idents() {
        let kinds = lex("def let if else return u8 i8 bool void foo");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Def,
                TokenKind::Let,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::Return,
                TokenKind::U8,
                TokenKind::I8,
                TokenKind::BoolTy,
                TokenKind::Void,
                TokenKind::Ident("foo".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_an_ident() {
        let kinds = lex("define lettuce");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("define".to_string()),
                TokenKind::Ident("lettuce".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_longest_match_first() {
        let kinds = lex("== != <= >= -> + - = < >");
        assert_eq!(
            kinds,
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Arrow,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn int_and_bool_literals() {
        let kinds = lex("0 255 true false");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int(0),
                TokenKind::Int(255),
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let kinds = lex("let x # the answer\n# whole line\nlet y");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Newline,
                TokenKind::Let,
                TokenKind::Ident("y".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn simple_function_gets_indent_and_dedent() {
        let kinds = lex("def main() -> void:\n    return\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Def,
                TokenKind::Ident("main".to_string()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Void,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Return,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn missing_trailing_newline_is_synthesized() {
        let kinds = lex("def main() -> void:\n    return");
        assert_eq!(
            &kinds[kinds.len() - 4..],
            &[
                TokenKind::Return,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn blank_line_inside_block_collapses() {
        let kinds = lex("def f() -> void:\n\n    return\n");
        let newlines = kinds
            .iter()
            .filter(|k| matches!(k, TokenKind::Newline))
            .count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn if_else_dedents_before_else() {
        let kinds = lex("def f(x: bool) -> u8:\n    if x:\n        return 1\n    else:\n        return 2\n");
        // Skip the signature line: def f ( x : bool ) -> u8 : NEWLINE
        let tail = &kinds[11..];
        assert_eq!(
            tail,
            &[
                TokenKind::Indent,
                TokenKind::If,
                TokenKind::Ident("x".to_string()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Return,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Else,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Return,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn eof_flushes_all_open_blocks() {
        let kinds = lex("def f() -> void:\n    if true:\n        return");
        let dedents = kinds
            .iter()
            .filter(|k| matches!(k, TokenKind::Dedent))
            .count();
        assert_eq!(dedents, 2);
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn indent_span_covers_leading_whitespace() {
        let source = "def f() -> void:\n    return\n";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let indent = tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Indent))
            .unwrap();
        assert_eq!(indent.span.start, source.find("    return").unwrap());
        assert_eq!(indent.span.end, source.find("return").unwrap());
    }

    #[test]
    fn tab_in_indentation_is_rejected() {
        let err = lex_err("def f() -> void:\n\treturn\n");
        assert_eq!(err.message, "tab character in indentation");
        assert_eq!(err.span.start, "def f() -> void:\n".len());
    }

    #[test]
    fn tab_between_tokens_is_fine() {
        let kinds = lex("let\tx");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn inconsistent_dedent_is_rejected() {
        let err = lex_err("def f() -> void:\n        return\n  return\n");
        assert_eq!(
            err.message,
            "unindent does not match any outer indentation level"
        );
    }

    #[test]
    fn unexpected_character() {
        let err = lex_err("let x = 1 $ 2");
        assert_eq!(err.message, "unexpected character '$'");
        assert_eq!(err.span.start, 10);
    }

    #[test]
    fn oversized_literal_is_rejected() {
        let err = lex_err("let x: u8 = 99999999999999999999999");
        assert_eq!(err.message, "integer literal is too large");
    }
}

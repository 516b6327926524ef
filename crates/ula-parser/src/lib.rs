//! Parser for the Ula language.
//!
//! Transforms a token stream into an abstract syntax tree.

mod parser;

pub use parser::{ParseError, ParseResult, Parser};

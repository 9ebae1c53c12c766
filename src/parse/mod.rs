pub mod ast;
pub mod error;
pub mod lexer;
mod parser;
pub mod visit;

pub use error::{LexError, ParseError, ParseErrorKind};
pub use parser::Parser;

use crate::error::CompileError;

/// Lexes and parses `s` into an unoptimized expression tree.
pub fn parse(s: &str) -> Result<ast::Node, CompileError> {
    let tokens = lexer::tokenize(s)?;
    Ok(Parser::new(&tokens).parse()?)
}

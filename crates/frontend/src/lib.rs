pub mod ast;
pub mod lexer;
pub mod parser;

extern crate tools;

use tracing::debug;

use ast::Block;
use lexer::Lexer;
use parser::Parser;
use tools::errors::CodeErr;

// Tokenizes and parses a whole program. Fails on the first malformed
// construct with its position.
pub fn parse(source: &str) -> Result<Block, CodeErr> {
    let mut lexer: Lexer = Default::default();
    let mut parser: Parser = Default::default();

    lexer.tokenize(source).inspect_err(|e| debug!(%e, "lexing failed"))?;

    let tokens = std::mem::take(&mut lexer.tokens);
    parser
        .build_ast(source, tokens)
        .inspect_err(|e| debug!(%e, "parsing failed"))
}

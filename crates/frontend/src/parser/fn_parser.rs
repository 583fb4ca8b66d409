use std::rc::Rc;

use super::errors_parser::ParserError;
use super::Parser;
use super::TokenKind;
use super::{ASTNode, ASTNodeKind};

impl Parser {
    // Function declaration. The syntax is:
    // Fact n {
    //    if n <= 1 { 1 } else { n * Fact (n - 1) }
    // }
    // Parameters are plain variable names and the '{' must be on the same line
    pub(super) fn is_fn_declaration(&self) -> bool {
        self.tokens
            .iter()
            .skip(1)
            .find(|t| t.kind != TokenKind::Identifier)
            .is_some_and(|t| t.kind == TokenKind::OpenBrace)
    }

    pub(super) fn parse_fn_declaration(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        // We get the function name
        let name = self.expect_token(TokenKind::FuncName, "function name")?.value;

        // Then all the parameters until the body. Repeated names are reported
        // by the evaluator, not here
        let mut params: Vec<String> = vec![];
        while self.at().kind == TokenKind::Identifier {
            params.push(self.eat()?.value);
        }

        let body = self.parse_braced_block()?;

        Ok(self.finish(
            ASTNodeKind::FunDef {
                name,
                params,
                body: Rc::new(body),
            },
            mark,
        ))
    }

    // Call by juxtaposition: Fact 5, Add x (y * 2), Zero
    // Arguments are primaries on the same line, a nested call with arguments
    // has to be parenthesised: Add (Fact 3) 1
    pub(super) fn parse_function_call(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        let name = self.expect_token(TokenKind::FuncName, "function name")?.value;

        let mut args: Vec<ASTNode> = vec![];
        while self.at().is_primary_start() {
            args.push(self.parse_primary_expr()?);
        }

        Ok(self.finish(ASTNodeKind::Funcall { name, args }, mark))
    }
}

use super::errors_parser::ParserError;
use super::Parser;
use super::TokenKind;
use super::{ASTNode, ASTNodeKind};

impl Parser {
    // Variable assignment. The syntax is:
    // x <- x + 5
    // Variables are never declared, the first assignment or read creates them
    pub(super) fn parse_assignment(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        let name = self.expect_token(TokenKind::Identifier, "variable name")?.value;
        self.expect_token(TokenKind::Arrow, "'<-'")?;

        // The value is any expression, calls included: x <- Fact 5
        let value = self.parse_expr()?;

        Ok(self.finish(
            ASTNodeKind::Assignment {
                name,
                value: Box::new(value),
            },
            mark,
        ))
    }
}

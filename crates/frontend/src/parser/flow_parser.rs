use super::errors_parser::ParserError;
use super::Parser;
use super::TokenKind;
use super::{ASTNode, ASTNodeKind};

impl Parser {
    // if cond { ... } else { ... }
    // The 'else' part is optional and may start on a following line
    pub(super) fn parse_if_else(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        self.expect_token(TokenKind::If, "'if'")?;
        let cond = self.parse_expr()?;
        let true_branch = self.parse_braced_block()?;

        let false_branch = if self.next_significant_kind() == TokenKind::Else {
            self.skip_end_lines();
            self.eat()?;

            Some(self.parse_braced_block()?)
        } else {
            None
        };

        Ok(self.finish(
            ASTNodeKind::IfElse {
                cond: Box::new(cond),
                true_branch,
                false_branch,
            },
            mark,
        ))
    }

    // while cond { ... }
    pub(super) fn parse_while(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        self.expect_token(TokenKind::While, "'while'")?;
        let cond = self.parse_expr()?;
        let body = self.parse_braced_block()?;

        Ok(self.finish(
            ASTNodeKind::While {
                cond: Box::new(cond),
                body,
            },
            mark,
        ))
    }
}

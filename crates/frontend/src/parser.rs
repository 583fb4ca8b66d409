use std::collections::VecDeque;

use num_bigint::BigInt;

mod errors_parser;
mod flow_parser;
mod fn_parser;
mod var_parser;

pub use crate::ast::{ASTNode, ASTNodeKind, Block};
pub use crate::lexer::{Token, TokenKind};
pub use self::errors_parser::ParserError;

use tools::errors::{CodeErr, ReportCodeErr};

// Where a node starts, so its source text can be sliced once it is complete
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    start: usize,
    line: u64,
}

#[derive(Default)]
pub struct Parser {
    tokens: VecDeque<Token>,
    source: String,
    // End offset of the last eaten token
    last_end: usize,
    eof: Option<Token>,
}

impl Parser {
    // Parses the whole program. The first malformed construct stops parsing,
    // there is no recovery.
    pub fn build_ast(&mut self, source: &str, tokens: VecDeque<Token>) -> Result<Block, CodeErr> {
        self.tokens = tokens;
        self.source = source.to_string();
        self.last_end = 0;

        // The buffer must always end with EOF, it is never eaten
        self.eof = self.tokens.back().filter(|t| t.kind == TokenKind::EOF).cloned();
        if self.eof.is_none() {
            let end = source.len();
            let eof = Token {
                kind: TokenKind::EOF,
                value: "<EOF>".into(),
                line: self.tokens.back().map_or(1, |t| t.line),
                column: 0,
                start: end,
                end,
            };
            self.tokens.push_back(eof.clone());
            self.eof = Some(eof);
        }

        self.parse_root().map_err(|e| {
            let tk = self.at();
            e.to_glob_err(tk.line, tk.column)
        })
    }

    fn parse_root(&mut self) -> Result<Block, ParserError> {
        let block = self.parse_block()?;

        // A closing brace without its opening one
        if !self.is_eof() {
            return Err(ParserError::ExtraneousInput(self.at().value.clone()));
        }

        Ok(block)
    }

    // Statements until a closing brace or the end of file
    pub(super) fn parse_block(&mut self) -> Result<Block, ParserError> {
        let mut statements = vec![];

        loop {
            self.skip_end_lines();

            match self.at().kind {
                TokenKind::CloseBrace | TokenKind::EOF => break,
                _ => statements.push(self.parse_statement()?),
            }
        }

        Ok(Block::new(statements))
    }

    pub(super) fn parse_braced_block(&mut self) -> Result<Block, ParserError> {
        self.expect_token(TokenKind::OpenBrace, "'{'")?;
        let block = self.parse_block()?;
        self.expect_token(TokenKind::CloseBrace, "'}'")?;

        Ok(block)
    }

    fn parse_statement(&mut self) -> Result<ASTNode, ParserError> {
        match self.at().kind {
            TokenKind::If => self.parse_if_else(),
            TokenKind::While => self.parse_while(),
            TokenKind::FuncName if self.is_fn_declaration() => self.parse_fn_declaration(),
            TokenKind::Identifier if self.peek_kind(1) == Some(TokenKind::Arrow) => {
                self.parse_assignment()
            }
            _ => self.parse_expr(),
        }
    }

    pub(super) fn parse_expr(&mut self) -> Result<ASTNode, ParserError> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();
        let mut left = self.parse_and_expr()?;

        while self.at().kind == TokenKind::Or {
            self.eat()?;
            let right = self.parse_and_expr()?;

            left = self.finish(
                ASTNodeKind::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                mark,
            );
        }

        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();
        let mut left = self.parse_not_expr()?;

        while self.at().kind == TokenKind::And {
            self.eat()?;
            let right = self.parse_not_expr()?;

            left = self.finish(
                ASTNodeKind::And {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                mark,
            );
        }

        Ok(left)
    }

    fn parse_not_expr(&mut self) -> Result<ASTNode, ParserError> {
        if self.at().kind != TokenKind::Not {
            return self.parse_comparison_expr();
        }

        let mark = self.mark();
        self.eat()?;
        let operand = self.parse_not_expr()?;

        Ok(self.finish(
            ASTNodeKind::Not {
                operand: Box::new(operand),
            },
            mark,
        ))
    }

    fn parse_comparison_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();
        let mut left = self.parse_additive_expr()?;

        while self.at().kind == TokenKind::Comparison {
            let operator = self.eat()?.value;
            let right = self.parse_additive_expr()?;

            left = self.finish(
                ASTNodeKind::BinaryOp {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                mark,
            );
        }

        Ok(left)
    }

    fn parse_additive_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();
        let mut left = self.parse_multiplicative_expr()?;

        while self.at_operator(&["+", "-"]) {
            let operator = self.eat()?.value;
            let right = self.parse_multiplicative_expr()?;

            left = self.finish(
                ASTNodeKind::BinaryOp {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                mark,
            );
        }

        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();
        let mut left = self.parse_unary_expr()?;

        while self.at_operator(&["*", "/", "%"]) {
            let operator = self.eat()?.value;
            let right = self.parse_unary_expr()?;

            left = self.finish(
                ASTNodeKind::BinaryOp {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                mark,
            );
        }

        Ok(left)
    }

    // Sign in front of an expression: -x, +(a * b), - -3
    fn parse_unary_expr(&mut self) -> Result<ASTNode, ParserError> {
        if !self.at_operator(&["+", "-"]) {
            return self.parse_call_expr();
        }

        let mark = self.mark();
        let operator = self.eat()?.value;
        let operand = self.parse_unary_expr()?;

        Ok(self.finish(
            ASTNodeKind::UnaryOp {
                operator,
                operand: Box::new(operand),
            },
            mark,
        ))
    }

    fn parse_call_expr(&mut self) -> Result<ASTNode, ParserError> {
        match self.at().kind {
            TokenKind::FuncName => self.parse_function_call(),
            _ => self.parse_primary_expr(),
        }
    }

    pub(super) fn parse_primary_expr(&mut self) -> Result<ASTNode, ParserError> {
        let mark = self.mark();

        match self.at().kind {
            TokenKind::Number => {
                // Checked before eating so the error points at the literal
                let value = self
                    .at()
                    .value
                    .parse::<BigInt>()
                    .map_err(|_| ParserError::InvalidIntLiteral(self.at().value.clone()))?;
                self.eat()?;

                Ok(self.finish(ASTNodeKind::IntLiteral { value }, mark))
            }
            TokenKind::Identifier => {
                let symbol = self.eat()?.value;

                Ok(self.finish(ASTNodeKind::Var { symbol }, mark))
            }
            TokenKind::OpenParen => {
                self.eat()?;
                let inner = self.parse_expr()?;
                self.expect_token(TokenKind::CloseParen, "')'")?;

                Ok(self.finish(
                    ASTNodeKind::ParenExpr {
                        inner: Box::new(inner),
                    },
                    mark,
                ))
            }
            _ => Err(ParserError::NoViableAlternative(self.at().value.clone())),
        }
    }

    // ---------
    //  Helpers
    // ---------
    fn at(&self) -> &Token {
        match (self.tokens.front(), &self.eof) {
            (Some(tk), _) => tk,
            (None, Some(eof)) => eof,
            // build_ast always leaves an EOF behind
            (None, None) => unreachable!("parser used before build_ast"),
        }
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(offset).map(|t| t.kind)
    }

    fn at_operator(&self, operators: &[&str]) -> bool {
        self.at().kind == TokenKind::BinaryOperator && operators.contains(&self.at().value.as_str())
    }

    fn eat(&mut self) -> Result<Token, ParserError> {
        if self.is_eof() {
            return Err(ParserError::EmptyTokenBufferUsed);
        }

        match self.tokens.pop_front() {
            Some(tk) => {
                self.last_end = tk.end;
                Ok(tk)
            }
            None => Err(ParserError::EmptyTokenBufferUsed),
        }
    }

    // Only eats the token if it has the expected kind, so that an error
    // reports the position of the offending token
    fn expect_token(&mut self, token_kind: TokenKind, expected: &str) -> Result<Token, ParserError> {
        if self.at().kind != token_kind {
            return Err(ParserError::MismatchedInput {
                found: self.at().value.clone(),
                expected: expected.into(),
            });
        }

        self.eat()
    }

    // Is end of file
    fn is_eof(&self) -> bool {
        self.at().kind == TokenKind::EOF
    }

    // Kind of the next token that is not a new line
    fn next_significant_kind(&self) -> TokenKind {
        self.tokens
            .iter()
            .find(|t| t.kind != TokenKind::EndLine)
            .map_or(TokenKind::EOF, |t| t.kind)
    }

    fn skip_end_lines(&mut self) {
        while self.at().kind == TokenKind::EndLine {
            if let Some(tk) = self.tokens.pop_front() {
                self.last_end = tk.end;
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            start: self.at().start,
            line: self.at().line,
        }
    }

    fn finish(&self, node: ASTNodeKind, mark: Mark) -> ASTNode {
        let text = self
            .source
            .get(mark.start..self.last_end)
            .unwrap_or_default()
            .to_string();

        ASTNode::new(node, text, mark.line)
    }
}

use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use tools::errors::{CodeErr, ReportCodeErr};

#[derive(Debug, Error, PartialEq)]
pub enum LexerError {
    #[error("token recognition error at: '{0}'")]
    UnrecognizedToken(String),
}

impl ReportCodeErr for LexerError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    // Literal types
    Number,
    Identifier,
    FuncName,

    // Operator
    BinaryOperator,
    Comparison,
    Arrow,

    // Grouping
    OpenParen,  // (
    CloseParen, // )
    OpenBrace,  // {
    CloseBrace, // }

    // Keywords
    If,
    Else,
    While,
    Not,
    And,
    Or,

    // File
    EndLine,
    EOF,
}

// Position is kept three ways: line and column for diagnostics, byte span so
// the parser can slice the exact source text of each node.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u64,
    pub column: u64,
    pub start: usize,
    pub end: usize,
}

// Skip listed char
fn is_skippable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Default)]
pub struct Lexer<'a> {
    pub tokens: VecDeque<Token>,
    reserved_keywords: HashMap<&'a str, TokenKind>,
}

impl<'a> Lexer<'a> {
    // Keywords generation
    fn generate_keywords(&mut self) {
        self.reserved_keywords.insert("if", TokenKind::If);
        self.reserved_keywords.insert("else", TokenKind::Else);
        self.reserved_keywords.insert("while", TokenKind::While);
        self.reserved_keywords.insert("not", TokenKind::Not);
        self.reserved_keywords.insert("and", TokenKind::And);
        self.reserved_keywords.insert("or", TokenKind::Or);
    }

    pub fn tokenize(&mut self, source_code: &str) -> Result<(), CodeErr> {
        self.generate_keywords();
        self.tokens.clear();

        let mut chars = source_code.char_indices().peekable();

        // Lines are 1-based and columns 0-based
        let mut line: u64 = 1;
        let mut line_start: usize = 0;
        // Inside parentheses new lines are not significant
        let mut paren_depth: usize = 0;

        while let Some((start, c)) = chars.next() {
            let column = (start - line_start) as u64;

            if is_skippable(c) {
                continue;
            }

            match c {
                '+' | '-' | '*' | '/' | '%' => self.push(
                    TokenKind::BinaryOperator,
                    c.to_string(),
                    line,
                    column,
                    start,
                ),
                '<' => match chars.peek() {
                    Some((_, '=')) => {
                        chars.next();
                        self.push(TokenKind::Comparison, "<=".into(), line, column, start);
                    }
                    Some((_, '-')) => {
                        chars.next();
                        self.push(TokenKind::Arrow, "<-".into(), line, column, start);
                    }
                    _ => self.push(TokenKind::Comparison, "<".into(), line, column, start),
                },
                '>' => match chars.peek() {
                    Some((_, '=')) => {
                        chars.next();
                        self.push(TokenKind::Comparison, ">=".into(), line, column, start);
                    }
                    _ => self.push(TokenKind::Comparison, ">".into(), line, column, start),
                },
                '=' => self.push(TokenKind::Comparison, "=".into(), line, column, start),
                '!' => match chars.peek() {
                    Some((_, '=')) => {
                        chars.next();
                        self.push(TokenKind::Comparison, "!=".into(), line, column, start);
                    }
                    _ => {
                        return Err(
                            LexerError::UnrecognizedToken(c.into()).to_glob_err(line, column)
                        )
                    }
                },
                '(' => {
                    paren_depth += 1;
                    self.push(TokenKind::OpenParen, c.to_string(), line, column, start);
                }
                ')' => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.push(TokenKind::CloseParen, c.to_string(), line, column, start);
                }
                '{' => self.push(TokenKind::OpenBrace, c.to_string(), line, column, start),
                '}' => self.push(TokenKind::CloseBrace, c.to_string(), line, column, start),
                // Comments run until the end of the line, the new line itself is kept
                '#' => {
                    while let Some((_, n)) = chars.peek() {
                        if *n == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                '\n' => {
                    if paren_depth == 0 {
                        self.push(TokenKind::EndLine, "\\n".into(), line, column, start);
                    }
                    line += 1;
                    line_start = start + 1;
                }
                _ if c.is_ascii_digit() => {
                    let mut val = String::from(c);

                    while let Some((_, n)) = chars.peek() {
                        if !n.is_ascii_digit() {
                            break;
                        }
                        val.push(*n);
                        chars.next();
                    }

                    self.push(TokenKind::Number, val, line, column, start);
                }
                _ if c.is_ascii_alphabetic() || c == '_' => {
                    let mut val = String::from(c);

                    while let Some((_, n)) = chars.peek() {
                        if !is_ident_char(*n) {
                            break;
                        }
                        val.push(*n);
                        chars.next();
                    }

                    // Check for reserved keywords, then functions start with a capital
                    let kind = match self.reserved_keywords.get(val.as_str()) {
                        Some(kw) => *kw,
                        None if c.is_ascii_uppercase() => TokenKind::FuncName,
                        None => TokenKind::Identifier,
                    };

                    self.push(kind, val, line, column, start);
                }
                _ => {
                    return Err(LexerError::UnrecognizedToken(c.into()).to_glob_err(line, column))
                }
            }
        }

        // We append manualy end of file
        let end = source_code.len();
        self.tokens.push_back(Token {
            kind: TokenKind::EOF,
            value: "<EOF>".into(),
            line,
            column: (end - line_start) as u64,
            start: end,
            end,
        });

        Ok(())
    }

    fn push(&mut self, kind: TokenKind, value: String, line: u64, column: u64, start: usize) {
        self.tokens.push_back(Token::new(kind, value, line, column, start));
    }
}

// ---------
//  Helpers
// ---------
impl Token {
    pub fn new(kind: TokenKind, value: String, line: u64, column: u64, start: usize) -> Self {
        // New lines are stored escaped but only span one byte
        let len = match kind {
            TokenKind::EndLine => 1,
            _ => value.len(),
        };

        Self {
            kind,
            value,
            line,
            column,
            start,
            end: start + len,
        }
    }

    // Tokens that can start a call argument
    pub fn is_primary_start(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::Identifier | TokenKind::OpenParen
        )
    }
}

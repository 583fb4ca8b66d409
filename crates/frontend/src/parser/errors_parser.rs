use thiserror::*;

use tools::errors::ReportCodeErr;

#[derive(Error, Debug, PartialEq)]
pub enum ParserError {
    // Token
    #[error("mismatched input '{found}' expecting {expected}")]
    MismatchedInput { found: String, expected: String },

    #[error("extraneous input '{0}' expecting <EOF>")]
    ExtraneousInput(String),

    #[error("no viable alternative at input '{0}'")]
    NoViableAlternative(String),

    #[error("tried to consume a token past the end of file")]
    EmptyTokenBufferUsed,

    // Literals
    #[error("invalid integer literal: '{0}'")]
    InvalidIntLiteral(String),
}

// Implement global trait for final error
impl ReportCodeErr for ParserError {}

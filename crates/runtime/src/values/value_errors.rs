use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    // Operations
    #[error("operator unknown: {0}")]
    UndefinedOperator(String),

    #[error("left operand produced no value")]
    AbsentLeftOperand,

    #[error("right operand produced no value")]
    AbsentRightOperand,

    #[error("division by zero")]
    DivisionByZero,
}

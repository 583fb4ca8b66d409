use thiserror::Error;

use tools::errors::CodeErr;

use crate::values::RuntimeVal;

// Everything that can abort a program. Each kind quotes the source it was
// raised on.
#[derive(Error, Debug, PartialEq)]
pub enum FunxError {
    #[error("funx undefined function '{name}' in '{code}'")]
    UndefinedFunction { name: String, code: String },

    #[error("funx redefined function '{name}' in '{code}'")]
    RedefinedFunction { name: String, code: String },

    #[error("funx invalid operand (not an expression) '{operand}' in '{code}'")]
    InvalidOperand { operand: String, code: String },

    #[error(
        "funx invalid parameter amount in '{code}', calling function '{name} {}' with {}",
        fmt_list(.params),
        fmt_list(.given)
    )]
    InvalidParams {
        name: String,
        params: Vec<String>,
        given: Vec<RuntimeVal>,
        code: String,
    },

    #[error("funx repeated parameter names in function definition '{code}'")]
    RepeatedParams {
        name: String,
        params: Vec<String>,
        code: String,
    },

    #[error("funx division by zero in '{code}'")]
    ZeroDivision { code: String },

    #[error("funx syntax error, {0}")]
    SyntaxError(String),
}

impl From<CodeErr> for FunxError {
    fn from(value: CodeErr) -> Self {
        FunxError::SyntaxError(value.to_string())
    }
}

// [a, b, c]
fn fmt_list<T: std::fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", items.join(", "))
}

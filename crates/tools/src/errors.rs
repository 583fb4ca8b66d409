use std::fmt::Display;

// Position of the first malformed construct plus what went wrong. Parsing is
// fail-fast so there is never more than one of these per program.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeErr {
    pub line: u64,
    pub column: u64,
    pub message: String,
}

impl Display for CodeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}:{} {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for CodeErr {}

pub trait ReportCodeErr {
    fn to_glob_err(&self, line: u64, column: u64) -> CodeErr
    where
        Self: std::fmt::Display,
    {
        CodeErr {
            line,
            column,
            message: self.to_string(),
        }
    }
}

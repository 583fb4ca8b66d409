pub mod environment;
pub mod functions;
pub mod interpreter;
pub mod values;

extern crate frontend;
extern crate tools;

pub use environment::Frame;
pub use functions::{FunctionEntry, FunctionRegistry};
pub use interpreter::{FunxError, Interpreter};
pub use values::RuntimeVal;

mod expr;
mod interp_errors;
mod stmt;

pub use interp_errors::FunxError;

use tracing::{debug, trace};

use super::environment::{Frame, FrameStore};
use super::functions::FunctionRegistry;
use super::values::RuntimeVal;
use crate::frontend::ast::{ASTNode, ASTNodeKind, Block};

/// One interpreter session.
///
/// Functions and top level variables persist across `execute` calls, so the
/// same session can serve a whole REPL. A session is single threaded: give
/// each concurrent user its own.
///
/// An error aborts the current program wherever it was raised. Call
/// [`Interpreter::recover`] before running the next one.
#[derive(Debug, Default)]
pub struct Interpreter {
    functions: FunctionRegistry,
    frames: FrameStore,
}

impl Interpreter {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parses and evaluates a program. A parse failure is reported as
    /// [`FunxError::SyntaxError`] and nothing is evaluated.
    #[tracing::instrument(level = "debug", skip_all, fields(len = code.len()))]
    pub fn execute(&mut self, code: &str) -> Result<RuntimeVal, FunxError> {
        let program = frontend::parse(code)?;

        self.execute_program(&program)
    }

    /// Evaluates an already parsed program in this session.
    pub fn execute_program(&mut self, program: &Block) -> Result<RuntimeVal, FunxError> {
        self.visit_block(program).inspect_err(|e| {
            debug!(%e, depth = self.frames.depth(), "evaluation aborted");
        })
    }

    /// Evaluates a single node in the active frame.
    pub fn visit(&mut self, node: &ASTNode) -> Result<RuntimeVal, FunxError> {
        trace!(kind = node.node.kind_name(), line = node.line, "visit");

        match &node.node {
            ASTNodeKind::Block(block) => self.visit_block(block),
            ASTNodeKind::Funcall { name, args } => self.visit_funcall(node, name, args),
            ASTNodeKind::UnaryOp { operator, operand } => {
                self.visit_unary_op(node, operator, operand)
            }
            ASTNodeKind::Not { operand } => self.visit_not(node, operand),
            ASTNodeKind::And { left, right } => self.visit_and(left, right),
            ASTNodeKind::Or { left, right } => self.visit_or(left, right),
            ASTNodeKind::BinaryOp {
                left,
                right,
                operator,
            } => self.visit_binary_op(node, left, right, operator),
            ASTNodeKind::Var { symbol } => Ok(self.frames.current_mut().read_var(symbol)),
            ASTNodeKind::IntLiteral { value } => Ok(RuntimeVal::Int(value.clone())),
            ASTNodeKind::ParenExpr { inner } => self.visit(inner),
            ASTNodeKind::Assignment { name, value } => self.visit_assignment(name, value),
            ASTNodeKind::IfElse {
                cond,
                true_branch,
                false_branch,
            } => self.visit_if_else(node, cond, true_branch, false_branch.as_ref()),
            ASTNodeKind::While { cond, body } => self.visit_while(node, cond, body),
            ASTNodeKind::FunDef { name, params, body } => {
                self.visit_fun_def(node, name, params, body)
            }
        }
    }

    /// Variables of the active frame. Between two programs it is the top
    /// level one.
    pub fn current_variables(&self) -> &Frame {
        self.frames.current()
    }

    pub fn defined_functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// Brings the call stack back to the top level frame after a failed
    /// program. Top level variables and functions are kept.
    pub fn recover(&mut self) {
        if self.frames.depth() > 1 {
            debug!(depth = self.frames.depth(), "dropping interrupted call frames");
        }

        self.frames.truncate_to_global();
    }

    /// Forgets every function and variable.
    pub fn reset(&mut self) {
        self.functions.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(interp: &mut Interpreter, code: &str) -> Result<RuntimeVal, FunxError> {
        interp.execute(code)
    }

    fn value_of(code: &str) -> RuntimeVal {
        Interpreter::new().execute(code).unwrap()
    }

    const FACT: &str = "Fact n {\n  if n <= 1 { 1 } else { n * Fact (n - 1) }\n}\n";

    #[test]
    fn evaluate_num_literal_expr() {
        assert_eq!(value_of("88"), RuntimeVal::int(88));
        assert_eq!(value_of("-88"), RuntimeVal::int(-88));
        assert_eq!(value_of("+(3)"), RuntimeVal::int(3));
    }

    #[test]
    fn empty_program_is_absent() {
        assert_eq!(value_of(""), RuntimeVal::Absent);
        assert_eq!(value_of("x <- 1"), RuntimeVal::Absent);
    }

    #[test]
    fn variables_persist_between_programs() {
        let mut interp = Interpreter::new();

        run(&mut interp, "x <- x + 1").unwrap();
        run(&mut interp, "x <- x + 1").unwrap();

        assert_eq!(run(&mut interp, "x"), Ok(RuntimeVal::int(2)));
    }

    #[test]
    fn reading_unset_var_defines_it() {
        let mut interp = Interpreter::new();

        assert_eq!(interp.current_variables().get("y"), None);
        assert_eq!(run(&mut interp, "y"), Ok(RuntimeVal::int(0)));
        assert_eq!(interp.current_variables().get("y"), Some(RuntimeVal::int(0)));
        assert_eq!(run(&mut interp, "y"), Ok(RuntimeVal::int(0)));
        assert_eq!(interp.current_variables().len(), 1);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(value_of("5 / 2"), RuntimeVal::int(2));
        assert_eq!(value_of("-5 / 2"), RuntimeVal::int(-3));
        assert_eq!(value_of("-5 % 3"), RuntimeVal::int(1));
        assert_eq!(value_of("2 + 3 * 4 - 1"), RuntimeVal::int(13));
        assert_eq!(value_of("(2 + 3) * 4"), RuntimeVal::int(20));
        assert_eq!(value_of("- -4"), RuntimeVal::int(4));
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(value_of("3 < 4"), RuntimeVal::int(1));
        assert_eq!(value_of("3 = 4"), RuntimeVal::int(0));
        assert_eq!(value_of("3 != 4"), RuntimeVal::int(1));
        assert_eq!(value_of("not 0"), RuntimeVal::int(1));
        assert_eq!(value_of("not 7"), RuntimeVal::int(0));
        assert_eq!(value_of("2 and 3"), RuntimeVal::int(1));
        assert_eq!(value_of("2 and 0"), RuntimeVal::int(0));
        assert_eq!(value_of("0 or 5"), RuntimeVal::int(1));
        assert_eq!(value_of("0 or 0"), RuntimeVal::int(0));
    }

    #[test]
    fn short_circuit_skips_right_side() {
        let mut interp = Interpreter::new();

        // The right side would divide by zero
        assert_eq!(run(&mut interp, "0 and 1 / 0"), Ok(RuntimeVal::int(0)));
        assert_eq!(run(&mut interp, "1 or 1 / 0"), Ok(RuntimeVal::int(1)));
        // And it would create the variable
        run(&mut interp, "0 and unseen").unwrap();
        assert_eq!(interp.current_variables().get("unseen"), None);
    }

    #[test]
    fn and_or_treat_absent_as_false() {
        let code = "Nothing { x <- 1 }\n";

        assert_eq!(value_of(&format!("{code}Nothing and 1")), RuntimeVal::int(0));
        assert_eq!(value_of(&format!("{code}Nothing or 1")), RuntimeVal::int(1));
        assert_eq!(value_of(&format!("{code}1 and Nothing")), RuntimeVal::int(0));
    }

    #[test]
    fn division_by_zero() {
        let mut interp = Interpreter::new();

        assert_eq!(
            run(&mut interp, "5 % 0"),
            Err(FunxError::ZeroDivision { code: "5 % 0".into() })
        );
        assert_eq!(
            run(&mut interp, "x <- 1 + 10 / (3 - 3)"),
            Err(FunxError::ZeroDivision {
                code: "10 / (3 - 3)".into()
            })
        );
    }

    #[test]
    fn recursive_factorial() {
        let mut interp = Interpreter::new();
        run(&mut interp, FACT).unwrap();

        assert_eq!(run(&mut interp, "Fact 5"), Ok(RuntimeVal::int(120)));
        assert_eq!(run(&mut interp, "Fact 0"), Ok(RuntimeVal::int(1)));
        assert_eq!(interp.frame_depth(), 1);
    }

    #[test]
    fn wrong_argument_count() {
        let mut interp = Interpreter::new();
        run(&mut interp, FACT).unwrap();

        assert_eq!(
            run(&mut interp, "Fact"),
            Err(FunxError::InvalidParams {
                name: "Fact".into(),
                params: vec!["n".into()],
                given: vec![],
                code: "Fact".into(),
            })
        );
    }

    #[test]
    fn undefined_function() {
        let err = value_of_err("x <- 1 + Missing 2");

        assert_eq!(
            err,
            FunxError::UndefinedFunction {
                name: "Missing".into(),
                code: "Missing 2".into(),
            }
        );
        assert_eq!(err.to_string(), "funx undefined function 'Missing' in 'Missing 2'");
    }

    #[test]
    fn undefined_function_is_checked_before_arguments() {
        // The argument would divide by zero
        assert!(matches!(
            value_of_err("Missing (1 / 0)"),
            FunxError::UndefinedFunction { .. }
        ));
    }

    #[test]
    fn functions_are_resolved_when_called() {
        let code = "IsEven n { if n = 0 { 1 } else { IsOdd (n - 1) } }
IsOdd n { if n = 0 { 0 } else { IsEven (n - 1) } }
IsEven 10";

        assert_eq!(value_of(code), RuntimeVal::int(1));
    }

    #[test]
    fn callee_frame_is_isolated() {
        let mut interp = Interpreter::new();
        run(&mut interp, "x <- 10\nPeek { x }\nPoke { x <- 99 }").unwrap();

        // The callee reads its own, fresh x
        assert_eq!(run(&mut interp, "Peek"), Ok(RuntimeVal::int(0)));
        assert_eq!(run(&mut interp, "Poke"), Ok(RuntimeVal::Absent));
        assert_eq!(run(&mut interp, "x"), Ok(RuntimeVal::int(10)));
    }

    #[test]
    fn arguments_evaluated_in_caller_frame() {
        let code = "Twice v { v * 2 }\na <- 21\nTwice a";

        assert_eq!(value_of(code), RuntimeVal::int(42));
    }

    #[test]
    fn block_returns_first_value() {
        // The last statement is never reached
        let mut interp = Interpreter::new();

        assert_eq!(run(&mut interp, "a <- 1\na + 1\na <- 50"), Ok(RuntimeVal::int(2)));
        assert_eq!(interp.current_variables().get("a"), Some(RuntimeVal::int(1)));
    }

    #[test]
    fn zero_is_a_value() {
        assert_eq!(value_of("0\n5"), RuntimeVal::int(0));
    }

    #[test]
    fn if_else_branches() {
        assert_eq!(value_of("if 1 { 10 } else { 20 }"), RuntimeVal::int(10));
        assert_eq!(value_of("if 0 { 10 } else { 20 }"), RuntimeVal::int(20));
        assert_eq!(value_of("if 0 { 10 }"), RuntimeVal::Absent);
        assert_eq!(value_of("if 1 { x <- 3 }\nx"), RuntimeVal::int(3));
    }

    #[test]
    fn absent_condition() {
        let code = "Nothing { x <- 1 }\nif Nothing { 1 }";

        assert_eq!(
            value_of_err(code),
            FunxError::InvalidOperand {
                operand: "Nothing".into(),
                code: "if Nothing { 1 }".into(),
            }
        );
        assert!(matches!(
            value_of_err("Nothing { x <- 1 }\nwhile Nothing { 1 }"),
            FunxError::InvalidOperand { .. }
        ));
    }

    #[test]
    fn while_loop() {
        let code = "i <- 0\ns <- 0\nwhile i < 5 { i <- i + 1\n s <- s + i }\ns";

        assert_eq!(value_of(code), RuntimeVal::int(15));
    }

    #[test]
    fn value_escapes_loop_and_call() {
        let code = "First n {
  i <- 0
  while 1 {
    i <- i + 1
    if i * i > n { i }
  }
  999
}
First 10";

        assert_eq!(value_of(code), RuntimeVal::int(4));
    }

    #[test]
    fn loop_body_expression_stops_loop() {
        let mut interp = Interpreter::new();

        assert_eq!(run(&mut interp, "while y < 3 { y }"), Ok(RuntimeVal::int(0)));
        assert_eq!(interp.current_variables().get("y"), Some(RuntimeVal::int(0)));
    }

    #[test]
    fn absent_operand() {
        let code = "Nothing { x <- 1 }\n1 + Nothing";

        assert_eq!(
            value_of_err(code),
            FunxError::InvalidOperand {
                operand: "Nothing".into(),
                code: "1 + Nothing".into(),
            }
        );
        assert!(matches!(
            value_of_err("Nothing { x <- 1 }\n-Nothing"),
            FunxError::InvalidOperand { .. }
        ));
        assert!(matches!(
            value_of_err("Nothing { x <- 1 }\nnot Nothing"),
            FunxError::InvalidOperand { .. }
        ));
    }

    #[test]
    fn absent_can_be_assigned_and_passed() {
        let mut interp = Interpreter::new();
        run(&mut interp, "Nothing { x <- 1 }\nId a { a }\nv <- Nothing").unwrap();

        assert_eq!(interp.current_variables().get("v"), Some(RuntimeVal::Absent));
        // Binding absent to a parameter is fine until it is used as an operand
        assert_eq!(run(&mut interp, "Id (Nothing)"), Ok(RuntimeVal::Absent));
        assert_eq!(
            run(&mut interp, "v * 2"),
            Err(FunxError::InvalidOperand {
                operand: "v".into(),
                code: "v * 2".into(),
            })
        );
    }

    #[test]
    fn redefined_function() {
        let mut interp = Interpreter::new();
        run(&mut interp, "F a { a }").unwrap();

        assert_eq!(
            run(&mut interp, "F b { b }"),
            Err(FunxError::RedefinedFunction {
                name: "F".into(),
                code: "F b { b }".into(),
            })
        );
        assert_eq!(
            interp.defined_functions().get("F").map(|f| f.params.clone()),
            Some(vec!["a".to_string()])
        );
    }

    #[test]
    fn repeated_params_leave_registry_unchanged() {
        let mut interp = Interpreter::new();

        assert!(matches!(
            run(&mut interp, "G a a { a }"),
            Err(FunxError::RepeatedParams { .. })
        ));
        assert!(!interp.defined_functions().contains("G"));
        assert!(interp.defined_functions().is_empty());
    }

    #[test]
    fn syntax_error_evaluates_nothing() {
        let mut interp = Interpreter::new();

        let err = run(&mut interp, "x <- 1\ny <- (2").unwrap_err();

        assert_eq!(
            err,
            FunxError::SyntaxError("line 2:7 mismatched input '<EOF>' expecting ')'".into())
        );
        assert!(interp.current_variables().is_empty());
    }

    #[test]
    fn unknown_operator_in_tree() {
        let mut interp = Interpreter::new();
        let node = ASTNode::new(
            ASTNodeKind::BinaryOp {
                left: Box::new(ASTNode::new(ASTNodeKind::IntLiteral { value: 1.into() }, "1", 1)),
                right: Box::new(ASTNode::new(ASTNodeKind::IntLiteral { value: 2.into() }, "2", 1)),
                operator: "^".into(),
            },
            "1 ^ 2",
            1,
        );

        assert_eq!(
            interp.visit(&node),
            Err(FunxError::SyntaxError("unknown binary operator '^'".into()))
        );
    }

    #[test]
    fn recover_after_nested_failure() {
        let mut interp = Interpreter::new();
        run(
            &mut interp,
            "top <- 5\nInner n { n / 0 }\nMiddle n { Inner (n + 1) }\nOuter n { Middle (n + 1) }",
        )
        .unwrap();

        assert!(matches!(
            run(&mut interp, "top <- Outer top"),
            Err(FunxError::ZeroDivision { .. })
        ));
        // Every call frame was already popped on the way out
        assert_eq!(interp.frame_depth(), 1);

        interp.recover();

        assert_eq!(interp.frame_depth(), 1);
        assert_eq!(interp.current_variables().get("top"), Some(RuntimeVal::int(5)));
        assert_eq!(run(&mut interp, "top + 1"), Ok(RuntimeVal::int(6)));
    }

    #[test]
    fn failed_call_leaves_top_frame_active() {
        let mut interp = Interpreter::new();
        run(&mut interp, "Fail n { local <- n\n n / 0 }").unwrap();

        assert!(run(&mut interp, "Fail 3").is_err());

        // No recover: the next program must still run in the top level frame
        assert_eq!(interp.frame_depth(), 1);
        run(&mut interp, "after <- 1").unwrap();
        assert_eq!(interp.current_variables().get("after"), Some(RuntimeVal::int(1)));
        assert_eq!(interp.current_variables().get("local"), None);
    }

    #[test]
    fn arguments_evaluated_left_to_right() {
        let mut interp = Interpreter::new();
        run(&mut interp, "Two a b { a }").unwrap();

        assert_eq!(
            run(&mut interp, "Two (1 / 0) (Missing)"),
            Err(FunxError::ZeroDivision {
                code: "1 / 0".into()
            })
        );
        assert_eq!(
            run(&mut interp, "Two (Missing) (1 / 0)"),
            Err(FunxError::UndefinedFunction {
                name: "Missing".into(),
                code: "Missing".into(),
            })
        );
    }

    #[test]
    fn integers_do_not_overflow() {
        let mut interp = Interpreter::new();
        run(&mut interp, FACT).unwrap();

        assert_eq!(
            run(&mut interp, "Fact 21").map(|v| v.to_string()),
            Ok("51090942171709440000".to_string())
        );
        assert_eq!(
            run(&mut interp, "9223372036854775807 + 1").map(|v| v.to_string()),
            Ok("9223372036854775808".to_string())
        );
        assert_eq!(
            run(&mut interp, "-9223372036854775808 - 1").map(|v| v.to_string()),
            Ok("-9223372036854775809".to_string())
        );
        assert_eq!(
            run(&mut interp, "(Fact 25) / (Fact 23)"),
            Ok(RuntimeVal::int(600))
        );
    }

    #[test]
    fn reset_forgets_everything() {
        let mut interp = Interpreter::new();
        run(&mut interp, "x <- 3\nF { 1 }").unwrap();

        interp.reset();

        assert!(interp.current_variables().is_empty());
        assert!(interp.defined_functions().is_empty());
        assert!(run(&mut interp, "F b { b }").is_ok());
    }

    #[test]
    fn sessions_are_independent() {
        let mut first = Interpreter::new();
        let mut second = Interpreter::new();
        run(&mut first, "F { 1 }\nx <- 4").unwrap();

        assert!(matches!(
            run(&mut second, "F"),
            Err(FunxError::UndefinedFunction { .. })
        ));
        assert_eq!(run(&mut second, "x"), Ok(RuntimeVal::int(0)));
    }

    fn value_of_err(code: &str) -> FunxError {
        Interpreter::new().execute(code).unwrap_err()
    }
}

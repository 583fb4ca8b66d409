use num_bigint::BigInt;
use num_traits::Zero;
use tracing::debug;

use super::{FunxError, Interpreter};
use crate::environment::Frame;
use crate::frontend::ast::ASTNode;
use crate::values::{RuntimeVal, ValueError};

impl Interpreter {
    pub(super) fn visit_funcall(
        &mut self,
        node: &ASTNode,
        name: &str,
        args: &[ASTNode],
    ) -> Result<RuntimeVal, FunxError> {
        // The name is resolved before any argument runs
        let entry = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| FunxError::UndefinedFunction {
                name: name.to_string(),
                code: node.text.clone(),
            })?;

        let mut given = Vec::with_capacity(args.len());
        for arg in args {
            given.push(self.visit(arg)?);
        }

        if given.len() != entry.params.len() {
            return Err(FunxError::InvalidParams {
                name: name.to_string(),
                params: entry.params,
                given,
                code: node.text.clone(),
            });
        }

        let mut frame = Frame::new();
        for (param, value) in entry.params.iter().zip(given) {
            frame.assign_var(param, value);
        }

        debug!(function = name, depth = self.frames.depth() + 1, "calling");
        self.frames.push_frame(frame);
        let res = self.visit_block(&entry.body);
        // Popped whether the body succeeded or not
        self.frames.pop_frame();

        res
    }

    pub(super) fn visit_unary_op(
        &mut self,
        node: &ASTNode,
        operator: &str,
        operand: &ASTNode,
    ) -> Result<RuntimeVal, FunxError> {
        let value = self.visit_int(operand, node)?;

        match operator {
            "+" => Ok(RuntimeVal::Int(value)),
            "-" => Ok(RuntimeVal::Int(-value)),
            _ => Err(FunxError::SyntaxError(format!(
                "unknown unary operator '{operator}'"
            ))),
        }
    }

    pub(super) fn visit_not(
        &mut self,
        node: &ASTNode,
        operand: &ASTNode,
    ) -> Result<RuntimeVal, FunxError> {
        let value = self.visit_int(operand, node)?;

        Ok(RuntimeVal::from(value.is_zero()))
    }

    // Absent counts as false on both sides, the right one only runs if needed
    pub(super) fn visit_and(
        &mut self,
        left: &ASTNode,
        right: &ASTNode,
    ) -> Result<RuntimeVal, FunxError> {
        if !self.visit(left)?.is_truthy() {
            return Ok(RuntimeVal::int(0));
        }

        Ok(RuntimeVal::from(self.visit(right)?.is_truthy()))
    }

    pub(super) fn visit_or(
        &mut self,
        left: &ASTNode,
        right: &ASTNode,
    ) -> Result<RuntimeVal, FunxError> {
        if self.visit(left)?.is_truthy() {
            return Ok(RuntimeVal::int(1));
        }

        Ok(RuntimeVal::from(self.visit(right)?.is_truthy()))
    }

    pub(super) fn visit_binary_op(
        &mut self,
        node: &ASTNode,
        left: &ASTNode,
        right: &ASTNode,
        operator: &str,
    ) -> Result<RuntimeVal, FunxError> {
        let lhs = self.visit(left)?;
        let rhs = self.visit(right)?;

        lhs.calculate(rhs, operator).map_err(|e| match e {
            ValueError::AbsentLeftOperand => FunxError::InvalidOperand {
                operand: left.text.clone(),
                code: node.text.clone(),
            },
            ValueError::AbsentRightOperand => FunxError::InvalidOperand {
                operand: right.text.clone(),
                code: node.text.clone(),
            },
            ValueError::DivisionByZero => FunxError::ZeroDivision {
                code: node.text.clone(),
            },
            ValueError::UndefinedOperator(op) => {
                FunxError::SyntaxError(format!("unknown binary operator '{op}'"))
            }
        })
    }

    /// Evaluates an operand that must produce an integer. `parent` is the
    /// construct quoted when it does not.
    pub(super) fn visit_int(
        &mut self,
        operand: &ASTNode,
        parent: &ASTNode,
    ) -> Result<BigInt, FunxError> {
        self.visit(operand)?
            .into_int()
            .ok_or_else(|| FunxError::InvalidOperand {
                operand: operand.text.clone(),
                code: parent.text.clone(),
            })
    }
}

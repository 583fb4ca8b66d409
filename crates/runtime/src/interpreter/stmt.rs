use std::collections::HashSet;
use std::rc::Rc;

use num_traits::Zero;
use tracing::{debug, trace};

use super::{FunxError, Interpreter};
use crate::frontend::ast::{ASTNode, Block};
use crate::functions::FunctionEntry;
use crate::values::RuntimeVal;

impl Interpreter {
    // The first statement producing a value ends the block
    pub(super) fn visit_block(&mut self, block: &Block) -> Result<RuntimeVal, FunxError> {
        for stmt in &block.statements {
            let res = self.visit(stmt)?;

            if !res.is_absent() {
                return Ok(res);
            }
        }

        Ok(RuntimeVal::Absent)
    }

    pub(super) fn visit_if_else(
        &mut self,
        node: &ASTNode,
        cond: &ASTNode,
        true_branch: &Block,
        false_branch: Option<&Block>,
    ) -> Result<RuntimeVal, FunxError> {
        if !self.visit_int(cond, node)?.is_zero() {
            self.visit_block(true_branch)
        } else if let Some(false_branch) = false_branch {
            self.visit_block(false_branch)
        } else {
            Ok(RuntimeVal::Absent)
        }
    }

    pub(super) fn visit_while(
        &mut self,
        node: &ASTNode,
        cond: &ASTNode,
        body: &Block,
    ) -> Result<RuntimeVal, FunxError> {
        let mut iteration: u64 = 0;

        while !self.visit_int(cond, node)?.is_zero() {
            iteration += 1;
            trace!(line = node.line, iteration, "loop");

            let res = self.visit_block(body)?;
            if !res.is_absent() {
                return Ok(res);
            }
        }

        Ok(RuntimeVal::Absent)
    }

    pub(super) fn visit_assignment(
        &mut self,
        name: &str,
        value: &ASTNode,
    ) -> Result<RuntimeVal, FunxError> {
        let value = self.visit(value)?;
        self.frames.current_mut().assign_var(name, value);

        Ok(RuntimeVal::Absent)
    }

    pub(super) fn visit_fun_def(
        &mut self,
        node: &ASTNode,
        name: &str,
        params: &[String],
        body: &Rc<Block>,
    ) -> Result<RuntimeVal, FunxError> {
        if self.functions.contains(name) {
            return Err(FunxError::RedefinedFunction {
                name: name.to_string(),
                code: node.text.clone(),
            });
        }

        let mut seen = HashSet::new();
        if !params.iter().all(|p| seen.insert(p.as_str())) {
            return Err(FunxError::RepeatedParams {
                name: name.to_string(),
                params: params.to_vec(),
                code: node.text.clone(),
            });
        }

        let entry = FunctionEntry {
            params: params.to_vec(),
            body: Rc::clone(body),
        };
        self.functions
            .declare(name, entry)
            .map_err(|_| FunxError::RedefinedFunction {
                name: name.to_string(),
                code: node.text.clone(),
            })?;

        debug!(function = name, ?params, "function defined");

        Ok(RuntimeVal::Absent)
    }
}

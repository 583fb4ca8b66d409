use std::fmt::Display;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

mod value_errors;

pub use value_errors::ValueError;

// Result of evaluating any node. 'Absent' is what statements produce and is
// never the same thing as the integer 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RuntimeVal {
    Int(BigInt),
    #[default]
    Absent,
}

impl Display for RuntimeVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeVal::Int(nb) => write!(f, "{}", nb),
            RuntimeVal::Absent => write!(f, "absent"),
        }
    }
}

impl From<BigInt> for RuntimeVal {
    fn from(value: BigInt) -> Self {
        RuntimeVal::Int(value)
    }
}

impl From<bool> for RuntimeVal {
    fn from(value: bool) -> Self {
        RuntimeVal::int(value as u8)
    }
}

impl RuntimeVal {
    pub fn int(value: impl Into<BigInt>) -> Self {
        RuntimeVal::Int(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RuntimeVal::Absent)
    }

    pub fn into_int(self) -> Option<BigInt> {
        match self {
            RuntimeVal::Int(nb) => Some(nb),
            RuntimeVal::Absent => None,
        }
    }

    // Nonzero integers are true. Absent counts as false, which only the
    // short-circuit operators rely on: everything else rejects it first.
    pub fn is_truthy(&self) -> bool {
        matches!(self, RuntimeVal::Int(nb) if !nb.is_zero())
    }

    // Binary arithmetic and comparisons. Both sides must hold a value, the
    // left one is checked first.
    pub fn calculate(self, rhs: RuntimeVal, operator: &str) -> Result<RuntimeVal, ValueError> {
        let lhs = self.into_int().ok_or(ValueError::AbsentLeftOperand)?;
        let rhs = rhs.into_int().ok_or(ValueError::AbsentRightOperand)?;

        compute(lhs, rhs, operator)
    }
}

// Integers are unbounded. Division and modulo round toward negative
// infinity: -5 / 2 = -3 and -5 % 2 = 1.
fn compute(lhs: BigInt, rhs: BigInt, operator: &str) -> Result<RuntimeVal, ValueError> {
    match operator {
        "*" => Ok(RuntimeVal::Int(lhs * rhs)),
        "/" | "%" if rhs.is_zero() => Err(ValueError::DivisionByZero),
        "/" => Ok(RuntimeVal::Int(lhs.div_floor(&rhs))),
        // The result takes the sign of the divisor
        "%" => Ok(RuntimeVal::Int(lhs.mod_floor(&rhs))),
        "+" => Ok(RuntimeVal::Int(lhs + rhs)),
        "-" => Ok(RuntimeVal::Int(lhs - rhs)),
        "<" => Ok(RuntimeVal::from(lhs < rhs)),
        ">" => Ok(RuntimeVal::from(lhs > rhs)),
        "<=" => Ok(RuntimeVal::from(lhs <= rhs)),
        ">=" => Ok(RuntimeVal::from(lhs >= rhs)),
        "=" => Ok(RuntimeVal::from(lhs == rhs)),
        "!=" => Ok(RuntimeVal::from(lhs != rhs)),
        _ => Err(ValueError::UndefinedOperator(operator.to_string())),
    }
}

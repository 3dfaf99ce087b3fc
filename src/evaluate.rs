use crate::error::EvalError;
use crate::expression::{BinaryOperator, Expression, Function};

/// Calculate the value of `expr`.
pub fn evaluate(expr: &Expression) -> Result<f64, EvalError> {
    expr.evaluate()
}

impl Expression {
    /// Calculates the value of the expression bottom-up.
    ///
    /// Never returns a non-finite value: anything that would produce infinity
    /// or NaN is reported as an [`EvalError`] instead.
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        // Left operands are folded in a loop so long `+ - * /` chains do not
        // recurse; operands still evaluate left to right.
        let (leftmost, spine) = self.left_spine();
        let mut value = leftmost.evaluate_operand()?;
        for (op, right) in spine {
            value = evaluate_binary_op(op, value, right.evaluate()?)?;
        }
        Ok(value)
    }

    fn evaluate_operand(&self) -> Result<f64, EvalError> {
        match self {
            Self::Literal(value) => Ok(*value),
            Self::UnaryMinus(only) => Ok(-only.evaluate()?),
            Self::BinaryOp { .. } => self.evaluate(),
            Self::Call { function, argument } => {
                evaluate_function(*function, argument.evaluate()?)
            }
        }
    }
}

fn evaluate_binary_op(op: BinaryOperator, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        BinaryOperator::Add => lhs + rhs,
        BinaryOperator::Sub => lhs - rhs,
        BinaryOperator::Mul => lhs * rhs,
        BinaryOperator::Div => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs / rhs
        }
        BinaryOperator::Pow => lhs.powf(rhs),
    };
    finite(value)
}

fn evaluate_function(function: Function, operand: f64) -> Result<f64, EvalError> {
    let value = match function {
        Function::Sin => operand.sin(),
        Function::Cos => operand.cos(),
        Function::Sqrt => {
            if operand < 0.0 {
                return Err(EvalError::DomainError { function, operand });
            }
            operand.sqrt()
        }
    };
    finite(value)
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NumericOverflow)
    }
}

use std::fmt;

/// Parsed arithmetic expression. Each node owns its children.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    // Constant.
    Literal(f64),

    // Unary op.
    UnaryMinus(Box<Expression>),

    // Binary op.
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    // Single-argument builtin.
    Call {
        function: Function,
        argument: Box<Expression>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Builtin functions callable as `name(expression)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Sqrt,
}

impl Expression {
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(function: Function, argument: Expression) -> Self {
        Self::Call {
            function,
            argument: Box::new(argument),
        }
    }

    pub fn negate(operand: Expression) -> Self {
        Self::UnaryMinus(Box::new(operand))
    }

    /// Split off the left-leaning chain of binary operators.
    ///
    /// Returns the leftmost non-binary operand and the `(op, right)` pairs
    /// from innermost to outermost, so a left-associative `a + b - c` yields
    /// `a`, `[(+, b), (-, c)]`. Chains like this grow with the input rather
    /// than with its nesting, so they are walked iteratively.
    pub(crate) fn left_spine(&self) -> (&Expression, Vec<(BinaryOperator, &Expression)>) {
        let mut spine = Vec::new();
        let mut leftmost = self;
        while let Self::BinaryOp { op, left, right } = leftmost {
            spine.push((*op, right.as_ref()));
            leftmost = left;
        }
        spine.reverse();
        (leftmost, spine)
    }
}

// Tear the tree down with an explicit stack; the default drop would recurse
// once per link of a long `+ - * /` chain.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(mut expr) = pending.pop() {
            take_children(&mut expr, &mut pending);
        }
    }
}

fn take_children(expr: &mut Expression, pending: &mut Vec<Expression>) {
    let mut take = |child: &mut Box<Expression>| {
        if !matches!(**child, Expression::Literal(_)) {
            pending.push(std::mem::replace(child.as_mut(), Expression::Literal(0.0)));
        }
    };
    match expr {
        Expression::Literal(_) => {}
        Expression::UnaryMinus(operand) => take(operand),
        Expression::Call { argument, .. } => take(argument),
        Expression::BinaryOp { left, right, .. } => {
            take(left);
            take(right);
        }
    }
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }
}

impl Function {
    /// The builtin called `name`, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "sqrt" => Some(Self::Sqrt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Sqrt => "sqrt",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully parenthesized, so the grouping chosen by the parser is explicit.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::UnaryMinus(operand) => write!(f, "(-{operand})"),
            Self::BinaryOp { .. } => {
                let (leftmost, spine) = self.left_spine();
                for _ in 0..spine.len() {
                    f.write_str("(")?;
                }
                write!(f, "{leftmost}")?;
                for (op, right) in spine {
                    write!(f, " {} {right})", op.symbol())?;
                }
                Ok(())
            }
            Self::Call { function, argument } => write!(f, "{function}({argument})"),
        }
    }
}

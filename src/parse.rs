use std::iter::Peekable;

use crate::error::{Error, ParseError};
use crate::expression::{BinaryOperator, Expression, Function};
use crate::tokenize::{tokenize, Lexeme, Token};

/// Default bound on parser recursion: parentheses, unary minus and `^`
/// exponents. Flat `+ - * /` chains are unbounded.
pub const MAX_NESTING_DEPTH: usize = 256;

impl Expression {
    /// Parse the expression from `input`.
    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(parse(tokenize(input)?)?)
    }
}

/// Parse a complete token sequence into an [`Expression`].
pub fn parse(tokens: impl IntoIterator<Item = Lexeme>) -> Result<Expression, ParseError> {
    Parser::new(tokens).parse()
}

/// Recursive descent parser over a [`Lexeme`] stream.
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := power (('*' | '/') power)*
/// power      := unary ('^' power)?
/// unary      := '-' unary | atom
/// atom       := number | identifier '(' expression ')' | '(' expression ')'
/// ```
pub struct Parser<I: Iterator<Item = Lexeme>> {
    tokens: Peekable<I>,
    /// End of the last consumed token; where "end of input" is reported.
    end: usize,
    depth: usize,
    max_depth: usize,
}

impl<I: Iterator<Item = Lexeme>> Parser<I> {
    pub fn new(tokens: impl IntoIterator<Item = Lexeme, IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            end: 0,
            depth: 0,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse one expression and require that it spans every token.
    pub fn parse(mut self) -> Result<Expression, ParseError> {
        let tree = self.expression()?;
        match self.bump() {
            None => Ok(tree),
            Some(extra) => Err(unexpected(Some(extra), self.end, "an operator or end of input")),
        }
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.next()?;
        self.end = lexeme.span.end;
        Some(lexeme)
    }

    fn position(&mut self) -> usize {
        match self.tokens.peek() {
            Some(lexeme) => lexeme.span.start,
            None => self.end,
        }
    }

    /// Consume the next token if it is one of `allowed` binary operators.
    fn binary_operator(&mut self, allowed: &[BinaryOperator]) -> Option<BinaryOperator> {
        let lexeme = self.tokens.peek()?;
        let op = match lexeme.token {
            Token::Plus => BinaryOperator::Add,
            Token::Minus => BinaryOperator::Sub,
            Token::Star => BinaryOperator::Mul,
            Token::Slash => BinaryOperator::Div,
            Token::Caret => BinaryOperator::Pow,
            _ => return None,
        };
        if !allowed.contains(&op) {
            return None;
        }
        self.bump();
        Some(op)
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.bump() {
            Some(lexeme) if lexeme.token == wanted => Ok(()),
            found => Err(unexpected(found, self.end, expected)),
        }
    }

    /// Run a recursive production one level deeper, failing instead of
    /// exceeding `max_depth`.
    fn descend(
        &mut self,
        production: fn(&mut Self) -> Result<Expression, ParseError>,
    ) -> Result<Expression, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                position: self.position(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        self.descend(|parser| {
            let mut left = parser.term()?;
            while let Some(op) =
                parser.binary_operator(&[BinaryOperator::Add, BinaryOperator::Sub])
            {
                let right = parser.term()?;
                left = Expression::binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn term(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.power()?;
        while let Some(op) = self.binary_operator(&[BinaryOperator::Mul, BinaryOperator::Div]) {
            let right = self.power()?;
            left = Expression::binary(op, left, right);
        }
        Ok(left)
    }

    fn power(&mut self) -> Result<Expression, ParseError> {
        let base = self.unary()?;
        match self.binary_operator(&[BinaryOperator::Pow]) {
            // Right-associative: the exponent is itself a power.
            Some(op) => {
                let exponent = self.descend(Self::power)?;
                Ok(Expression::binary(op, base, exponent))
            }
            None => Ok(base),
        }
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        match self.tokens.peek() {
            Some(Lexeme {
                token: Token::Minus,
                ..
            }) => {
                self.bump();
                let operand = self.descend(Self::unary)?;
                Ok(Expression::negate(operand))
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> Result<Expression, ParseError> {
        let Some(lexeme) = self.bump() else {
            return Err(unexpected(None, self.end, "an operand"));
        };
        let position = lexeme.span.start;
        match lexeme.token {
            Token::Number(value) => {
                if !value.is_finite() {
                    return Err(ParseError::LiteralTooLarge { position });
                }
                Ok(Expression::Literal(value))
            }
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Token::Identifier(name) => {
                let Some(function) = Function::from_name(&name) else {
                    return Err(ParseError::UnknownFunction { name, position });
                };
                self.expect(Token::LParen, "`(` after function name")?;
                let argument = self.expression()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(Expression::call(function, argument))
            }
            other => Err(ParseError::UnexpectedToken {
                found: Some(other),
                position,
                expected: "an operand",
            }),
        }
    }
}

fn unexpected(found: Option<Lexeme>, end: usize, expected: &'static str) -> ParseError {
    match found {
        Some(lexeme) => ParseError::UnexpectedToken {
            found: Some(lexeme.token),
            position: lexeme.span.start,
            expected,
        },
        None => ParseError::UnexpectedToken {
            found: None,
            position: end,
            expected,
        },
    }
}

//! Arithmetic expression parser/evaluator.
//!
//! Input text goes through three stages, each with its own error type:
//! [`tokenize`] ([`LexError`]), [`parse`] ([`ParseError`]) and [`evaluate`]
//! ([`EvalError`]). [`calculate`] runs all of them and reports the first
//! failure as an [`Error`].
//!
//! Supported syntax is `+ - * / ^`, unary minus, parentheses, decimal
//! literals and the functions `sin`, `cos` and `sqrt`. `^` is
//! right-associative and unary minus binds tighter than every binary
//! operator, so `-2 ^ 2` is `4`.
//!
//! # Example
//!
//! ```rust
//! use calc_expr::*;
//!
//! assert_eq!(calculate("2 + 3 * 4").unwrap(), 14.0);
//! assert_eq!(calculate("sqrt(16) / (1 + 1)").unwrap(), 2.0);
//!
//! let parsed = Expression::parse("5 * -2").unwrap();
//! assert_eq!(parsed.to_string(), "(5 * (-2))");
//! assert_eq!(parsed.evaluate().unwrap(), -10.0);
//!
//! assert!(matches!(
//!     calculate("1 / 0"),
//!     Err(Error::Eval(EvalError::DivisionByZero))
//! ));
//! ```

mod error;
mod evaluate;
mod expression;
mod parse;
mod tokenize;
#[cfg(feature = "wasm")]
mod wasm;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use error::*;
pub use evaluate::evaluate;
pub use expression::*;
pub use parse::{parse, Parser, MAX_NESTING_DEPTH};
pub use tokenize::{tokenize, Lexeme, Token, Tokens};

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

/// Tokenize, parse and evaluate `input`.
///
/// Holds no state between calls, so it is safe to call from many threads at
/// once.
pub fn calculate(input: &str) -> Result<f64, Error> {
    let tokens = tokenize(input)?;
    let expr = parse(tokens)?;
    Ok(expr.evaluate()?)
}

/// [`calculate`] every input, keeping input order. Runs in parallel with the
/// `rayon` feature.
pub fn calculate_all<S: AsRef<str> + Sync>(inputs: &[S]) -> Vec<Result<f64, Error>> {
    #[cfg(feature = "rayon")]
    {
        inputs
            .par_iter()
            .map(|input| calculate(input.as_ref()))
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        inputs.iter().map(|input| calculate(input.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_precedence() {
        assert_eq!(calculate("1 * 2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(calculate("8 / 4 * 3").unwrap(), 6.0);
        assert_eq!(calculate("4 ^ 3 ^ 2").unwrap(), 262144.0);
        assert_eq!(calculate("2 * 3 ^ 2").unwrap(), 18.0);
    }

    #[test]
    fn unary_minus_binds_before_power() {
        assert_eq!(calculate("-2 ^ 2").unwrap(), 4.0);
        assert_eq!(calculate("2 ^ -1").unwrap(), 0.5);
        assert_eq!(calculate("--3").unwrap(), 3.0);
    }

    #[test]
    fn quadratic_root() {
        let root = calculate("(-3 + (3^2 - 4*1*2)^0.5) / (2*1)").unwrap();
        assert_eq!(root, -1.0);
    }

    #[test]
    fn errors_carry_their_stage() {
        assert!(matches!(calculate("2 # 2"), Err(Error::Lex(_))));
        assert!(matches!(calculate("2 +"), Err(Error::Parse(_))));
        assert!(matches!(calculate("sqrt(-1)"), Err(Error::Eval(_))));
        assert!(matches!(
            calculate("2 ^ 2000"),
            Err(Error::Eval(EvalError::NumericOverflow))
        ));
    }

    #[test]
    fn error_messages_are_distinct() {
        let messages: Vec<_> = ["2 # 2", "2 +", "1 / 0"]
            .iter()
            .map(|input| calculate(input).unwrap_err().to_string())
            .collect();
        assert!(messages[0].starts_with("lexical error"), "{messages:?}");
        assert!(messages[1].starts_with("syntax error"), "{messages:?}");
        assert!(messages[2].starts_with("evaluation error"), "{messages:?}");
    }

    #[test]
    fn batch_keeps_order() {
        let results = calculate_all(&["1 + 1", "2 *", "3 ^ 2"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(2.0));
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(9.0));
    }

    #[test]
    fn concurrent_calls() {
        let handles: Vec<_> = (0..8)
            .map(|i| std::thread::spawn(move || calculate(&format!("{i} * (2 + 3)"))))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), i as f64 * 5.0);
        }
    }
}

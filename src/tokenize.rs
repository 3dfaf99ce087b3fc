use std::fmt;
use std::ops::Range;

use crate::error::LexError;

use pest::error::InputLocation;
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct TokenParser;

/// Smallest lexical unit of an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    /// Function name.
    Identifier(String),
}

/// A [`Token`] together with the byte range it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub span: Range<usize>,
}

/// Lazily materialized tokens of one input, left to right.
///
/// Cloning restarts the sequence from the current point.
#[derive(Clone, Debug)]
pub struct Tokens<'i> {
    pairs: Pairs<'i, Rule>,
}

/// Split `input` into tokens, skipping whitespace.
///
/// The whole input is validated up front, so a [`Tokens`] that is returned
/// can always be drained without further errors.
pub fn tokenize(input: &str) -> Result<Tokens<'_>, LexError> {
    let mut pairs =
        TokenParser::parse(Rule::tokens, input).map_err(|e| unexpected_character(input, &e))?;
    // `tokens` is the only top-level pair.
    let pairs = match pairs.next() {
        Some(tokens) => tokens.into_inner(),
        None => unreachable!("`tokens` always produces a pair"),
    };
    Ok(Tokens { pairs })
}

impl<'i> Iterator for Tokens<'i> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        let pair = self.pairs.next()?;
        let token = match pair.as_rule() {
            Rule::number => {
                let literal_str = pair.as_str();
                match literal_str.parse::<f64>() {
                    Ok(value) => Token::Number(value),
                    Err(_) => unreachable!("Unexpected literal: {}", literal_str),
                }
            }
            Rule::identifier => Token::Identifier(pair.as_str().to_string()),
            Rule::plus => Token::Plus,
            Rule::minus => Token::Minus,
            Rule::star => Token::Star,
            Rule::slash => Token::Slash,
            Rule::caret => Token::Caret,
            Rule::lparen => Token::LParen,
            Rule::rparen => Token::RParen,
            Rule::EOI => return None,
            x => unreachable!("Unexpected token rule {x:?}"),
        };
        let span = pair.as_span();
        Some(Lexeme {
            token,
            span: span.start()..span.end(),
        })
    }
}

fn unexpected_character(input: &str, error: &pest::error::Error<Rule>) -> LexError {
    let position = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    // pest reports the first character no token can start with.
    let found = input
        .get(position..)
        .and_then(|rest| rest.chars().next())
        .map(|c| (position, c))
        .or_else(|| input.char_indices().last());
    match found {
        Some((position, character)) => LexError::UnexpectedCharacter {
            character,
            position,
        },
        None => unreachable!("empty input cannot fail to lex"),
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Caret => write!(f, "^"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Identifier(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().map(|l| l.token).collect()
    }

    #[test]
    fn operators_and_numbers() {
        assert_eq!(
            tokens("2 + 3.5*(4 - 1) / 2^3"),
            vec![
                Token::Number(2.0),
                Token::Plus,
                Token::Number(3.5),
                Token::Star,
                Token::LParen,
                Token::Number(4.0),
                Token::Minus,
                Token::Number(1.0),
                Token::RParen,
                Token::Slash,
                Token::Number(2.0),
                Token::Caret,
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn sign_is_not_part_of_literal() {
        assert_eq!(tokens("-5"), vec![Token::Minus, Token::Number(5.0)]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(
            tokens("sqrt(16)"),
            vec![
                Token::Identifier("sqrt".to_string()),
                Token::LParen,
                Token::Number(16.0),
                Token::RParen,
            ]
        );
        assert_eq!(tokens("invalid"), vec![Token::Identifier("invalid".to_string())]);
    }

    #[test]
    fn whitespace_only() {
        assert!(tokens("").is_empty());
        assert!(tokens(" \t\r\n ").is_empty());
    }

    #[test]
    fn spans() {
        let spans: Vec<_> = tokenize("  12 *\tcos(0)").unwrap().map(|l| l.span).collect();
        assert_eq!(spans, vec![2..4, 5..6, 7..10, 10..11, 11..12, 12..13]);
    }

    #[test]
    fn restartable() {
        let mut tokens = tokenize("1 + 2").unwrap();
        tokens.next();
        let rest: Vec<_> = tokens.clone().collect();
        assert_eq!(rest.len(), 2);
        assert_eq!(tokens.collect::<Vec<_>>(), rest);
    }

    #[test]
    fn unexpected_characters() {
        assert_eq!(
            tokenize("2 $ 3").unwrap_err(),
            LexError::UnexpectedCharacter {
                character: '$',
                position: 2
            }
        );
        assert_eq!(
            tokenize("1.").unwrap_err(),
            LexError::UnexpectedCharacter {
                character: '.',
                position: 1
            }
        );
        assert_eq!(
            tokenize("4 % 2").unwrap_err(),
            LexError::UnexpectedCharacter {
                character: '%',
                position: 2
            }
        );
    }
}

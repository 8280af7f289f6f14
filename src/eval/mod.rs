// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Safe evaluation of arithmetic expressions typed by a user.
//!
//! Only numbers, `+ - * / **`, parentheses and the constants `pi` and `e` are
//! understood; nothing is ever executed. Powers bind tighter than a unary
//! minus on their left, so `-2**2` is -4.

mod error;

pub use error::EvalError;

use log::trace;

/// Constraint on the sign of an evaluated expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Any finite value.
    Any,

    /// Strictly positive values only.
    Pos,
}

/// Evaluate `expr`. If `expr` is empty (or only whitespace), `fallback` is
/// used instead. The result must be finite and satisfy `sign`.
pub fn safe_eval(expr: &str, fallback: f64, sign: Sign) -> Result<f64, EvalError> {
    let value = if expr.trim().is_empty() {
        trace!("Empty expression; using fallback {fallback}");
        fallback
    } else {
        let tokens = tokenize(expr)?;
        let mut parser = Parser { tokens, pos: 0 };
        let value = parser.expr()?;
        if let Some((tok, pos)) = parser.peek_with_pos() {
            return Err(EvalError::TrailingInput {
                token: tok.to_string(),
                pos,
            });
        }
        value
    };

    if !value.is_finite() {
        return Err(EvalError::NonFinite(expr.to_string()));
    }
    match sign {
        Sign::Pos if value <= 0.0 => Err(EvalError::NotPositive(value)),
        _ => Ok(value),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Pow => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<(Token, usize)>, EvalError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // An exponent only counts if digits follow it; otherwise the
                // "e" is left for the identifier rules (and fails there).
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let s: String = chars[start..i].iter().collect();
                let n = s.parse().map_err(|_| EvalError::BadNumber {
                    number: s.clone(),
                    pos: start,
                })?;
                tokens.push((Token::Number(n), start));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push((Token::Ident(chars[start..i].iter().collect()), start));
            }
            '+' => {
                tokens.push((Token::Plus, i));
                i += 1;
            }
            '-' => {
                tokens.push((Token::Minus, i));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push((Token::Pow, i));
                    i += 2;
                } else {
                    tokens.push((Token::Star, i));
                    i += 1;
                }
            }
            '/' => {
                tokens.push((Token::Slash, i));
                i += 1;
            }
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            c => return Err(EvalError::UnexpectedChar { c, pos: i }),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_with_pos(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, p)| (t, *p))
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        t
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // unary := ('+' | '-') unary | power
    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    // power := atom ('**' unary)?
    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.atom()?;
        if let Some(Token::Pow) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    // atom := number | constant | '(' expr ')'
    fn atom(&mut self) -> Result<f64, EvalError> {
        let pos = self.peek_with_pos().map(|(_, p)| p);
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Ident(name)) => match name.as_str() {
                "pi" => Ok(std::f64::consts::PI),
                "e" => Ok(std::f64::consts::E),
                _ => Err(EvalError::UnknownIdentifier(name)),
            },
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(EvalError::UnbalancedParens),
                }
            }
            Some(tok) => Err(EvalError::UnexpectedToken {
                token: tok.to_string(),
                pos: pos.unwrap_or_default(),
            }),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

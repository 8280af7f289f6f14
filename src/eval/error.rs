// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Unexpected character '{c}' at position {pos}")]
    UnexpectedChar { c: char, pos: usize },

    #[error("Could not parse '{number}' (position {pos}) as a number")]
    BadNumber { number: String, pos: usize },

    #[error("Unexpected '{token}' at position {pos}")]
    UnexpectedToken { token: String, pos: usize },

    #[error("Unexpected '{token}' at position {pos} after a complete expression")]
    TrailingInput { token: String, pos: usize },

    #[error("The expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("Unbalanced parentheses")]
    UnbalancedParens,

    #[error("Unknown name '{0}'; only 'pi' and 'e' are supported")]
    UnknownIdentifier(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("'{0}' does not evaluate to a finite number")]
    NonFinite(String),

    #[error("The value must be positive, but got {0}")]
    NotPositive(f64),
}

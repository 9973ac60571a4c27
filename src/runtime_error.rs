// ABOUTME: The interpreter's internal runtime-error type, carrying the token for diagnostics

use crate::token::Token;
use std::fmt;

/// A runtime fault produced while executing a statement or evaluating an
/// expression. Always carries the token whose line the diagnostic sink
/// should attribute the error to. Kept separate from the host-level
/// `LoxError` used at the CLI boundary.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

impl std::error::Error for RuntimeError {}
